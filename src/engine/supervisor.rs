// ABOUTME: Supervision of one task from spawn to terminal outcome
// ABOUTME: Races natural process exit against the shared deadline and kills on loss

use tracing::{debug, info, warn};

use super::deadline::Deadline;
use super::process::ProcessHandle;
use super::result::{TaskOutcome, TaskReport};
use crate::output::TaskSink;
use crate::task::{ShellConfig, Task};

/// Supervises exactly one task: spawns its process, waits for natural exit
/// or for the shared deadline, and force-kills on the latter.
///
/// The supervisor owns the process handle and the sink for the whole
/// execution; the sink stays open until the process has exited or been
/// killed. Whatever happens, `run` returns a report; failures are absorbed
/// and recorded, never propagated to sibling tasks.
pub struct Supervisor {
    task: Task,
    shell: ShellConfig,
    deadline: Deadline,
}

impl Supervisor {
    pub fn new(task: Task, shell: ShellConfig, deadline: Deadline) -> Self {
        Self {
            task,
            shell,
            deadline,
        }
    }

    pub async fn run(self, sink: TaskSink) -> TaskReport {
        let Self {
            task,
            shell,
            deadline,
        } = self;

        let mut report = TaskReport::new(&task, Some(sink.path().to_path_buf()));

        let mut process = match ProcessHandle::spawn(&task, &shell, &sink) {
            Ok(process) => process,
            Err(e) => {
                warn!("{} failed to start: {}", task, e);
                report.finish(TaskOutcome::StartFailed {
                    message: e.to_string(),
                });
                return report;
            }
        };

        report.pid = process.pid();
        info!(
            "{} execution started under process id {:?}",
            task,
            process.pid()
        );

        // Race natural exit against the shared deadline. Exactly one branch
        // runs; the kill path can therefore never fire for a reaped child.
        let outcome = tokio::select! {
            status = process.wait() => match status {
                Ok(status) => {
                    let outcome = TaskOutcome::from_exit_status(status);
                    info!("{} {}", task, outcome);
                    outcome
                }
                Err(e) => {
                    warn!("{} wait failed: {}", task, e);
                    TaskOutcome::CompletedWithError {
                        message: e.to_string(),
                    }
                }
            },
            cause = deadline.fired() => {
                info!(
                    "{} deadline fired ({}), killing process id {:?}",
                    task,
                    cause,
                    process.pid()
                );
                match process.kill().await {
                    Ok(()) => info!("{} process killed", task),
                    // The process may have exited in the same instant the
                    // deadline fired; the OS reaps it either way.
                    Err(e) => warn!("{} failed to kill process: {}", task, e),
                }
                TaskOutcome::Killed { cause }
            }
        };

        report.finish(outcome);
        debug!("{} supervisor finished", task);
        report
    }
}
