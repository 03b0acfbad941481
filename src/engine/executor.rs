// ABOUTME: Batch executor launching one supervisor per task under a shared deadline
// ABOUTME: Blocks on the completion barrier until every supervisor has resolved

use futures::future;
use std::time::Duration;
use tracing::{error, info, warn};

use super::deadline::Deadline;
use super::error::Result;
use super::result::{RunResult, TaskOutcome, TaskReport};
use super::signal;
use super::supervisor::Supervisor;
use crate::output::OutputDir;
use crate::task::{ShellConfig, Task};

/// Drives a batch of tasks: one concurrently running supervisor per task,
/// all sharing a single deadline, each writing to its own sink.
pub struct TaskExecutor {
    shell: ShellConfig,
}

impl TaskExecutor {
    pub fn new(shell: ShellConfig) -> Self {
        Self { shell }
    }

    /// Execute a batch under a fresh deadline, with host termination
    /// signals wired up to cancel the run early. Blocks until every task
    /// has completed, been killed, or failed to start.
    pub async fn execute(
        &self,
        tasks: Vec<Task>,
        timeout: Duration,
        output: &OutputDir,
    ) -> Result<RunResult> {
        info!(
            "Executing {} tasks with a timeout of {:?}",
            tasks.len(),
            timeout
        );

        let (deadline, cancel) = Deadline::new(timeout);
        let bridge = signal::spawn(cancel);

        let result = self.execute_under(tasks, deadline, output).await;

        // The bridge is parked on signals nobody may ever send; drop it
        // rather than letting it outlive the run.
        bridge.abort();

        result
    }

    /// Execute a batch against a caller-supplied deadline. Callers keep the
    /// corresponding cancel handle and may fire it at any point.
    pub async fn execute_under(
        &self,
        tasks: Vec<Task>,
        deadline: Deadline,
        output: &OutputDir,
    ) -> Result<RunResult> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut result = RunResult::new(run_id.clone());
        info!("Starting run {} with {} tasks", run_id, tasks.len());

        let mut supervised = Vec::new();
        for task in tasks {
            // A task whose sink cannot be opened is skipped entirely; the
            // rest of the batch is unaffected.
            let sink = match output.sink_for(&task) {
                Ok(sink) => sink,
                Err(e) => {
                    warn!("{} skipped: {}", task, e);
                    let mut report = TaskReport::new(&task, None);
                    report.finish(TaskOutcome::SinkUnavailable {
                        message: e.to_string(),
                    });
                    result.add_task_report(report);
                    continue;
                }
            };

            let supervisor = Supervisor::new(task.clone(), self.shell.clone(), deadline.clone());
            supervised.push((task, tokio::spawn(supervisor.run(sink))));
        }

        // Completion barrier: the run resolves only once every supervisor
        // has returned, whatever its outcome.
        let (tasks, handles): (Vec<_>, Vec<_>) = supervised.into_iter().unzip();
        let joined = future::join_all(handles).await;

        for (task, joined) in tasks.into_iter().zip(joined) {
            match joined {
                Ok(report) => result.add_task_report(report),
                Err(e) => {
                    error!("{} supervisor aborted: {}", task, e);
                    let mut report = TaskReport::new(&task, None);
                    report.finish(TaskOutcome::CompletedWithError {
                        message: format!("supervisor aborted: {}", e),
                    });
                    result.add_task_report(report);
                }
            }
        }

        result.mark_completed();
        info!(
            "Run {} finished with status {} ({}/{} tasks completed)",
            run_id,
            result.status,
            result.summary.completed_tasks,
            result.summary.total_tasks
        );

        Ok(result)
    }
}

impl Default for TaskExecutor {
    fn default() -> Self {
        Self::new(ShellConfig::from_env())
    }
}
