// ABOUTME: Handle over one spawned OS process with async wait and forced kill
// ABOUTME: Wires a task's shell invocation to its output sink and owns the child

use std::io;
use std::process::ExitStatus;
use tokio::process::Child;
use tracing::debug;

use crate::output::TaskSink;
use crate::task::{ShellConfig, Task};

/// One spawned process, exclusively owned by the supervisor that created it.
///
/// Both stdout and stderr of the child stream into the task's sink; the
/// handle only deals in lifecycle: spawn, wait, kill.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: Option<u32>,
}

impl ProcessHandle {
    /// Spawn the shell invocation for `task`, with combined output going to
    /// `sink`. Fails if the shell binary cannot be started or the sink
    /// cannot hand out stdio handles.
    pub fn spawn(task: &Task, shell: &ShellConfig, sink: &TaskSink) -> io::Result<Self> {
        let mut cmd = shell.command_for(task);
        cmd.stdout(sink.stdio()?);
        cmd.stderr(sink.stdio()?);

        let child = cmd.spawn()?;
        let pid = child.id();
        debug!("{} spawned as {:?} via {}", task, pid, shell.program());

        Ok(Self { child, pid })
    }

    /// OS process id, available while the child has not been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Wait for the process to exit naturally.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Forcibly terminate the process and reap it. Killing a process that
    /// already exited surfaces as an error the caller is expected to
    /// tolerate.
    pub async fn kill(&mut self) -> io::Result<()> {
        self.child.kill().await
    }
}
