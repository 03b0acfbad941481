// ABOUTME: Task model and platform-specific shell invocation handling
// ABOUTME: Defines the Task type, default demo task lists, and shell command translation

use std::process::Stdio;
use tokio::process::Command;

/// One external command to execute, identified by its 0-based position in
/// the submitted batch. The index doubles as the identity used for output
/// file naming and log lines. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub index: usize,
    pub command: String,
}

impl Task {
    pub fn new(index: usize, command: impl Into<String>) -> Self {
        Self {
            index,
            command: command.into(),
        }
    }

    /// Build a task list from raw command strings, assigning ordinal indices.
    pub fn from_commands<I, S>(commands: I) -> Vec<Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        commands
            .into_iter()
            .enumerate()
            .map(|(index, command)| Task::new(index, command))
            .collect()
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task [{:02}]", self.index)
    }
}

/// Translation of an opaque task string into a platform shell invocation.
///
/// Each task string is handed to a single shell invocation: `cmd /C` on
/// Windows, `$SHELL -c` (default `/bin/sh`) everywhere else. No quoting or
/// pipeline behavior is guaranteed beyond what that shell provides.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    program: String,
}

impl ShellConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the shell from the environment, falling back to the platform
    /// default when `SHELL` is unset or empty.
    pub fn from_env() -> Self {
        if cfg!(windows) {
            return Self::new("cmd");
        }

        match std::env::var("SHELL") {
            Ok(shell) if !shell.is_empty() => Self::new(shell),
            _ => Self::new("/bin/sh"),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the process invocation for a task. Output streams are left for
    /// the caller to wire up; stdin is always closed.
    pub fn command_for(&self, task: &Task) -> Command {
        let mut cmd = Command::new(&self.program);

        if cfg!(windows) {
            cmd.arg("/C");
        } else {
            cmd.arg("-c");
        }

        cmd.arg(&task.command);
        cmd.stdin(Stdio::null());
        cmd
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Demo task list used when no tasks are supplied on the command line.
pub fn default_tasks() -> Vec<String> {
    let commands: &[&str] = if cfg!(windows) {
        &[
            "systeminfo",
            "tasklist",
            "netstat -n 5",
            "ping 8.8.8.8 -t",
            "ipconfig /all",
        ]
    } else {
        &[
            "uname -a",
            "df -h",
            "ps aux",
            "netstat -an",
            "ping 8.8.8.8",
        ]
    };

    commands.iter().map(|c| c.to_string()).collect()
}
