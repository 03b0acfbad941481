// ABOUTME: Per-task outcome types and run-level result aggregation
// ABOUTME: Defines TaskReport, RunResult, and summary structures for a batch run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use super::deadline::CancelCause;
use crate::task::Task;

/// Terminal state of one task. Exactly one of these is recorded per task
/// index in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Process exited on its own with a success status.
    Completed { exit_code: i32 },
    /// Process exited on its own with a failure (non-zero exit or signal).
    CompletedWithError { message: String },
    /// Process was forcibly terminated after the shared deadline fired.
    Killed { cause: CancelCause },
    /// Process could not be spawned at all.
    StartFailed { message: String },
    /// The task's output destination could not be opened; never started.
    SinkUnavailable { message: String },
}

impl TaskOutcome {
    pub fn from_exit_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => TaskOutcome::Completed { exit_code: 0 },
            Some(code) => TaskOutcome::CompletedWithError {
                message: format!("exited with code {}", code),
            },
            None => TaskOutcome::CompletedWithError {
                message: "terminated by signal".to_string(),
            },
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskOutcome::Completed { .. })
    }

    pub fn is_killed(&self) -> bool {
        matches!(self, TaskOutcome::Killed { .. })
    }
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskOutcome::Completed { exit_code } => write!(f, "completed (exit {})", exit_code),
            TaskOutcome::CompletedWithError { message } => {
                write!(f, "completed with error: {}", message)
            }
            TaskOutcome::Killed { cause } => write!(f, "killed ({})", cause),
            TaskOutcome::StartFailed { message } => write!(f, "failed to start: {}", message),
            TaskOutcome::SinkUnavailable { message } => {
                write!(f, "output sink unavailable: {}", message)
            }
        }
    }
}

/// Record of one supervised task, from submission to terminal outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub index: usize,
    pub command: String,
    pub pid: Option<u32>,
    pub outcome: TaskOutcome,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub output_path: Option<PathBuf>,
}

impl TaskReport {
    pub fn new(task: &Task, output_path: Option<PathBuf>) -> Self {
        Self {
            index: task.index,
            command: task.command.clone(),
            pid: None,
            // Overwritten by `finish`; StartFailed is the conservative
            // state for a report that never reached a terminal outcome.
            outcome: TaskOutcome::StartFailed {
                message: "not started".to_string(),
            },
            start_time: Utc::now(),
            end_time: None,
            duration: None,
            output_path,
        }
    }

    pub fn finish(&mut self, outcome: TaskOutcome) {
        self.outcome = outcome;
        let now = Utc::now();
        self.end_time = Some(now);
        self.duration = Some((now - self.start_time).to_std().unwrap_or(Duration::ZERO));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Success,
    PartialSuccess,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Success => write!(f, "success"),
            RunStatus::PartialSuccess => write!(f, "partial_success"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub killed_tasks: usize,
    pub start_failed_tasks: usize,
    pub skipped_tasks: usize,
    pub success_rate: f64,
}

/// Aggregated result of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub status: RunStatus,
    pub tasks: Vec<TaskReport>,
    pub summary: RunSummary,
}

impl RunResult {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            start_time: Utc::now(),
            end_time: None,
            duration: None,
            status: RunStatus::Running,
            tasks: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn add_task_report(&mut self, report: TaskReport) {
        self.tasks.push(report);
        self.update_summary();
    }

    pub fn get_task_report(&self, index: usize) -> Option<&TaskReport> {
        self.tasks.iter().find(|t| t.index == index)
    }

    pub fn mark_completed(&mut self) {
        self.tasks.sort_by_key(|t| t.index);
        let now = Utc::now();
        self.end_time = Some(now);
        self.duration = Some((now - self.start_time).to_std().unwrap_or(Duration::ZERO));
        self.update_status();
        self.update_summary();
    }

    pub fn has_failures(&self) -> bool {
        self.tasks.iter().any(|t| !t.outcome.is_completed())
    }

    fn update_status(&mut self) {
        if self.tasks.is_empty() {
            self.status = RunStatus::Success;
            return;
        }

        let completed = self.tasks.iter().filter(|t| t.outcome.is_completed()).count();

        self.status = if completed == self.tasks.len() {
            RunStatus::Success
        } else if completed > 0 {
            RunStatus::PartialSuccess
        } else {
            RunStatus::Failed
        };
    }

    fn update_summary(&mut self) {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.outcome.is_completed()).count();
        let failed = self
            .tasks
            .iter()
            .filter(|t| matches!(t.outcome, TaskOutcome::CompletedWithError { .. }))
            .count();
        let killed = self.tasks.iter().filter(|t| t.outcome.is_killed()).count();
        let start_failed = self
            .tasks
            .iter()
            .filter(|t| matches!(t.outcome, TaskOutcome::StartFailed { .. }))
            .count();
        let skipped = self
            .tasks
            .iter()
            .filter(|t| matches!(t.outcome, TaskOutcome::SinkUnavailable { .. }))
            .count();

        let success_rate = if total > 0 {
            (completed as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        self.summary = RunSummary {
            total_tasks: total,
            completed_tasks: completed,
            failed_tasks: failed,
            killed_tasks: killed,
            start_failed_tasks: start_failed,
            skipped_tasks: skipped,
            success_rate,
        };
    }
}
