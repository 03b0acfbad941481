// ABOUTME: Task supervision engine module for the drover command runner
// ABOUTME: Handles deadline coordination, process supervision, and run aggregation

pub mod deadline;
pub mod error;
pub mod executor;
pub mod process;
pub mod result;
pub mod signal;
pub mod supervisor;

pub use deadline::{CancelCause, CancelHandle, Deadline};
pub use error::{ExecutionError, Result};
pub use executor::TaskExecutor;
pub use process::ProcessHandle;
pub use result::{RunResult, RunStatus, RunSummary, TaskOutcome, TaskReport};
pub use supervisor::Supervisor;
