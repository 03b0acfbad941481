// ABOUTME: Main library module for the drover parallel command runner
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod engine;
pub mod output;
pub mod task;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use engine::{
    CancelCause, CancelHandle, Deadline, RunResult, RunStatus, TaskExecutor, TaskOutcome,
    TaskReport,
};
pub use output::{OutputDir, TaskSink};
pub use task::{ShellConfig, Task};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
