// ABOUTME: Error types for the task supervision engine
// ABOUTME: Defines error variants for spawning, killing, and run-level failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Output error: {0}")]
    OutputError(#[from] crate::output::OutputError),

    #[error("Failed to start task [{index:02}]: {source}")]
    StartFailed {
        index: usize,
        source: std::io::Error,
    },

    #[error("Failed to kill process for task [{index:02}]: {source}")]
    KillFailed {
        index: usize,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
