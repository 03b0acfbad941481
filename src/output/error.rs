// ABOUTME: Error types for output directory and sink handling
// ABOUTME: Distinguishes fatal directory failures from per-task sink failures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    /// The shared output directory cannot be created or used. Fatal to the
    /// whole run; nothing is started.
    #[error("Output directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// One task's output file could not be opened. Local to that task.
    #[error("Output sink unavailable for task [{index:02}]: {path}: {source}")]
    SinkUnavailable {
        index: usize,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;
