// ABOUTME: Output module for per-task sinks and the shared run directory
// ABOUTME: Exports OutputDir, TaskSink, and output error types

pub mod error;
pub mod sink;

pub use error::{OutputError, Result};
pub use sink::{OutputDir, TaskSink};
