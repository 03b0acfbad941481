// ABOUTME: Dated output directory and per-task output sinks
// ABOUTME: Creates outputs-YYYYMMDD folders and one append-mode file per task

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, info};

use super::error::{OutputError, Result};
use crate::task::Task;

/// The run's shared output directory: `outputs-YYYYMMDD` under a base path,
/// with every task file suffixed by the run's start time.
///
/// Created before any task starts. An existing directory with the same name
/// is reused; anything else in the way is fatal to the run.
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
    file_suffix: String,
}

impl OutputDir {
    pub fn create(base: &Path, start_time: DateTime<Local>) -> Result<Self> {
        let path = base.join(format!("outputs-{}", start_time.format("%Y%m%d")));

        std::fs::create_dir_all(&path).map_err(|source| OutputError::DirectoryUnavailable {
            path: path.clone(),
            source,
        })?;

        info!("Using output directory {}", path.display());

        Ok(Self {
            path,
            file_suffix: format!("{}.txt", start_time.format("%H%M%S")),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the output file for one task: `<index>.<HHMMSS>.txt`.
    pub fn file_path_for(&self, task: &Task) -> PathBuf {
        self.path
            .join(format!("{}.{}", task.index, self.file_suffix))
    }

    /// Open the sink for one task. Must be called before the task's process
    /// is spawned; failure skips the task without touching the others.
    pub fn sink_for(&self, task: &Task) -> Result<TaskSink> {
        let path = self.file_path_for(task);
        TaskSink::create(path.clone()).map_err(|source| OutputError::SinkUnavailable {
            index: task.index,
            path,
            source,
        })
    }
}

/// Byte sink bound 1:1 to a task for the lifetime of that task's execution.
///
/// Owns the open file; both stdout and stderr of the child process are
/// redirected into it. The sink must stay alive until the process has fully
/// exited or been killed.
#[derive(Debug)]
pub struct TaskSink {
    path: PathBuf,
    file: File,
}

impl TaskSink {
    pub fn create(path: PathBuf) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        debug!("Opened output sink {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A process stdio handle backed by this sink. Called once for stdout
    /// and once for stderr so both streams land in the same file.
    pub fn stdio(&self) -> io::Result<Stdio> {
        Ok(Stdio::from(self.file.try_clone()?))
    }
}
