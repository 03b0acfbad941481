// ABOUTME: Command implementations for the drover CLI
// ABOUTME: Handles execution of the run and tasks commands

use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use super::config::Config;
use crate::engine::{RunStatus, TaskExecutor};
use crate::output::OutputDir;
use crate::task::{self, ShellConfig, Task};

/// Execute a batch of commands under a shared deadline.
pub async fn run_tasks(
    tasks: Vec<String>,
    timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
    shell: Option<String>,
    summary: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let timeout = match timeout_secs {
        Some(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            info!(
                "Using default timeout of {:?} for all tasks",
                config.default_timeout
            );
            config.default_timeout
        }
    };

    let commands = if tasks.is_empty() {
        warn!("No tasks provided for execution, using the default demo set");
        task::default_tasks()
    } else {
        tasks
    };

    let tasks = Task::from_commands(commands);
    info!(
        "Detected {} tasks to execute with a timeout of {:?}",
        tasks.len(),
        timeout
    );

    // Shared prerequisite: without the output directory nothing starts.
    let base = output_dir.unwrap_or_else(|| config.output_dir.clone());
    let output = OutputDir::create(&base, Local::now())?;

    let shell = shell
        .or_else(|| config.shell.clone())
        .map(ShellConfig::new)
        .unwrap_or_default();

    let executor = TaskExecutor::new(shell);
    let result = executor.execute(tasks, timeout, &output).await?;

    println!(
        "Run {} finished with status: {}",
        result.run_id, result.status
    );
    for report in &result.tasks {
        println!("  task [{:02}] {}: {}", report.index, report.command, report.outcome);
        if let Some(ref path) = report.output_path {
            println!("    output: {}", path.display());
        }
    }

    if let Some(summary_path) = summary {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&summary_path, json)?;
        info!("Run summary written to {}", summary_path.display());
    }

    // Non-zero exit unless every task completed.
    match result.status {
        RunStatus::Success => Ok(()),
        status => Err(anyhow::anyhow!("Run finished with status: {}", status)),
    }
}

/// Print the default demo command set for this platform.
pub async fn list_tasks() -> Result<()> {
    for (index, command) in task::default_tasks().iter().enumerate() {
        println!("  [{:02}] {}", index, command);
    }
    Ok(())
}
