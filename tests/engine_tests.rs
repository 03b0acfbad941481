// ABOUTME: Integration tests for the task supervision engine
// ABOUTME: Tests deadline enforcement, cancellation, isolation, and output capture

#![cfg(unix)]

use std::time::{Duration, Instant};
use tempfile::TempDir;

use drover::engine::{CancelCause, Deadline, RunStatus, TaskExecutor, TaskOutcome};
use drover::output::OutputDir;
use drover::task::{ShellConfig, Task};

fn output_in(dir: &TempDir) -> OutputDir {
    OutputDir::create(dir.path(), chrono::Local::now()).unwrap()
}

fn sh_executor() -> TaskExecutor {
    TaskExecutor::new(ShellConfig::new("/bin/sh"))
}

#[tokio::test]
async fn test_empty_batch_unblocks_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    let start = Instant::now();
    let result = sh_executor()
        .execute(Vec::new(), Duration::from_secs(30), &output)
        .await
        .unwrap();

    assert_eq!(result.status, RunStatus::Success);
    assert_eq!(result.summary.total_tasks, 0);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_fast_tasks_complete_without_kill() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);
    let tasks = Task::from_commands(vec!["echo alpha", "echo beta"]);

    let result = sh_executor()
        .execute(tasks, Duration::from_secs(30), &output)
        .await
        .unwrap();

    assert_eq!(result.status, RunStatus::Success);
    for report in &result.tasks {
        assert!(report.outcome.is_completed());
        assert!(report.pid.is_some());
        assert!(report.end_time.is_some());
    }
}

#[tokio::test]
async fn test_deadline_kills_only_the_slow_task() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);
    let tasks = Task::from_commands(vec!["sleep 1", "sleep 5", "sleep 1"]);

    let start = Instant::now();
    let result = sh_executor()
        .execute(tasks, Duration::from_secs(2), &output)
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result.status, RunStatus::PartialSuccess);
    assert!(result.get_task_report(0).unwrap().outcome.is_completed());
    assert_eq!(
        result.get_task_report(1).unwrap().outcome,
        TaskOutcome::Killed {
            cause: CancelCause::TimeoutExceeded
        }
    );
    assert!(result.get_task_report(2).unwrap().outcome.is_completed());

    // The whole run is bounded by the deadline, not by the slowest task.
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(4));
}

#[tokio::test]
async fn test_external_cancellation_spares_finished_tasks() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);
    let tasks = Task::from_commands(vec!["echo quick", "sleep 30", "sleep 30"]);

    let (deadline, handle) = Deadline::new(Duration::from_secs(60));
    let executor = sh_executor();

    let (result, _) = tokio::join!(executor.execute_under(tasks, deadline, &output), async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        handle.cancel();
        // Firing again must change nothing.
        handle.cancel();
    });
    let result = result.unwrap();

    assert!(result.get_task_report(0).unwrap().outcome.is_completed());
    for index in [1, 2] {
        assert_eq!(
            result.get_task_report(index).unwrap().outcome,
            TaskOutcome::Killed {
                cause: CancelCause::CancelledExternally
            }
        );
    }
}

#[tokio::test]
async fn test_start_failure_is_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);

    // The second shell invocation cannot start; the echo tasks run through
    // a working shell in the same batch by giving each task its own
    // supervisor run against a shared deadline.
    let (deadline, _handle) = Deadline::new(Duration::from_secs(30));

    let good = Task::new(0, "echo still running");
    let bad = Task::new(1, "echo unreachable");

    let good_sink = output.sink_for(&good).unwrap();
    let bad_sink = output.sink_for(&bad).unwrap();

    let good_run = drover::engine::Supervisor::new(
        good.clone(),
        ShellConfig::new("/bin/sh"),
        deadline.clone(),
    )
    .run(good_sink);
    let bad_run =
        drover::engine::Supervisor::new(bad, ShellConfig::new("/nonexistent/shell"), deadline)
            .run(bad_sink);

    let (good_report, bad_report) = tokio::join!(good_run, bad_run);

    assert!(good_report.outcome.is_completed());
    assert!(matches!(
        bad_report.outcome,
        TaskOutcome::StartFailed { .. }
    ));

    let written = std::fs::read_to_string(good_report.output_path.unwrap()).unwrap();
    assert!(written.contains("still running"));
}

#[tokio::test]
async fn test_each_sink_holds_only_its_own_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);
    let tasks = Task::from_commands(vec![
        "echo output-of-task-zero",
        "echo output-of-task-one; echo stderr-of-task-one 1>&2",
    ]);

    let result = sh_executor()
        .execute(tasks, Duration::from_secs(30), &output)
        .await
        .unwrap();

    let zero = std::fs::read_to_string(
        result.get_task_report(0).unwrap().output_path.as_ref().unwrap(),
    )
    .unwrap();
    let one = std::fs::read_to_string(
        result.get_task_report(1).unwrap().output_path.as_ref().unwrap(),
    )
    .unwrap();

    assert!(zero.contains("output-of-task-zero"));
    assert!(!zero.contains("task-one"));

    // stdout and stderr of one task land combined in its sink.
    assert!(one.contains("output-of-task-one"));
    assert!(one.contains("stderr-of-task-one"));
    assert!(!one.contains("task-zero"));
}

#[tokio::test]
async fn test_killed_process_is_gone_afterwards() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);
    let tasks = Task::from_commands(vec!["sleep 30"]);

    let result = sh_executor()
        .execute(tasks, Duration::from_millis(300), &output)
        .await
        .unwrap();

    let report = result.get_task_report(0).unwrap();
    assert!(report.outcome.is_killed());

    // After the run returns the killed pid must no longer exist (or at
    // least no longer be our child); signal 0 probes for existence.
    if let Some(pid) = report.pid {
        assert!(!pid_alive(pid), "process {} still running after kill", pid);
    }
}

/// Probe a pid with `kill -0` via the shell.
fn pid_alive(pid: u32) -> bool {
    std::process::Command::new("/bin/sh")
        .arg("-c")
        .arg(format!("kill -0 {} 2>/dev/null", pid))
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn test_run_summary_counts() {
    let temp_dir = TempDir::new().unwrap();
    let output = output_in(&temp_dir);
    let tasks = Task::from_commands(vec!["echo fine", "exit 7", "sleep 30"]);

    let result = sh_executor()
        .execute(tasks, Duration::from_secs(1), &output)
        .await
        .unwrap();

    assert_eq!(result.summary.total_tasks, 3);
    assert_eq!(result.summary.completed_tasks, 1);
    assert_eq!(result.summary.failed_tasks, 1);
    assert_eq!(result.summary.killed_tasks, 1);
    assert_eq!(result.status, RunStatus::PartialSuccess);
}
