// ABOUTME: Bridge from host termination signals to early deadline cancellation
// ABOUTME: Waits for interrupt/terminate/hangup and fires the shared cancel handle once

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::deadline::CancelHandle;

/// Spawn a task that waits for the first host termination signal and fires
/// the cancel handle, then stops listening.
///
/// If no signal ever arrives the task stays parked; callers abort it once
/// the run is over (or abandon it at process exit).
pub fn spawn(handle: CancelHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_termination().await;
        info!("Termination signal received, cancelling all running tasks");
        handle.cancel();
    })
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())
        .map_err(|e| warn!("Failed to install SIGTERM handler: {}", e))
        .ok();
    let mut hangup = signal(SignalKind::hangup())
        .map_err(|e| warn!("Failed to install SIGHUP handler: {}", e))
        .ok();

    tokio::select! {
        _ = interrupt() => {}
        _ = recv_or_pending(&mut terminate) => {}
        _ = recv_or_pending(&mut hangup) => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    interrupt().await;
}

/// Wait for ctrl-c; if the handler cannot be installed, park forever rather
/// than cancelling a healthy run.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for interrupt signals: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn recv_or_pending(stream: &mut Option<tokio::signal::unix::Signal>) {
    match stream {
        Some(stream) => {
            stream.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}
