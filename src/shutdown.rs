use anyhow::Result;
use log::warn;
use std::time::Duration;
use tokio::time::timeout;

use crate::sink::{deliver, DocumentSink};
use crate::tracking::ShutdownEvent;

/// Upper bound on the farewell delivery so the agent never stalls an OS
/// shutdown sequence.
const SESSION_END_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// User asked the agent to quit; exit immediately, nothing to log.
    Interrupt,
    /// The OS session is ending; log one shutdown event on the way out.
    EndSession,
}

/// Block until the OS tells us to go away, classifying why.
#[cfg(windows)]
pub async fn wait_for_exit() -> Result<ExitKind> {
    use tokio::signal::windows::{ctrl_c, ctrl_logoff, ctrl_shutdown};

    let mut interrupt = ctrl_c()?;
    let mut logoff = ctrl_logoff()?;
    let mut shutdown = ctrl_shutdown()?;

    let kind = tokio::select! {
        _ = interrupt.recv() => ExitKind::Interrupt,
        _ = logoff.recv() => ExitKind::EndSession,
        _ = shutdown.recv() => ExitKind::EndSession,
    };
    Ok(kind)
}

#[cfg(not(windows))]
pub async fn wait_for_exit() -> Result<ExitKind> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;

    let kind = tokio::select! {
        _ = tokio::signal::ctrl_c() => ExitKind::Interrupt,
        _ = terminate.recv() => ExitKind::EndSession,
    };
    Ok(kind)
}

/// One best-effort shutdown event, bounded in time. Failures are already
/// logged and swallowed by the delivery adapter; a timeout only warns.
pub async fn log_session_end<S: DocumentSink>(sink: &S, collection: &str) {
    let event = ShutdownEvent::now();
    if timeout(SESSION_END_TIMEOUT, deliver(sink, collection, &event))
        .await
        .is_err()
    {
        warn!("shutdown event delivery timed out");
    }
}
