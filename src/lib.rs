mod connectivity;
mod probes;
mod settings;
mod shutdown;
mod sink;
mod tracking;

pub use settings::Settings;

use anyhow::Result;
use log::info;
use tokio_util::sync::CancellationToken;

use connectivity::NetGate;
use probes::HostProbes;
use shutdown::ExitKind;
use sink::TcpSink;
use tracking::Tracker;

/// Wire everything up and run until the OS asks us to stop.
///
/// The loop owns all mutable state and runs as its own task; this task only
/// waits for an exit signal. There is no graceful drain: at-most-once
/// delivery lets us abandon whatever the loop was doing mid-flight.
pub async fn run(settings: Settings) -> Result<()> {
    info!("watchpost starting up...");

    let sink = TcpSink::new(settings.sink_addr.clone());
    let gate = NetGate::new(settings.probe_addr.clone(), settings.probe_timeout());
    let collection = settings.collection.clone();

    let tracker = Tracker::new(settings, gate, HostProbes::new(), sink.clone());

    let cancel = CancellationToken::new();
    let loop_task = tokio::spawn(tracker.run(cancel.child_token()));

    let kind = shutdown::wait_for_exit().await?;
    if kind == ExitKind::EndSession {
        shutdown::log_session_end(&sink, &collection).await;
    }

    cancel.cancel();
    loop_task.abort();
    info!("watchpost exiting");
    Ok(())
}
