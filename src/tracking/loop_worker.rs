use log::{info, warn};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::record::compose;
use super::resume::ResumeDetector;
use super::usage::UsageTracker;
use crate::connectivity::Connectivity;
use crate::probes::SystemProbes;
use crate::settings::Settings;
use crate::sink::{deliver, DocumentSink};

/// What a single loop iteration did, which decides how long to sleep before
/// the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Offline: nothing sampled, nothing accumulated, retry soon.
    Gated,
    /// A record was composed and handed to the sink (delivered or not).
    Logged,
}

/// The sampling loop. Owns every piece of mutable state — the usage ledger,
/// the resume watermark, and the probe handle — so exactly one instance runs
/// per process and no locking is needed.
pub struct Tracker<C, P, S> {
    gate: C,
    probes: P,
    sink: S,
    usage: UsageTracker,
    resume: ResumeDetector,
    settings: Settings,
}

impl<C, P, S> Tracker<C, P, S>
where
    C: Connectivity,
    P: SystemProbes,
    S: DocumentSink,
{
    pub fn new(settings: Settings, gate: C, probes: P, sink: S) -> Self {
        let resume = ResumeDetector::new(settings.resume_threshold_ms);
        Self {
            gate,
            probes,
            sink,
            usage: UsageTracker::new(),
            resume,
            settings,
        }
    }

    /// Run forever, alternating tick and sleep, until cancelled. The loop has
    /// no terminal error state: every failure inside a tick degrades or is
    /// dropped, and only process termination ends the cycle.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            "tracking loop started (sampling every {}s, offline retry {}s)",
            self.settings.sample_interval_secs, self.settings.offline_retry_secs
        );

        loop {
            let delay = match self.tick().await {
                TickOutcome::Gated => self.settings.offline_retry(),
                TickOutcome::Logged => self.settings.sample_interval(),
            };

            tokio::select! {
                _ = sleep(delay) => {}
                _ = cancel.cancelled() => {
                    info!("tracking loop shutting down");
                    break;
                }
            }
        }
    }

    /// One iteration: gate, resume check, sample, accumulate, compose,
    /// deliver. While gated nothing advances — the usage clock deliberately
    /// pauses on whichever app was current when connectivity dropped.
    async fn tick(&mut self) -> TickOutcome {
        if !self.gate.is_connected().await {
            warn!("no network path to the log store, pausing sampling");
            return TickOutcome::Gated;
        }

        let resumed = self.resume.observe(self.probes.tick_count_ms());
        if resumed {
            info!("tick counter discontinuity, marking sample as resumed from sleep");
        }

        let raw = self.probes.sample();
        let ledger = self.usage.record_switch(&raw.active_app);
        let record = compose(raw, ledger, resumed);

        info!(
            "logging activity: app={:?} idle={:.1}s apps={} resumed={}",
            record.active_app,
            record.idle_time_secs,
            record.apps.len(),
            record.resumed_from_sleep
        );
        deliver(&self.sink, &self.settings.collection, &record).await;

        TickOutcome::Logged
    }
}
