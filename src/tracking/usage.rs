use std::collections::BTreeMap;
use std::time::Instant;

/// Per-application elapsed-time ledger.
///
/// Every tick charges the interval since the last switch to whichever app was
/// current when the interval started, then points the clock at the newly
/// observed app. Entries are never removed; totals only grow for the lifetime
/// of the process. Nothing is persisted — a restart starts from zero.
pub struct UsageTracker {
    usage: BTreeMap<String, f64>,
    current_app: Option<String>,
    last_switch: Instant,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self {
            usage: BTreeMap::new(),
            current_app: None,
            last_switch: Instant::now(),
        }
    }

    /// Charge the elapsed interval to the outgoing app and make `active_app`
    /// current. The first call only initializes the clock — no app existed to
    /// charge, so nothing accrues.
    pub fn record_switch(&mut self, active_app: &str) -> &BTreeMap<String, f64> {
        self.record_switch_at(active_app, Instant::now())
    }

    pub fn record_switch_at(&mut self, active_app: &str, now: Instant) -> &BTreeMap<String, f64> {
        if let Some(current) = &self.current_app {
            let elapsed = now.duration_since(self.last_switch).as_secs_f64();
            *self.usage.entry(current.clone()).or_insert(0.0) += elapsed;
        }
        self.current_app = Some(active_app.to_string());
        self.last_switch = now;
        &self.usage
    }

    pub fn ledger(&self) -> &BTreeMap<String, f64> {
        &self.usage
    }

    pub fn current_app(&self) -> Option<&str> {
        self.current_app.as_deref()
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new()
    }
}
