/// Infers sleep/resume transitions from the OS monotonic tick counter.
///
/// A resume is reported when the counter went backwards (it reset, implying a
/// reboot) or jumped forward further than the polling cadence can explain.
/// This is a heuristic: a loop stall longer than the threshold also reads as
/// a resume, which is accepted.
pub struct ResumeDetector {
    threshold_ms: u64,
    last_tick_ms: Option<u64>,
}

impl ResumeDetector {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            threshold_ms,
            last_tick_ms: None,
        }
    }

    /// Compare `tick_ms` against the previous reading and advance the
    /// watermark. The first observation is the baseline and never reports a
    /// resume.
    pub fn observe(&mut self, tick_ms: u64) -> bool {
        let resumed = match self.last_tick_ms {
            None => false,
            Some(prev) => tick_ms < prev || tick_ms - prev > self.threshold_ms,
        };
        self.last_tick_ms = Some(tick_ms);
        resumed
    }

    #[cfg(test)]
    pub(crate) fn last_tick_ms(&self) -> Option<u64> {
        self.last_tick_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u64 = 60_000;

    #[test]
    fn first_observation_is_a_baseline() {
        let mut detector = ResumeDetector::new(THRESHOLD);
        assert!(!detector.observe(1_000));
        assert_eq!(detector.last_tick_ms(), Some(1_000));
    }

    #[test]
    fn forward_delta_within_threshold_is_not_a_resume() {
        let mut detector = ResumeDetector::new(THRESHOLD);
        detector.observe(1_000);
        assert!(!detector.observe(1_000)); // zero delta
        assert!(!detector.observe(31_000));
        assert!(!detector.observe(31_000 + THRESHOLD)); // exactly at threshold
    }

    #[test]
    fn forward_delta_past_threshold_is_a_resume() {
        let mut detector = ResumeDetector::new(THRESHOLD);
        detector.observe(1_000);
        assert!(detector.observe(1_000 + THRESHOLD + 1));
    }

    #[test]
    fn counter_wrap_is_a_resume() {
        let mut detector = ResumeDetector::new(THRESHOLD);
        let flags: Vec<bool> = [1_000, 1_500, 500]
            .into_iter()
            .map(|tick| detector.observe(tick))
            .collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn watermark_advances_even_on_a_resume() {
        let mut detector = ResumeDetector::new(THRESHOLD);
        detector.observe(500_000);
        assert!(detector.observe(100)); // wrapped
        assert_eq!(detector.last_tick_ms(), Some(100));
        // The next in-cadence reading is quiet again.
        assert!(!detector.observe(60_100));
    }
}
