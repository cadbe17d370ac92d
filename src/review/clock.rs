//! Wall-clock tick source for the round countdown

use std::time::{Duration, Instant};

/// Default length of one countdown tick
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Converts elapsed wall-clock time into whole ticks.
///
/// While paused the clock has no anchor, so time spent in the background
/// is never turned into ticks.
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    anchor: Option<Instant>,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            anchor: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_paused(&self) -> bool {
        self.anchor.is_none()
    }

    /// Start counting from `now`, discarding any partial tick
    pub fn start(&mut self, now: Instant) {
        self.anchor = Some(now);
    }

    pub fn pause(&mut self) {
        self.anchor = None;
    }

    /// Start again after a pause; no-op if already running
    pub fn resume(&mut self, now: Instant) {
        if self.anchor.is_none() {
            self.anchor = Some(now);
        }
    }

    /// Number of whole ticks elapsed since the last poll
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(anchor) = self.anchor else {
            return 0;
        };

        let elapsed = now.saturating_duration_since(anchor);
        let ticks = (elapsed.as_nanos() / self.period.as_nanos()).min(u32::MAX as u128) as u32;
        if ticks > 0 {
            self.anchor = Some(anchor + self.period * ticks);
        }
        ticks
    }

    /// Time left until the next tick, if running
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        let anchor = self.anchor?;
        let next = anchor + self.period;
        Some(next.saturating_duration_since(now))
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
