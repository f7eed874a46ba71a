#![forbid(unsafe_code)]

//! Tick sources for driving the animation clock.
//!
//! Interactive hosts call [`WallTicker::next_delta`] from their display
//! refresh callback; tests and the headless harness use [`VirtualTicker`],
//! which yields the same fixed step every time so runs are reproducible.

use std::time::Duration;

use web_time::Instant;

/// Default virtual step: one 60Hz frame, rounded to whole milliseconds.
pub const DEFAULT_STEP: Duration = Duration::from_millis(16);

/// Largest delta a [`WallTicker`] reports. Longer stalls (a suspended tab, a
/// debugger pause) are treated as one long frame rather than a jump.
pub const MAX_WALL_DELTA: Duration = Duration::from_millis(100);

/// Anything that yields frame deltas.
pub trait Ticker {
    /// Time elapsed since the previous call.
    fn next_delta(&mut self) -> Duration;
}

/// Fixed-step ticker for deterministic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualTicker {
    step: Duration,
    elapsed: Duration,
}

impl VirtualTicker {
    /// Create a ticker with the given step. A zero step is clamped to 1ms.
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            step: if step.is_zero() {
                Duration::from_millis(1)
            } else {
                step
            },
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Total virtual time handed out so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of steps needed to cover `span` (rounded up).
    #[must_use]
    pub fn steps_for(&self, span: Duration) -> u64 {
        let step = self.step.as_nanos();
        span.as_nanos().div_ceil(step) as u64
    }
}

impl Default for VirtualTicker {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl Ticker for VirtualTicker {
    fn next_delta(&mut self) -> Duration {
        self.elapsed = self.elapsed.saturating_add(self.step);
        self.step
    }
}

/// Wall-clock ticker. The first delta is measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct WallTicker {
    last: Instant,
    max_delta: Duration,
}

impl WallTicker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            max_delta: MAX_WALL_DELTA,
        }
    }

    /// Override the delta cap (builder pattern).
    #[must_use]
    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }
}

impl Default for WallTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker for WallTicker {
    fn next_delta(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        dt.min(self.max_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_ticker_is_fixed() {
        let mut t = VirtualTicker::new(Duration::from_millis(10));
        assert_eq!(t.next_delta(), Duration::from_millis(10));
        assert_eq!(t.next_delta(), Duration::from_millis(10));
        assert_eq!(t.elapsed(), Duration::from_millis(20));
    }

    #[test]
    fn virtual_ticker_zero_step_clamped() {
        let t = VirtualTicker::new(Duration::ZERO);
        assert_eq!(t.step(), Duration::from_millis(1));
    }

    #[test]
    fn steps_for_rounds_up() {
        let t = VirtualTicker::new(Duration::from_millis(16));
        assert_eq!(t.steps_for(Duration::from_millis(400)), 25);
        assert_eq!(t.steps_for(Duration::from_millis(450)), 29);
        assert_eq!(t.steps_for(Duration::ZERO), 0);
    }

    #[test]
    fn wall_ticker_caps_delta() {
        let mut t = WallTicker::new().with_max_delta(Duration::ZERO);
        assert_eq!(t.next_delta(), Duration::ZERO);
    }
}
