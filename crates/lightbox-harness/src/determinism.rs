#![forbid(unsafe_code)]

//! Deterministic fixtures for harness runs.
//!
//! Centralizes seed selection, run identifiers, and timestamps so scripted
//! runs produce stable JSONL and stable digests. Frame records only ever
//! carry virtual time; the wall clock leaks in through [`timestamp`] alone,
//! and only when deterministic mode is off.
//!
//! [`timestamp`]: DeterminismFixture::timestamp

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seed used when `LIGHTBOX_SEED` is unset.
pub const DEFAULT_SEED: u64 = 0x5EED_1B0C;

/// Shared deterministic fixture for one run.
#[derive(Debug)]
pub struct DeterminismFixture {
    seed: u64,
    deterministic: bool,
    time_step: Duration,
    run_id: String,
    ts_counter: AtomicU64,
}

impl DeterminismFixture {
    /// Create a fixture from `LIGHTBOX_*` environment variables.
    pub fn new(prefix: &str, default_seed: u64) -> Self {
        Self::new_with(
            prefix,
            fixture_seed(default_seed),
            deterministic_mode(),
            fixture_time_step(),
        )
    }

    /// Create a fixture with explicit configuration (used by tests).
    pub fn new_with(prefix: &str, seed: u64, deterministic: bool, time_step: Duration) -> Self {
        let run_id = if deterministic {
            format!("{prefix}_seed{seed}")
        } else {
            format!("{prefix}_{}_{}", std::process::id(), unix_secs())
        };
        Self {
            seed,
            deterministic,
            time_step,
            run_id,
            ts_counter: AtomicU64::new(0),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    /// Virtual tick length for the run.
    pub fn time_step(&self) -> Duration {
        self.time_step
    }

    /// Stable run identifier for JSONL logs.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Return a deterministic timestamp string (or wall time if disabled).
    pub fn timestamp(&self) -> String {
        if self.deterministic {
            let n = self.ts_counter.fetch_add(1, Ordering::Relaxed);
            format!("T{n:06}")
        } else {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            format!("{}.{:03}", now.as_secs(), now.subsec_millis())
        }
    }
}

/// True when deterministic mode is enabled via `LIGHTBOX_DETERMINISTIC`.
pub fn deterministic_mode() -> bool {
    env_flag("LIGHTBOX_DETERMINISTIC")
}

/// Seed from `LIGHTBOX_SEED`, or `default_seed`.
pub fn fixture_seed(default_seed: u64) -> u64 {
    env_u64("LIGHTBOX_SEED").unwrap_or(default_seed)
}

/// Tick length from `LIGHTBOX_TIME_STEP_MS` (default 16ms).
pub fn fixture_time_step() -> Duration {
    env_u64("LIGHTBOX_TIME_STEP_MS")
        .filter(|&ms| ms > 0)
        .map_or(lightbox_core::ticker::DEFAULT_STEP, Duration::from_millis)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_timestamps_are_monotonic() {
        let fixture =
            DeterminismFixture::new_with("fixture_ts", 123, true, Duration::from_millis(7));
        assert_eq!(fixture.timestamp(), "T000000");
        assert_eq!(fixture.timestamp(), "T000001");
    }

    #[test]
    fn deterministic_run_id_is_stable() {
        let a = DeterminismFixture::new_with("lb", 9, true, Duration::from_millis(16));
        let b = DeterminismFixture::new_with("lb", 9, true, Duration::from_millis(16));
        assert_eq!(a.run_id(), "lb_seed9");
        assert_eq!(a.run_id(), b.run_id());
    }

    #[test]
    fn wall_clock_run_id_carries_pid() {
        let fixture = DeterminismFixture::new_with("lb", 9, false, Duration::from_millis(16));
        assert!(fixture.run_id().contains(&std::process::id().to_string()));
        assert!(!fixture.timestamp().starts_with('T'));
    }
}
