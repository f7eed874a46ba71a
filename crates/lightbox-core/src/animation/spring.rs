#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) animation.
//!
//! Provides physically-based motion for the expand transition. Based on the
//! classical damped spring equation:
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): Restoring force strength. Higher = faster response.
//!   Typical range: 100–400 for UI motion.
//! - **damping** (c): Velocity drag. Higher = less oscillation.
//!   - Underdamped (c < 2√k): oscillates past target before settling
//!   - Critically damped (c ≈ 2√k): fastest convergence without overshoot
//!   - Overdamped (c > 2√k): slow convergence, no overshoot
//!
//! # Integration
//!
//! Uses semi-implicit Euler integration for stability. Large deltas are
//! subdivided into steps of at most 4ms.
//!
//! # Invariants
//!
//! 1. `value()` returns the position clamped to [0.0, 1.0].
//! 2. `position()` returns the raw (unclamped) position, which is what the
//!    animation clock samples so an interrupted spring hands over its true
//!    location.
//! 3. A spring at rest (`is_complete() == true`) snaps exactly onto its
//!    target and does not resume unless `set_target()` or `reset()` is called.
//! 4. Stiffness is clamped to a minimum of 0.1, damping to 0.0.
//!
//! # Failure Modes
//!
//! - Zero damping: the spring oscillates forever and never completes. The
//!   clock will keep the run alive; nothing else is blocked.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Default rest threshold: position delta below which the spring is "at rest".
const DEFAULT_REST_THRESHOLD: f64 = 0.001;

/// Velocity below which (combined with position threshold) the spring is at rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.01;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

/// Stiffness/damping pair, the configuration-level description of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
}

impl SpringParams {
    /// Slightly underdamped: a subtle bounce past the target.
    pub const DEFAULT: SpringParams = SpringParams {
        stiffness: 170.0,
        damping: 26.0,
    };

    /// Low stiffness, high damping. Smooth and slow.
    pub const GENTLE: SpringParams = SpringParams {
        stiffness: 120.0,
        damping: 20.0,
    };

    /// High stiffness, low damping. Visible oscillation.
    pub const BOUNCY: SpringParams = SpringParams {
        stiffness: 300.0,
        damping: 10.0,
    };

    /// High stiffness, near-critical damping. Snappy response.
    pub const STIFF: SpringParams = SpringParams {
        stiffness: 400.0,
        damping: 38.0,
    };

    /// Critically damped spring for the given stiffness.
    #[must_use]
    pub fn critical(stiffness: f64) -> Self {
        let k = stiffness.max(MIN_STIFFNESS);
        Self {
            stiffness: k,
            damping: 2.0 * k.sqrt(),
        }
    }

    /// Damping at which this stiffness stops oscillating.
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.max(MIN_STIFFNESS).sqrt()
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A damped harmonic oscillator producing physically-based motion.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`, using
    /// [`SpringParams::DEFAULT`].
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            stiffness: SpringParams::DEFAULT.stiffness,
            damping: SpringParams::DEFAULT.damping,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        }
    }

    /// Create a spring from `initial` to `target` with the given parameters.
    #[must_use]
    pub fn with_params(initial: f64, target: f64, params: SpringParams) -> Self {
        Self::new(initial, target)
            .with_stiffness(params.stiffness)
            .with_damping(params.damping)
    }

    /// Set stiffness (builder pattern). Clamped to minimum 0.1.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    /// Set damping (builder pattern). Clamped to minimum 0.0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    /// Start with an initial velocity (builder pattern).
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Change the target. Wakes the spring if it was at rest.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Perform a single integration step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let spring_force = -self.stiffness * displacement;
        let damping_force = -self.damping * self.velocity;
        let acceleration = spring_force + damping_force;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        let pos_delta = (self.position - self.target).abs();
        let vel_abs = self.velocity.abs();
        if pos_delta < self.rest_threshold && vel_abs < self.velocity_threshold {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    /// Returns the spring position clamped to [0.0, 1.0].
    fn value(&self) -> f32 {
        (self.position as f32).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = false;
    }
}
