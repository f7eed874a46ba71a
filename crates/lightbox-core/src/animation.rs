#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! Time-based animations that produce normalized `f32` values (0.0–1.0),
//! plus the [`clock`] that drives named progress values with them.
//!
//! The layering is:
//!
//! - easing functions and the named [`Easing`] curve,
//! - the [`Animation`] trait with the [`Fade`] (timing) and
//!   [`spring::Spring`] implementations, and the [`Delayed`] wrapper,
//! - [`Curve`], the configuration-level choice between timing and spring,
//! - [`interpolate`], which maps progress onto visual properties,
//! - [`clock::AnimationClock`], which owns progress values and runs.

pub mod clock;
pub mod interpolate;
pub mod spring;

use std::time::Duration;

pub use clock::{AnimateOptions, AnimationClock, ClockEvent, ProgressHandle, RunId};
pub use interpolate::{interpolate, interpolate_rect, lerp};
pub use spring::{Spring, SpringParams};

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-in (slower start than quadratic).
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out (slower end than quadratic).
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Named easing curve, for configuration.
///
/// Every variant is monotonic and maps 0 → 0 and 1 → 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    /// Constant velocity.
    Linear,
    EaseIn,
    /// Decelerating; the usual entrance curve.
    #[default]
    EaseOut,
    EaseInOut,
    EaseInCubic,
    EaseOutCubic,
}

impl Easing {
    /// The easing function for this curve.
    #[must_use]
    pub fn as_fn(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
            Self::EaseInCubic => ease_in_cubic,
            Self::EaseOutCubic => ease_out_cubic,
        }
    }

    /// Apply the easing to `t` (clamped to [0, 1]).
    #[inline]
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        (self.as_fn())(t)
    }
}

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

/// How a run moves a progress value toward its target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "kebab-case"))]
pub enum Curve {
    /// Duration-based motion shaped by an easing curve. Honors the run's
    /// duration exactly.
    Timing { easing: Easing },
    /// Physically-based damped spring. The run's duration is ignored; the run
    /// completes when the spring comes to rest. Underdamped parameters
    /// overshoot the target before settling.
    Spring(SpringParams),
}

impl Curve {
    /// Linear timing.
    pub const LINEAR: Curve = Curve::Timing {
        easing: Easing::Linear,
    };

    /// Timing curve with the given easing.
    #[must_use]
    pub const fn timing(easing: Easing) -> Self {
        Self::Timing { easing }
    }

    /// Spring curve with the given parameters.
    #[must_use]
    pub const fn spring(params: SpringParams) -> Self {
        Self::Spring(params)
    }

    /// Whether this curve can move past its target.
    #[must_use]
    pub fn can_overshoot(&self) -> bool {
        match self {
            Self::Timing { .. } => false,
            Self::Spring(params) => params.damping < params.critical_damping(),
        }
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::timing(Easing::default())
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);

    /// Time elapsed past completion. Used by composition types to forward
    /// remaining time (e.g., [`Delayed`] forwards overshoot into its inner
    /// animation). Returns [`Duration::ZERO`] for animations that never
    /// complete.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Tracks elapsed time as [`Duration`] internally for precise accumulation
/// (no floating-point drift), so `n` ticks of `d` complete a fade of
/// `n * d` exactly.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and default linear easing.
    ///
    /// A zero duration is clamped to 1ns: the fade completes on its first
    /// non-zero tick.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

// ---------------------------------------------------------------------------
// Delayed
// ---------------------------------------------------------------------------

/// Wait for a delay, then play the inner animation.
///
/// A zero delay starts the inner animation on the first tick, forwarding the
/// whole tick into it.
#[derive(Debug, Clone, Copy)]
pub struct Delayed<A> {
    delay: Duration,
    elapsed: Duration,
    inner: A,
    started: bool,
}

impl<A: Animation> Delayed<A> {
    /// Create a delayed animation that waits `delay` before starting `inner`.
    pub fn new(delay: Duration, inner: A) -> Self {
        Self {
            delay,
            elapsed: Duration::ZERO,
            inner,
            started: false,
        }
    }

    /// Whether the delay period has elapsed and the inner animation has started.
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Access the inner animation.
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn tick(&mut self, dt: Duration) {
        if !self.started {
            self.elapsed = self.elapsed.saturating_add(dt);
            if self.elapsed >= self.delay {
                self.started = true;
                // Forward overshoot into the inner animation.
                let os = self.elapsed.saturating_sub(self.delay);
                if !os.is_zero() {
                    self.inner.tick(os);
                }
            }
        } else {
            self.inner.tick(dt);
        }
    }

    fn is_complete(&self) -> bool {
        self.started && self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        if self.started {
            self.inner.value()
        } else {
            0.0
        }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.started = false;
        self.inner.reset();
    }

    fn overshoot(&self) -> Duration {
        if self.started {
            self.inner.overshoot()
        } else {
            Duration::ZERO
        }
    }
}

/// Create a [`Delayed`] animation.
pub fn delay<A: Animation>(d: Duration, a: A) -> Delayed<A> {
    Delayed::new(d, a)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
