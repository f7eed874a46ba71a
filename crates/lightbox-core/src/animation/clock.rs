#![forbid(unsafe_code)]

//! Animation clock: progress values addressed by integer handles.
//!
//! An [`AnimationClock`] owns a small arena of progress values. Each value is
//! registered once and addressed by its [`ProgressHandle`]. A value can be
//! driven toward a target with [`animate`](AnimationClock::animate), which
//! starts a *run* identified by a [`RunId`]; every call to
//! [`tick`](AnimationClock::tick) advances all live runs by the same delta.
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use lightbox_core::animation::{AnimateOptions, AnimationClock, ClockEvent, Easing};
//!
//! let mut clock = AnimationClock::new();
//! let image = clock.register("image", 0.0);
//! let run = clock.animate(image, 1.0, AnimateOptions::timing(Duration::from_millis(400), Easing::EaseOut));
//!
//! clock.tick(Duration::from_millis(16));
//! for event in clock.drain_events() {
//!     if let ClockEvent::Completed { handle, run: done } = event {
//!         // start the next stage
//!     }
//! }
//! ```
//!
//! # Design
//!
//! Completion is reported through a drained event queue rather than
//! closures.
//!
//! # Invariants
//!
//! 1. `Completed` fires exactly once per run, after the run's final sample
//!    (the exact target) has been written to the value.
//! 2. A zero-duration run completes on the next non-zero tick, never inside
//!    `animate()` itself.
//! 3. Re-animating (or `set_value`/`cancel`) a handle with a live run cancels
//!    that run: it emits `Cancelled` and never emits `Completed`.
//! 4. A new run starts from the value's instantaneous current sample, not
//!    from the previous target or from zero.
//! 5. `value()` is clamped to [0.0, 1.0]; `raw_value()` exposes spring
//!    overshoot.

use std::time::Duration;

use super::spring::{Spring, SpringParams};
use super::{Animation, Curve, Delayed, Easing, Fade};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Index of a progress value within its clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgressHandle(u32);

impl ProgressHandle {
    /// Arena index of this handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of one run started by [`AnimationClock::animate`].
///
/// Run ids are unique per clock and strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Parameters of a single run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimateOptions {
    /// Length of a timing run. Ignored by spring curves.
    pub duration: Duration,
    pub curve: Curve,
    /// Time to hold the start value before moving.
    pub delay: Duration,
}

impl AnimateOptions {
    /// A timing run of `duration` shaped by `easing`.
    #[must_use]
    pub const fn timing(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            curve: Curve::Timing { easing },
            delay: Duration::ZERO,
        }
    }

    /// A spring run. Completes when the spring comes to rest.
    #[must_use]
    pub const fn spring(params: SpringParams) -> Self {
        Self {
            duration: Duration::ZERO,
            curve: Curve::Spring(params),
            delay: Duration::ZERO,
        }
    }

    /// A run with an explicit curve.
    #[must_use]
    pub const fn new(duration: Duration, curve: Curve) -> Self {
        Self {
            duration,
            curve,
            delay: Duration::ZERO,
        }
    }

    /// Hold the start value for `delay` before moving (builder pattern).
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// An event emitted by the clock, drained with
/// [`drain_events`](AnimationClock::drain_events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// The run reached its target; the value now equals the target exactly.
    Completed { handle: ProgressHandle, run: RunId },
    /// The run was superseded before completing. Normal control flow.
    Cancelled { handle: ProgressHandle, run: RunId },
}

impl ClockEvent {
    /// The handle this event concerns.
    #[must_use]
    pub fn handle(&self) -> ProgressHandle {
        match *self {
            Self::Completed { handle, .. } | Self::Cancelled { handle, .. } => handle,
        }
    }

    /// The run this event concerns.
    #[must_use]
    pub fn run(&self) -> RunId {
        match *self {
            Self::Completed { run, .. } | Self::Cancelled { run, .. } => run,
        }
    }
}

/// What moves a run's value.
#[derive(Debug, Clone)]
enum Driver {
    Timing {
        anim: Delayed<Fade>,
        from: f32,
        to: f32,
    },
    Spring(Delayed<Spring>),
}

impl Driver {
    fn new(from: f32, to: f32, options: &AnimateOptions, velocity: f64) -> Self {
        match options.curve {
            Curve::Timing { easing } => Driver::Timing {
                anim: Delayed::new(
                    options.delay,
                    Fade::new(options.duration).easing(easing.as_fn()),
                ),
                from,
                to,
            },
            Curve::Spring(params) => Driver::Spring(Delayed::new(
                options.delay,
                Spring::with_params(f64::from(from), f64::from(to), params).with_velocity(velocity),
            )),
        }
    }

    fn tick(&mut self, dt: Duration) {
        match self {
            Driver::Timing { anim, .. } => anim.tick(dt),
            Driver::Spring(anim) => anim.tick(dt),
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            Driver::Timing { anim, .. } => anim.is_complete(),
            Driver::Spring(anim) => anim.is_complete(),
        }
    }

    /// Current raw sample (unclamped for springs).
    fn sample(&self) -> f32 {
        match self {
            Driver::Timing { anim, from, to } => super::lerp(*from, *to, anim.value()),
            Driver::Spring(anim) => anim.inner().position() as f32,
        }
    }

    fn velocity(&self) -> f64 {
        match self {
            Driver::Timing { .. } => 0.0,
            Driver::Spring(anim) => anim.inner().velocity(),
        }
    }
}

#[derive(Debug, Clone)]
struct Run {
    id: RunId,
    target: f32,
    driver: Driver,
}

#[derive(Debug, Clone)]
struct Slot {
    label: &'static str,
    value: f32,
    run: Option<Run>,
}

/// Owner of progress values and the runs that move them.
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    slots: Vec<Slot>,
    next_run: u64,
    events: Vec<ClockEvent>,
}

// ---------------------------------------------------------------------------
// Construction and access
// ---------------------------------------------------------------------------

impl AnimationClock {
    /// Create a clock with no progress values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a progress value starting at `initial`.
    ///
    /// `label` is used only for logging.
    pub fn register(&mut self, label: &'static str, initial: f32) -> ProgressHandle {
        let handle = ProgressHandle(self.slots.len() as u32);
        self.slots.push(Slot {
            label,
            value: initial,
            run: None,
        });
        handle
    }

    /// Number of registered progress values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no progress values are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current value, clamped to [0.0, 1.0].
    ///
    /// # Panics
    ///
    /// Panics if `handle` was issued by a different clock.
    #[must_use]
    pub fn value(&self, handle: ProgressHandle) -> f32 {
        self.raw_value(handle).clamp(0.0, 1.0)
    }

    /// Current value as last sampled, without clamping.
    #[must_use]
    pub fn raw_value(&self, handle: ProgressHandle) -> f32 {
        self.slots[handle.index()].value
    }

    /// Label given at registration.
    #[must_use]
    pub fn label(&self, handle: ProgressHandle) -> &'static str {
        self.slots[handle.index()].label
    }

    /// Whether `handle` has a live run.
    #[must_use]
    pub fn is_running(&self, handle: ProgressHandle) -> bool {
        self.slots[handle.index()].run.is_some()
    }

    /// The live run on `handle`, if any.
    #[must_use]
    pub fn current_run(&self, handle: ProgressHandle) -> Option<RunId> {
        self.slots[handle.index()].run.as_ref().map(|r| r.id)
    }

    /// Target of the live run on `handle`, if any.
    #[must_use]
    pub fn target(&self, handle: ProgressHandle) -> Option<f32> {
        self.slots[handle.index()].run.as_ref().map(|r| r.target)
    }

    /// Whether no value has a live run.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(|s| s.run.is_none())
    }

    /// Drain all pending events. Clears the event queue.
    pub fn drain_events(&mut self) -> Vec<ClockEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }
}

// ---------------------------------------------------------------------------
// Driving values
// ---------------------------------------------------------------------------

impl AnimationClock {
    /// Start moving `handle` toward `to`.
    ///
    /// Cancels any live run on the handle first. The new run starts from the
    /// value's current sample; a spring run also inherits the velocity of a
    /// cancelled spring run.
    pub fn animate(&mut self, handle: ProgressHandle, to: f32, options: AnimateOptions) -> RunId {
        let velocity = self.slots[handle.index()]
            .run
            .as_ref()
            .map_or(0.0, |r| r.driver.velocity());
        self.cancel(handle);

        let id = RunId(self.next_run);
        self.next_run += 1;

        let slot = &mut self.slots[handle.index()];
        let from = slot.value;
        crate::trace!(
            handle = slot.label,
            run = id.0,
            from = f64::from(from),
            to = f64::from(to),
            "animation started"
        );
        slot.run = Some(Run {
            id,
            target: to,
            driver: Driver::new(from, to, &options, velocity),
        });
        id
    }

    /// Set `handle` to `value` immediately, cancelling any live run.
    pub fn set_value(&mut self, handle: ProgressHandle, value: f32) {
        self.cancel(handle);
        self.slots[handle.index()].value = value;
    }

    /// Cancel the live run on `handle`, leaving the value where it is.
    ///
    /// Returns `true` if a run was cancelled.
    pub fn cancel(&mut self, handle: ProgressHandle) -> bool {
        let slot = &mut self.slots[handle.index()];
        match slot.run.take() {
            Some(run) => {
                crate::trace!(handle = slot.label, run = run.id.0, "animation cancelled");
                self.events.push(ClockEvent::Cancelled { handle, run: run.id });
                true
            }
            None => false,
        }
    }

    /// Advance every live run by `dt`.
    ///
    /// Completed runs write their exact target before their `Completed`
    /// event is queued.
    pub fn tick(&mut self, dt: Duration) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(run) = slot.run.as_mut() else {
                continue;
            };
            run.driver.tick(dt);
            if run.driver.is_complete() {
                slot.value = run.target;
                let id = run.id;
                slot.run = None;
                crate::trace!(handle = slot.label, run = id.0, "animation completed");
                self.events.push(ClockEvent::Completed {
                    handle: ProgressHandle(index as u32),
                    run: id,
                });
            } else {
                slot.value = run.driver.sample();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);
    const MS_100: Duration = Duration::from_millis(100);

    fn linear(duration: Duration) -> AnimateOptions {
        AnimateOptions::timing(duration, Easing::Linear)
    }

    #[test]
    fn register_assigns_sequential_handles() {
        let mut clock = AnimationClock::new();
        let a = clock.register("a", 0.0);
        let b = clock.register("b", 0.5);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(clock.len(), 2);
        assert_eq!(clock.value(b), 0.5);
        assert_eq!(clock.label(a), "a");
    }

    #[test]
    fn timing_run_reaches_target_and_completes_once() {
        let mut clock = AnimationClock::new();
        let h = clock.register("image", 0.0);
        let run = clock.animate(h, 1.0, linear(MS_100));

        clock.tick(Duration::from_millis(50));
        assert!((clock.value(h) - 0.5).abs() < 1e-4);
        assert!(clock.drain_events().is_empty());

        clock.tick(Duration::from_millis(50));
        assert_eq!(clock.value(h), 1.0);
        assert_eq!(
            clock.drain_events(),
            vec![ClockEvent::Completed { handle: h, run }]
        );

        clock.tick(MS_100);
        assert!(clock.drain_events().is_empty());
        assert!(!clock.is_running(h));
    }

    #[test]
    fn zero_duration_completes_on_next_tick() {
        let mut clock = AnimationClock::new();
        let h = clock.register("close", 0.0);
        let run = clock.animate(h, 1.0, linear(Duration::ZERO));
        assert_eq!(clock.value(h), 0.0);
        assert!(clock.drain_events().is_empty());

        clock.tick(MS_16);
        assert_eq!(clock.value(h), 1.0);
        assert_eq!(
            clock.drain_events(),
            vec![ClockEvent::Completed { handle: h, run }]
        );
    }

    #[test]
    fn reanimate_cancels_without_completion_and_is_continuous() {
        let mut clock = AnimationClock::new();
        let h = clock.register("image", 0.0);
        let first = clock.animate(h, 1.0, linear(MS_100));
        clock.tick(Duration::from_millis(30));
        let before = clock.value(h);

        let second = clock.animate(h, 0.0, linear(MS_100));
        assert_eq!(clock.value(h), before, "interruption must not jump");
        assert_eq!(
            clock.drain_events(),
            vec![ClockEvent::Cancelled {
                handle: h,
                run: first
            }]
        );

        clock.tick(Duration::from_millis(1));
        assert!((clock.value(h) - before).abs() < 0.02);

        clock.tick(MS_100);
        let events = clock.drain_events();
        assert_eq!(
            events,
            vec![ClockEvent::Completed {
                handle: h,
                run: second
            }]
        );
        assert!(!events.iter().any(|e| e.run() == first && matches!(e, ClockEvent::Completed { .. })));
        assert_eq!(clock.value(h), 0.0);
    }

    #[test]
    fn set_value_cancels_and_snaps() {
        let mut clock = AnimationClock::new();
        let h = clock.register("close", 0.0);
        let run = clock.animate(h, 1.0, linear(MS_100));
        clock.tick(Duration::from_millis(40));
        clock.set_value(h, 0.0);
        assert_eq!(clock.value(h), 0.0);
        assert_eq!(
            clock.drain_events(),
            vec![ClockEvent::Cancelled { handle: h, run }]
        );
        clock.tick(MS_100);
        assert_eq!(clock.value(h), 0.0);
        assert!(clock.drain_events().is_empty());
    }

    #[test]
    fn delay_holds_start_value() {
        let mut clock = AnimationClock::new();
        let h = clock.register("close", 0.0);
        clock.animate(h, 1.0, linear(MS_100).with_delay(MS_100));
        clock.tick(Duration::from_millis(60));
        assert_eq!(clock.value(h), 0.0);
        clock.tick(Duration::from_millis(90));
        assert!((clock.value(h) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn spring_run_overshoots_raw_but_value_is_clamped() {
        let mut clock = AnimationClock::new();
        let h = clock.register("image", 0.0);
        clock.animate(h, 1.0, AnimateOptions::spring(SpringParams::BOUNCY));
        let mut max_raw = 0.0f32;
        for _ in 0..60 {
            clock.tick(MS_16);
            max_raw = max_raw.max(clock.raw_value(h));
            assert!((0.0..=1.0).contains(&clock.value(h)));
        }
        assert!(max_raw > 1.0);
    }

    #[test]
    fn spring_run_completes_exactly_on_target() {
        let mut clock = AnimationClock::new();
        let h = clock.register("image", 0.0);
        let run = clock.animate(h, 1.0, AnimateOptions::spring(SpringParams::STIFF));
        let mut completed = false;
        for _ in 0..400 {
            clock.tick(MS_16);
            if clock
                .drain_events()
                .contains(&ClockEvent::Completed { handle: h, run })
            {
                completed = true;
                break;
            }
        }
        assert!(completed);
        assert_eq!(clock.raw_value(h), 1.0);
    }

    #[test]
    fn run_ids_increase() {
        let mut clock = AnimationClock::new();
        let h = clock.register("x", 0.0);
        let a = clock.animate(h, 1.0, linear(MS_100));
        let b = clock.animate(h, 0.0, linear(MS_100));
        assert!(b > a);
        assert_eq!(clock.current_run(h), Some(b));
        assert_eq!(clock.target(h), Some(0.0));
    }

    #[test]
    fn independent_handles_tick_together() {
        let mut clock = AnimationClock::new();
        let a = clock.register("a", 0.0);
        let b = clock.register("b", 1.0);
        clock.animate(a, 1.0, linear(MS_100));
        clock.animate(b, 0.0, linear(Duration::from_millis(200)));
        clock.tick(MS_100);
        assert_eq!(clock.value(a), 1.0);
        assert!((clock.value(b) - 0.5).abs() < 1e-4);
        assert!(!clock.is_idle());
        clock.tick(MS_100);
        assert!(clock.is_idle());
    }

    #[test]
    fn cancel_without_run_is_noop() {
        let mut clock = AnimationClock::new();
        let h = clock.register("x", 0.25);
        assert!(!clock.cancel(h));
        assert_eq!(clock.pending_event_count(), 0);
        assert_eq!(clock.value(h), 0.25);
    }
}
