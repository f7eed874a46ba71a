#![forbid(unsafe_code)]

//! The grid-to-overlay transition machine.
//!
//! [`TransitionMachine`] owns the overlay lifecycle and the three progress
//! values that animate it:
//!
//! - **image**: 0 is the grid cell, 1 is the expanded overlay.
//! - **caption**: the caption panel's position and opacity. In
//!   [`CaptionMode::Shared`] it is the image value; in
//!   [`CaptionMode::Staged`] it has its own run chained after the image.
//! - **close control**: the dismiss affordance's opacity, gated on the
//!   previous stage finishing.
//!
//! State machine: Idle → Expanding → Expanded → Collapsing → Idle. Every
//! change goes through the [transition table](table); nothing else mutates
//! the lifecycle.
//!
//! # Invariants
//!
//! 1. The active item and origin rect exist iff the phase is not `Idle`.
//!    [`Stage`] carries them in its non-idle variants, so this holds by
//!    construction.
//! 2. `select` while not `Idle` is rejected with no state change.
//! 3. The close control stays at 0 until the image (staged: the caption)
//!    has completed, and snaps to 0 before a collapse starts moving.
//! 4. Completing a collapse returns to [`TransitionSnapshot::initial`].
//!
//! # Failure Modes
//!
//! - A select with a non-finite or empty origin rect is dropped as
//!   `MeasurementUnavailable`.
//! - Rejected intents are logged at debug level and reported as `false`;
//!   they never surface as errors.

pub mod frame;
pub mod table;

use std::time::Duration;

use lightbox_core::animation::{AnimationClock, ClockEvent, ProgressHandle, RunId};
use lightbox_core::geometry::PageRect;

use crate::catalog::ItemId;
use crate::config::{CaptionMode, LightboxConfig};
use crate::error::TransitionError;

pub use frame::{TransitionFrame, TransitionSnapshot, destination_rect};
pub use table::{Effects, Rules, Step, Trigger, transition};

/// Lifecycle phase of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Phase {
    /// Grid only.
    #[default]
    Idle,
    /// Image moving from its cell to the overlay.
    Expanding,
    /// Overlay fully shown.
    Expanded,
    /// Image moving back to its cell.
    Collapsing,
}

impl Phase {
    /// Whether the overlay is on screen.
    #[inline]
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether the image is moving.
    #[inline]
    #[must_use]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Expanding | Self::Collapsing)
    }
}

/// A user request dispatched by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Intent {
    Select(ItemId),
    Dismiss,
}

impl Intent {
    fn trigger(self) -> Trigger {
        match self {
            Self::Select(_) => Trigger::Select,
            Self::Dismiss => Trigger::Dismiss,
        }
    }
}

/// The selected item and where it was on screen when selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Active {
    pub item: ItemId,
    pub origin: PageRect,
}

/// Phase plus the data that only exists outside `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Expanding(Active),
    Expanded(Active),
    Collapsing(Active),
}

impl Stage {
    fn enter(phase: Phase, active: Active) -> Self {
        match phase {
            Phase::Idle => Self::Idle,
            Phase::Expanding => Self::Expanding(active),
            Phase::Expanded => Self::Expanded(active),
            Phase::Collapsing => Self::Collapsing(active),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Expanding(_) => Phase::Expanding,
            Self::Expanded(_) => Phase::Expanded,
            Self::Collapsing(_) => Phase::Collapsing,
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<Active> {
        match *self {
            Self::Idle => None,
            Self::Expanding(a) | Self::Expanded(a) | Self::Collapsing(a) => Some(a),
        }
    }
}

/// Owner of the overlay lifecycle and its animations.
#[derive(Debug, Clone)]
pub struct TransitionMachine {
    config: LightboxConfig,
    rules: Rules,
    clock: AnimationClock,
    image: ProgressHandle,
    caption: ProgressHandle,
    close_control: ProgressHandle,
    stage: Stage,
    image_run: Option<RunId>,
    caption_run: Option<RunId>,
}

impl TransitionMachine {
    /// Create an idle machine. Reduced motion is applied here.
    #[must_use]
    pub fn new(config: &LightboxConfig) -> Self {
        let config = config.effective();
        let mut clock = AnimationClock::new();
        let image = clock.register("image", 0.0);
        let caption = clock.register("caption", 0.0);
        let close_control = clock.register("close_control", 0.0);
        Self {
            rules: Rules {
                caption_mode: config.caption_mode,
                lenient_dismiss: config.lenient_dismiss,
            },
            config,
            clock,
            image,
            caption,
            close_control,
            stage: Stage::Idle,
            image_run: None,
            caption_run: None,
        }
    }

    /// The effective configuration.
    #[must_use]
    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    #[must_use]
    pub fn active_item(&self) -> Option<ItemId> {
        self.stage.active().map(|a| a.item)
    }

    #[must_use]
    pub fn origin(&self) -> Option<PageRect> {
        self.stage.active().map(|a| a.origin)
    }

    #[must_use]
    pub fn image_progress(&self) -> f32 {
        self.clock.value(self.image)
    }

    #[must_use]
    pub fn caption_progress(&self) -> f32 {
        match self.config.caption_mode {
            CaptionMode::Shared => self.image_progress(),
            CaptionMode::Staged => self.clock.value(self.caption),
        }
    }

    #[must_use]
    pub fn close_control_progress(&self) -> f32 {
        self.clock.value(self.close_control)
    }

    /// Whether any progress value is still moving.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.clock.is_idle()
    }

    #[must_use]
    pub fn snapshot(&self) -> TransitionSnapshot {
        TransitionSnapshot {
            phase: self.phase(),
            active_item: self.active_item(),
            origin: self.origin(),
            image_progress: self.image_progress(),
            caption_progress: self.caption_progress(),
            close_control_progress: self.close_control_progress(),
        }
    }

    /// Snapshot plus derived overlay and caption geometry.
    #[must_use]
    pub fn frame(&self) -> TransitionFrame {
        TransitionFrame::derive(self.snapshot(), &self.config)
    }

    /// Start expanding `item` from its measured `origin`.
    ///
    /// Returns `false` (and changes nothing) unless the machine is idle and
    /// `origin` is a usable rect.
    pub fn select(&mut self, item: ItemId, origin: PageRect) -> bool {
        let result = self.try_select(item, origin);
        self.accept(Intent::Select(item), result)
    }

    /// Start collapsing the overlay.
    ///
    /// Returns `false` (and changes nothing) unless the phase allows it.
    pub fn dismiss(&mut self) -> bool {
        let result = self.try_dismiss();
        self.accept(Intent::Dismiss, result)
    }

    fn accept(&self, intent: Intent, result: Result<(), TransitionError>) -> bool {
        match result {
            Ok(()) => {
                lightbox_core::debug!(intent = ?intent, "intent accepted");
                true
            }
            Err(err) => {
                lightbox_core::debug!(
                    intent = ?intent,
                    phase = ?self.phase(),
                    reason = %err,
                    "intent rejected"
                );
                false
            }
        }
    }

    fn try_select(&mut self, item: ItemId, origin: PageRect) -> Result<(), TransitionError> {
        let step = self.lookup(Intent::Select(item))?;
        if !origin.is_finite() || origin.page().is_empty() {
            return Err(TransitionError::MeasurementUnavailable { item });
        }
        self.apply(Trigger::Select, step, Some(Active { item, origin }));
        Ok(())
    }

    fn try_dismiss(&mut self) -> Result<(), TransitionError> {
        let step = self.lookup(Intent::Dismiss)?;
        if self.stage.active().is_none() {
            return Err(TransitionError::InvalidTransition {
                intent: Intent::Dismiss,
                phase: self.phase(),
            });
        }
        self.apply(Trigger::Dismiss, step, None);
        Ok(())
    }

    fn lookup(&self, intent: Intent) -> Result<Step, TransitionError> {
        let phase = self.phase();
        transition(phase, intent.trigger(), self.rules)
            .ok_or(TransitionError::InvalidTransition { intent, phase })
    }

    /// Advance all animations by `dt` and react to completed runs.
    ///
    /// Returns `true` if the phase changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let before = self.phase();
        self.clock.tick(dt);
        for event in self.clock.drain_events() {
            let ClockEvent::Completed { handle, run } = event else {
                continue;
            };
            let trigger = if handle == self.image && self.image_run == Some(run) {
                self.image_run = None;
                Trigger::ImageDone
            } else if handle == self.caption && self.caption_run == Some(run) {
                self.caption_run = None;
                Trigger::CaptionDone
            } else {
                continue;
            };
            self.complete(trigger);
        }
        self.phase() != before
    }

    fn complete(&mut self, trigger: Trigger) {
        let phase = self.phase();
        let Some(step) = transition(phase, trigger, self.rules) else {
            lightbox_core::trace!(trigger = ?trigger, phase = ?phase, "completion ignored");
            return;
        };
        self.apply(trigger, step, None);
    }

    /// Run `step`'s effects. `selected` is only read by rows that capture
    /// the origin; every other row keeps the current active item.
    fn apply(&mut self, trigger: Trigger, step: Step, selected: Option<Active>) {
        let from = self.phase();
        let effects = step.effects;
        let active = if effects.contains(Effects::CAPTURE_ORIGIN) {
            selected
        } else {
            self.stage.active()
        };
        let Some(active) = active else {
            lightbox_core::trace!(trigger = ?trigger, phase = ?from, "no active item");
            return;
        };

        if effects.contains(Effects::RESET_CLOSE_CONTROL) {
            self.clock.set_value(self.close_control, 0.0);
        }
        if effects.contains(Effects::RESET_CAPTION) {
            self.clock.set_value(self.caption, 0.0);
            self.caption_run = None;
        }
        if effects.contains(Effects::START_IMAGE_EXPAND) {
            let opts = self.config.expand_options();
            self.image_run = Some(self.clock.animate(self.image, 1.0, opts));
        }
        if effects.contains(Effects::START_IMAGE_COLLAPSE) {
            let opts = self.config.collapse_options();
            self.image_run = Some(self.clock.animate(self.image, 0.0, opts));
        }
        if effects.contains(Effects::START_CAPTION_REVEAL) {
            let opts = self.config.caption_options();
            self.caption_run = Some(self.clock.animate(self.caption, 1.0, opts));
        }
        if effects.contains(Effects::START_CLOSE_CONTROL) {
            let opts = self.config.close_control_options();
            self.clock.animate(self.close_control, 1.0, opts);
        }
        if effects.contains(Effects::CLEAR_ACTIVE) {
            self.image_run = None;
            self.caption_run = None;
        }

        self.stage = Stage::enter(step.next, active);
        if from != step.next {
            lightbox_core::debug!(
                from = ?from,
                to = ?step.next,
                trigger = ?trigger,
                item = active.item.index() as u64,
                "phase changed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(16);

    fn origin() -> PageRect {
        PageRect::new(0.0, 0.0, 100.0, 100.0, 10.0, 20.0)
    }

    fn run_until(machine: &mut TransitionMachine, phase: Phase, max_ticks: usize) -> usize {
        for n in 1..=max_ticks {
            machine.tick(TICK);
            if machine.phase() == phase && !machine.is_animating() {
                return n;
            }
        }
        panic!("never reached {phase:?}");
    }

    #[test]
    fn starts_idle_at_initial_snapshot() {
        let m = TransitionMachine::new(&LightboxConfig::default());
        assert_eq!(m.snapshot(), TransitionSnapshot::initial());
        assert_eq!(m.stage(), Stage::Idle);
    }

    #[test]
    fn select_captures_origin_and_expands() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        assert!(m.select(ItemId(5), origin()));
        assert_eq!(m.phase(), Phase::Expanding);
        assert_eq!(m.active_item(), Some(ItemId(5)));
        assert_eq!(m.origin(), Some(origin()));
        m.tick(TICK);
        assert!(m.image_progress() > 0.0);
    }

    #[test]
    fn rows_without_capture_keep_the_selected_origin() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        assert!(m.select(ItemId(5), origin()));
        run_until(&mut m, Phase::Expanded, 100);

        let step = m.lookup(Intent::Dismiss).unwrap();
        let stray = Active {
            item: ItemId(9),
            origin: PageRect::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0),
        };
        m.apply(Trigger::Dismiss, step, Some(stray));
        assert_eq!(m.phase(), Phase::Collapsing);
        assert_eq!(m.active_item(), Some(ItemId(5)));
        assert_eq!(m.origin(), Some(origin()));
    }

    #[test]
    fn select_rejected_outside_idle() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        m.select(ItemId(1), origin());
        m.tick(TICK);
        let before = m.snapshot();
        assert!(!m.select(ItemId(2), origin()));
        assert_eq!(m.snapshot(), before);
    }

    #[test]
    fn select_with_unusable_rect_is_noop() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        let empty = PageRect::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(!m.select(ItemId(0), empty));
        let nan = PageRect::new(f32::NAN, 0.0, 10.0, 10.0, 0.0, 0.0);
        assert!(!m.select(ItemId(0), nan));
        assert_eq!(m.snapshot(), TransitionSnapshot::initial());
    }

    #[test]
    fn dismiss_rejected_until_expanded() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        assert!(!m.dismiss());
        m.select(ItemId(0), origin());
        assert!(!m.dismiss());
        assert_eq!(m.phase(), Phase::Expanding);
    }

    #[test]
    fn close_control_waits_for_image() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        m.select(ItemId(0), origin());
        while m.phase() == Phase::Expanding {
            assert_eq!(m.close_control_progress(), 0.0);
            m.tick(TICK);
        }
        assert_eq!(m.image_progress(), 1.0);
        m.tick(TICK);
        assert!(m.close_control_progress() > 0.0);
    }

    #[test]
    fn dismiss_snaps_close_control_to_zero() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        m.select(ItemId(0), origin());
        run_until(&mut m, Phase::Expanded, 200);
        assert_eq!(m.close_control_progress(), 1.0);

        assert!(m.dismiss());
        assert_eq!(m.phase(), Phase::Collapsing);
        assert_eq!(m.close_control_progress(), 0.0);
        assert_eq!(m.image_progress(), 1.0);
    }

    #[test]
    fn full_cycle_returns_to_initial() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        m.select(ItemId(3), origin());
        run_until(&mut m, Phase::Expanded, 200);
        m.dismiss();
        run_until(&mut m, Phase::Idle, 200);
        assert_eq!(m.snapshot(), TransitionSnapshot::initial());
        assert!(m.select(ItemId(4), origin()));
    }

    #[test]
    fn staged_caption_runs_after_image_and_gates_close() {
        let config = LightboxConfig::default().caption_mode(CaptionMode::Staged);
        let mut m = TransitionMachine::new(&config);
        m.select(ItemId(0), origin());
        while m.phase() == Phase::Expanding {
            assert_eq!(m.caption_progress(), 0.0);
            m.tick(TICK);
        }
        while m.caption_progress() < 1.0 {
            assert_eq!(m.close_control_progress(), 0.0);
            m.tick(TICK);
        }
        m.tick(TICK);
        assert!(m.close_control_progress() > 0.0);
    }

    #[test]
    fn lenient_dismiss_reverses_mid_expand() {
        let config = LightboxConfig::default().lenient_dismiss(true);
        let mut m = TransitionMachine::new(&config);
        m.select(ItemId(0), origin());
        for _ in 0..5 {
            m.tick(TICK);
        }
        let before = m.image_progress();
        assert!(m.dismiss());
        assert_eq!(m.phase(), Phase::Collapsing);
        assert_eq!(m.image_progress(), before);
        assert_eq!(m.close_control_progress(), 0.0);
        run_until(&mut m, Phase::Idle, 200);
        assert_eq!(m.snapshot(), TransitionSnapshot::initial());
    }

    #[test]
    fn reduced_motion_completes_each_stage_in_one_tick() {
        let config = LightboxConfig::default().reduced_motion(true);
        let mut m = TransitionMachine::new(&config);
        m.select(ItemId(0), origin());
        assert!(m.tick(TICK));
        assert_eq!(m.phase(), Phase::Expanded);
        assert_eq!(m.image_progress(), 1.0);
        m.tick(TICK);
        assert_eq!(m.close_control_progress(), 1.0);
    }

    #[test]
    fn tick_reports_phase_changes_only() {
        let mut m = TransitionMachine::new(&LightboxConfig::default());
        assert!(!m.tick(TICK));
        m.select(ItemId(0), origin());
        assert!(!m.tick(TICK));
    }
}
