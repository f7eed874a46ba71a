#![forbid(unsafe_code)]

//! The transition table.
//!
//! Every lifecycle change is one row: a `(phase, trigger)` pair maps to the
//! next phase and the set of side effects to run, in a fixed order, before
//! the phase is entered. Pairs without a row are invalid and leave the
//! machine untouched.
//!
//! | Phase      | Trigger       | Next       | Effects                                                   |
//! |------------|---------------|------------|-----------------------------------------------------------|
//! | Idle       | Select        | Expanding  | CAPTURE_ORIGIN, START_IMAGE_EXPAND                        |
//! | Expanding  | ImageDone     | Expanded   | START_CLOSE_CONTROL (shared) / START_CAPTION_REVEAL (staged) |
//! | Expanded   | CaptionDone   | Expanded   | START_CLOSE_CONTROL (staged only)                         |
//! | Expanded   | Dismiss       | Collapsing | RESET_CLOSE_CONTROL, RESET_CAPTION, START_IMAGE_COLLAPSE  |
//! | Expanding  | Dismiss       | Collapsing | same as above, only with lenient dismiss                  |
//! | Collapsing | ImageDone     | Idle       | CLEAR_ACTIVE                                              |

use bitflags::bitflags;

use crate::config::CaptionMode;

use super::Phase;

/// What drives a row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// A grid cell was selected and measured.
    Select,
    Dismiss,
    /// The image run finished.
    ImageDone,
    /// The staged caption run finished.
    CaptionDone,
}

bitflags! {
    /// Side effects of a transition. Applied in declaration order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Effects: u8 {
        /// Snap the close control to 0 without animating.
        const RESET_CLOSE_CONTROL = 1 << 0;
        /// Snap the staged caption to 0 without animating.
        const RESET_CAPTION = 1 << 1;
        /// Store the selected item and its measured rect.
        const CAPTURE_ORIGIN = 1 << 2;
        const START_IMAGE_EXPAND = 1 << 3;
        const START_IMAGE_COLLAPSE = 1 << 4;
        const START_CAPTION_REVEAL = 1 << 5;
        const START_CLOSE_CONTROL = 1 << 6;
        /// Forget the active item and origin rect.
        const CLEAR_ACTIVE = 1 << 7;
    }
}

/// Configuration bits the table depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rules {
    pub caption_mode: CaptionMode,
    pub lenient_dismiss: bool,
}

/// One row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: Phase,
    pub effects: Effects,
}

impl Step {
    const fn new(next: Phase, effects: Effects) -> Self {
        Self { next, effects }
    }
}

const COLLAPSE: Effects = Effects::RESET_CLOSE_CONTROL
    .union(Effects::RESET_CAPTION)
    .union(Effects::START_IMAGE_COLLAPSE);

/// Look up the row for `trigger` in `phase`.
#[must_use]
pub fn transition(phase: Phase, trigger: Trigger, rules: Rules) -> Option<Step> {
    use Phase::*;
    use Trigger::*;

    match (phase, trigger, rules.caption_mode) {
        (Idle, Select, _) => Some(Step::new(
            Expanding,
            Effects::CAPTURE_ORIGIN.union(Effects::START_IMAGE_EXPAND),
        )),
        (Expanding, ImageDone, CaptionMode::Shared) => {
            Some(Step::new(Expanded, Effects::START_CLOSE_CONTROL))
        }
        (Expanding, ImageDone, CaptionMode::Staged) => {
            Some(Step::new(Expanded, Effects::START_CAPTION_REVEAL))
        }
        (Expanded, CaptionDone, CaptionMode::Staged) => {
            Some(Step::new(Expanded, Effects::START_CLOSE_CONTROL))
        }
        (Expanded, Dismiss, _) => Some(Step::new(Collapsing, COLLAPSE)),
        (Expanding, Dismiss, _) if rules.lenient_dismiss => Some(Step::new(Collapsing, COLLAPSE)),
        (Collapsing, ImageDone, _) => Some(Step::new(Idle, Effects::CLEAR_ACTIVE)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARED: Rules = Rules {
        caption_mode: CaptionMode::Shared,
        lenient_dismiss: false,
    };
    const STAGED: Rules = Rules {
        caption_mode: CaptionMode::Staged,
        lenient_dismiss: false,
    };

    const PHASES: [Phase; 4] = [
        Phase::Idle,
        Phase::Expanding,
        Phase::Expanded,
        Phase::Collapsing,
    ];

    #[test]
    fn select_only_from_idle() {
        for phase in PHASES {
            let step = transition(phase, Trigger::Select, SHARED);
            assert_eq!(step.is_some(), phase == Phase::Idle, "{phase:?}");
        }
    }

    #[test]
    fn dismiss_only_from_expanded_by_default() {
        for phase in PHASES {
            let step = transition(phase, Trigger::Dismiss, SHARED);
            assert_eq!(step.is_some(), phase == Phase::Expanded, "{phase:?}");
        }
    }

    #[test]
    fn lenient_dismiss_interrupts_expanding() {
        let rules = Rules {
            lenient_dismiss: true,
            ..SHARED
        };
        let step = transition(Phase::Expanding, Trigger::Dismiss, rules).unwrap();
        assert_eq!(step.next, Phase::Collapsing);
        assert!(step.effects.contains(Effects::RESET_CLOSE_CONTROL));
        assert_eq!(transition(Phase::Collapsing, Trigger::Dismiss, rules), None);
        assert_eq!(transition(Phase::Idle, Trigger::Dismiss, rules), None);
    }

    #[test]
    fn collapse_resets_before_animating() {
        let step = transition(Phase::Expanded, Trigger::Dismiss, SHARED).unwrap();
        assert_eq!(step.effects, COLLAPSE);
        // Reset flags sort before the start flag, so they apply first.
        assert!(Effects::RESET_CLOSE_CONTROL.bits() < Effects::START_IMAGE_COLLAPSE.bits());
        assert!(Effects::RESET_CAPTION.bits() < Effects::START_IMAGE_COLLAPSE.bits());
    }

    #[test]
    fn shared_mode_gates_close_on_image() {
        let step = transition(Phase::Expanding, Trigger::ImageDone, SHARED).unwrap();
        assert_eq!(step, Step::new(Phase::Expanded, Effects::START_CLOSE_CONTROL));
        assert_eq!(transition(Phase::Expanded, Trigger::CaptionDone, SHARED), None);
    }

    #[test]
    fn staged_mode_chains_caption_then_close() {
        let first = transition(Phase::Expanding, Trigger::ImageDone, STAGED).unwrap();
        assert_eq!(first.effects, Effects::START_CAPTION_REVEAL);
        assert!(!first.effects.contains(Effects::START_CLOSE_CONTROL));
        let second = transition(Phase::Expanded, Trigger::CaptionDone, STAGED).unwrap();
        assert_eq!(second, Step::new(Phase::Expanded, Effects::START_CLOSE_CONTROL));
    }

    #[test]
    fn only_select_captures_origin() {
        let triggers = [
            Trigger::Select,
            Trigger::Dismiss,
            Trigger::ImageDone,
            Trigger::CaptionDone,
        ];
        let lenient = Rules {
            lenient_dismiss: true,
            ..STAGED
        };
        for rules in [SHARED, STAGED, lenient] {
            for phase in PHASES {
                for trigger in triggers {
                    let Some(step) = transition(phase, trigger, rules) else {
                        continue;
                    };
                    assert_eq!(
                        step.effects.contains(Effects::CAPTURE_ORIGIN),
                        (phase, trigger) == (Phase::Idle, Trigger::Select),
                        "{phase:?} {trigger:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn collapse_completion_clears() {
        let step = transition(Phase::Collapsing, Trigger::ImageDone, STAGED).unwrap();
        assert_eq!(step, Step::new(Phase::Idle, Effects::CLEAR_ACTIVE));
        assert_eq!(transition(Phase::Idle, Trigger::ImageDone, STAGED), None);
        assert_eq!(transition(Phase::Expanded, Trigger::ImageDone, STAGED), None);
    }
}
