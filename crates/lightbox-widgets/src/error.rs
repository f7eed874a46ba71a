#![forbid(unsafe_code)]

//! Error types for the transition machine and its configuration.
//!
//! Transition errors are expected under normal interaction (a tap during an
//! animation, a tap on a cell that scrolled away). The machine recovers from
//! them locally as no-ops and logs them; they are never surfaced through the
//! public intents.

use thiserror::Error;

use crate::catalog::ItemId;
use crate::transition::{Intent, Phase};

/// Why an intent was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The item is not currently rendered or its layout cannot be resolved.
    #[error("item {item} is not measurable")]
    MeasurementUnavailable { item: ItemId },
    /// The intent is not valid in the current phase.
    #[error("{intent:?} is not valid while {phase:?}")]
    InvalidTransition { intent: Intent, phase: Phase },
    /// A measurement for another selection is still in flight.
    #[error("measurement for item {pending} is still pending")]
    MeasurementPending { pending: ItemId },
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown caption layout {0:?} (expected \"cover\" or \"slide-up\")")]
    UnknownCaptionLayout(String),
    #[error("unknown caption mode {0:?} (expected \"shared\" or \"staged\")")]
    UnknownCaptionMode(String),
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("grid must have at least one column")]
    NoColumns,
    #[error("cell width fraction must be in (0, 1], got {0}")]
    CellWidthFraction(f32),
    /// A spring that can never come to rest.
    #[error("{field} spring needs finite positive stiffness and damping, got {stiffness}/{damping}")]
    Spring {
        field: &'static str,
        stiffness: f64,
        damping: f64,
    },
    /// Collapse must not overshoot below zero.
    #[error("collapse_curve must be a timing curve")]
    CollapseCurve,
}
