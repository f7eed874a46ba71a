// Forbid unsafe in production; deny in tests as well.
#![forbid(unsafe_code)]

//! Core: geometry, animation clock, and interpolation for lightbox transitions.
//!
//! # Role in Lightbox
//! `lightbox-core` is the leaf layer. It knows nothing about grids, captions,
//! or overlays; it only provides the pieces the transition machine drives:
//!
//! - **Geometry**: [`Rect`](geometry::Rect) and the measured
//!   [`PageRect`](geometry::PageRect) that carries both container-relative and
//!   screen-relative origins.
//! - **Animation**: easing curves, the [`Animation`](animation::Animation)
//!   trait, timing and spring drivers, and the
//!   [`AnimationClock`](animation::clock::AnimationClock) that owns progress
//!   values addressed by integer handles.
//! - **Interpolation**: clamped piecewise-linear mapping from progress to
//!   visual properties.
//! - **Ticking**: fixed virtual ticks for tests and a wall-clock ticker for
//!   interactive hosts.

pub mod animation;
pub mod geometry;
pub mod logging;
pub mod ticker;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
