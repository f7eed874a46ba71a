#![forbid(unsafe_code)]

//! Grid-to-overlay transition machine and presentation widgets.
//!
//! # Role in Lightbox
//! `lightbox-widgets` sits on top of `lightbox-core`. It owns everything that
//! knows about images and overlays:
//!
//! - [`Catalog`] and the [`GridLayout`] that places it on screen and resolves
//!   cell geometry through a [`CellArena`].
//! - The [`TransitionMachine`], driven by a table of `(phase, trigger)` rows.
//! - Caption layout strategies ([`Cover`], [`SlideUp`]).
//! - Widgets that render a [`TransitionFrame`] into a [`DisplayList`].
//! - The [`Lightbox`] controller that wires them together.

pub mod caption;
pub mod catalog;
pub mod config;
pub mod error;
pub mod grid;
pub mod lightbox;
pub mod measure;
pub mod transition;
pub mod view;

use lightbox_core::geometry::Rect;

pub use caption::{CaptionGeometry, CaptionLayout, CaptionLayoutKind, Cover, SlideUp};
pub use catalog::{Catalog, CatalogEntry, ItemId};
pub use config::{CaptionMode, LightboxConfig};
pub use error::{ConfigError, TransitionError};
pub use grid::{GridConfig, GridLayout};
pub use lightbox::Lightbox;
pub use measure::{CellArena, CellHandle, Measure, Measurement};
pub use transition::{
    Intent, Phase, Stage, TransitionFrame, TransitionMachine, TransitionSnapshot,
};
pub use view::{Color, DisplayList, DrawCommand};

/// A `Widget` is a renderable component.
///
/// Widgets append drawing commands for the given area to a display list.
pub trait Widget {
    /// Render the widget into the display list at the given area.
    fn render(&self, area: Rect, list: &mut DisplayList);
}
