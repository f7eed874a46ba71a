#![forbid(unsafe_code)]

//! Lightbox public facade crate.
//!
//! This crate provides the stable surface area for hosts. It re-exports the
//! common types from the internal crates and offers a prelude for
//! day-to-day usage.
//!
//! ```
//! use lightbox::prelude::*;
//!
//! let mut lb = lightbox::from_sources(["a.jpg", "b.jpg", "c.jpg"], &LightboxConfig::default())?;
//! let mut ticker = VirtualTicker::default();
//! lb.tick(ticker.next_delta());
//! assert_eq!(lb.tap(Point::new(10.0, 10.0)), Some(Intent::Select(ItemId(0))));
//! assert_eq!(lb.phase(), Phase::Expanding);
//! # Ok::<(), lightbox::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use lightbox_core::animation::{
    AnimateOptions, AnimationClock, ClockEvent, Curve, Easing, RunId, SpringParams,
};
pub use lightbox_core::geometry::{PageRect, Point, Rect, Size};
pub use lightbox_core::ticker::{Ticker, VirtualTicker, WallTicker};

// --- Widget re-exports -----------------------------------------------------

pub use lightbox_widgets::{
    CaptionLayout, CaptionLayoutKind, CaptionMode, Catalog, CatalogEntry, ConfigError,
    DisplayList, DrawCommand, GridConfig, Intent, ItemId, Lightbox, LightboxConfig, Phase,
    TransitionError, TransitionFrame, TransitionMachine, TransitionSnapshot, Widget,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for lightbox hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for lightbox APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a [`Lightbox`] over uncaptioned image sources.
pub fn from_sources<I, S>(sources: I, config: &LightboxConfig) -> Result<Lightbox>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let catalog = sources.into_iter().map(CatalogEntry::new).collect();
    Ok(Lightbox::new(catalog, config)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CaptionLayoutKind, CaptionMode, Catalog, CatalogEntry, Curve, DisplayList, DrawCommand,
        Easing, Error, Intent, ItemId, Lightbox, LightboxConfig, Phase, Point, Rect, Result,
        Size, Ticker, TransitionFrame, VirtualTicker, Widget,
    };

    pub use crate::{core, widgets};
}


pub use lightbox_core as core;
pub use lightbox_widgets as widgets;
