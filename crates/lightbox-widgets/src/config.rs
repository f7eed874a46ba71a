#![forbid(unsafe_code)]

//! Lightbox configuration.
//!
//! [`LightboxConfig`] carries the screen size, the timing of every stage, the
//! caption strategy, and the grid geometry. Build it with the chained
//! setters, then call [`validate`](LightboxConfig::validate) before handing it
//! to a [`Lightbox`](crate::Lightbox).
//!
//! # Example
//!
//! ```ignore
//! let config = LightboxConfig::default()
//!     .caption_layout(CaptionLayoutKind::SlideUp)
//!     .caption_mode(CaptionMode::Staged)
//!     .expand_duration(Duration::from_millis(300));
//! config.validate()?;
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use lightbox_core::animation::{AnimateOptions, Curve, Easing};
use lightbox_core::geometry::Size;

use crate::caption::{CaptionGeometry, CaptionLayoutKind};
use crate::error::ConfigError;
use crate::grid::GridConfig;

/// How the caption's progress relates to the image's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CaptionMode {
    /// Caption progress equals image progress.
    #[default]
    Shared,
    /// Caption runs its own reveal after the image finishes expanding; the
    /// close control waits for the caption.
    Staged,
}

impl CaptionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Staged => "staged",
        }
    }
}

impl fmt::Display for CaptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "staged" => Ok(Self::Staged),
            _ => Err(ConfigError::UnknownCaptionMode(s.to_owned())),
        }
    }
}

/// Configuration for the grid-to-overlay transition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightboxConfig {
    /// Screen size in pixels.
    pub screen: Size,
    pub caption_layout: CaptionLayoutKind,
    pub caption_mode: CaptionMode,
    /// Image expand time. Ignored by spring curves.
    #[cfg_attr(feature = "serde", serde(rename = "expand_ms", with = "duration_ms"))]
    pub expand_duration: Duration,
    #[cfg_attr(feature = "serde", serde(rename = "collapse_ms", with = "duration_ms"))]
    pub collapse_duration: Duration,
    /// Wait between the close control's gate opening and its fade starting.
    #[cfg_attr(feature = "serde", serde(rename = "close_delay_ms", with = "duration_ms"))]
    pub close_control_delay: Duration,
    #[cfg_attr(feature = "serde", serde(rename = "close_fade_ms", with = "duration_ms"))]
    pub close_control_duration: Duration,
    /// Staged caption reveal time. Unused in [`CaptionMode::Shared`].
    #[cfg_attr(feature = "serde", serde(rename = "caption_ms", with = "duration_ms"))]
    pub caption_duration: Duration,
    pub expand_curve: Curve,
    /// Must be a timing curve so the collapse never dips below zero.
    pub collapse_curve: Curve,
    /// Height of the expanded image; it always spans the screen width.
    pub expanded_height: f32,
    pub caption_panel_height: f32,
    /// Accept `dismiss` while still expanding.
    pub lenient_dismiss: bool,
    /// Replace all motion with instant changes.
    pub reduced_motion: bool,
    pub grid: GridConfig,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            screen: Size::new(375.0, 667.0),
            caption_layout: CaptionLayoutKind::Cover,
            caption_mode: CaptionMode::Shared,
            expand_duration: Duration::from_millis(400),
            collapse_duration: Duration::from_millis(450),
            close_control_delay: Duration::ZERO,
            close_control_duration: Duration::from_millis(250),
            caption_duration: Duration::from_millis(300),
            expand_curve: Curve::default(),
            collapse_curve: Curve::timing(Easing::EaseInOut),
            expanded_height: 300.0,
            caption_panel_height: 120.0,
            lenient_dismiss: false,
            reduced_motion: false,
            grid: GridConfig::default(),
        }
    }
}

impl LightboxConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the screen size.
    #[must_use]
    pub fn screen(mut self, screen: Size) -> Self {
        self.screen = screen;
        self
    }

    /// Set the caption layout.
    #[must_use]
    pub fn caption_layout(mut self, layout: CaptionLayoutKind) -> Self {
        self.caption_layout = layout;
        self
    }

    /// Set the caption mode.
    #[must_use]
    pub fn caption_mode(mut self, mode: CaptionMode) -> Self {
        self.caption_mode = mode;
        self
    }

    /// Set the expand duration.
    #[must_use]
    pub fn expand_duration(mut self, duration: Duration) -> Self {
        self.expand_duration = duration;
        self
    }

    /// Set the collapse duration.
    #[must_use]
    pub fn collapse_duration(mut self, duration: Duration) -> Self {
        self.collapse_duration = duration;
        self
    }

    /// Set the close-control delay.
    #[must_use]
    pub fn close_control_delay(mut self, delay: Duration) -> Self {
        self.close_control_delay = delay;
        self
    }

    /// Set the close-control fade duration.
    #[must_use]
    pub fn close_control_duration(mut self, duration: Duration) -> Self {
        self.close_control_duration = duration;
        self
    }

    /// Set the staged caption duration.
    #[must_use]
    pub fn caption_duration(mut self, duration: Duration) -> Self {
        self.caption_duration = duration;
        self
    }

    /// Set the expand curve.
    #[must_use]
    pub fn expand_curve(mut self, curve: Curve) -> Self {
        self.expand_curve = curve;
        self
    }

    /// Set the collapse curve. Only timing curves pass [`validate`](Self::validate).
    #[must_use]
    pub fn collapse_curve(mut self, curve: Curve) -> Self {
        self.collapse_curve = curve;
        self
    }

    /// Set the expanded image height.
    #[must_use]
    pub fn expanded_height(mut self, height: f32) -> Self {
        self.expanded_height = height;
        self
    }

    /// Set the caption panel height.
    #[must_use]
    pub fn caption_panel_height(mut self, height: f32) -> Self {
        self.caption_panel_height = height;
        self
    }

    /// Allow dismissing mid-expand.
    #[must_use]
    pub fn lenient_dismiss(mut self, lenient: bool) -> Self {
        self.lenient_dismiss = lenient;
        self
    }

    /// Set the reduced-motion preference.
    #[must_use]
    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Set the grid geometry.
    #[must_use]
    pub fn grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("screen.width", self.screen.width)?;
        positive("screen.height", self.screen.height)?;
        positive("expanded_height", self.expanded_height)?;
        positive("caption_panel_height", self.caption_panel_height)?;
        settles("expand_curve", &self.expand_curve)?;
        if !matches!(self.collapse_curve, Curve::Timing { .. }) {
            return Err(ConfigError::CollapseCurve);
        }
        self.grid.validate()
    }

    /// The config actually used at runtime, applying reduced motion.
    ///
    /// Under reduced motion every stage completes on the next tick with
    /// linear timing, so no spring overshoot is ever visible.
    #[must_use]
    pub fn effective(&self) -> Self {
        if !self.reduced_motion {
            return self.clone();
        }
        Self {
            expand_duration: Duration::ZERO,
            collapse_duration: Duration::ZERO,
            close_control_delay: Duration::ZERO,
            close_control_duration: Duration::ZERO,
            caption_duration: Duration::ZERO,
            expand_curve: Curve::LINEAR,
            collapse_curve: Curve::LINEAR,
            ..self.clone()
        }
    }

    /// Dimensions the caption layouts anchor to.
    #[must_use]
    pub fn caption_geometry(&self) -> CaptionGeometry {
        CaptionGeometry {
            screen: self.screen,
            expanded_height: self.expanded_height,
            panel_height: self.caption_panel_height,
        }
    }

    pub(crate) fn expand_options(&self) -> AnimateOptions {
        AnimateOptions::new(self.expand_duration, self.expand_curve)
    }

    pub(crate) fn collapse_options(&self) -> AnimateOptions {
        AnimateOptions::new(self.collapse_duration, self.collapse_curve)
    }

    pub(crate) fn caption_options(&self) -> AnimateOptions {
        AnimateOptions::new(self.caption_duration, Curve::LINEAR)
    }

    pub(crate) fn close_control_options(&self) -> AnimateOptions {
        AnimateOptions::new(self.close_control_duration, Curve::LINEAR)
            .with_delay(self.close_control_delay)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Springs need real stiffness and damping to ever reach rest.
fn settles(field: &'static str, curve: &Curve) -> Result<(), ConfigError> {
    let Curve::Spring(params) = curve else {
        return Ok(());
    };
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if ok(params.stiffness) && ok(params.damping) {
        Ok(())
    } else {
        Err(ConfigError::Spring {
            field,
            stiffness: params.stiffness,
            damping: params.damping,
        })
    }
}

#[cfg(feature = "serde")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis().min(u128::from(u64::MAX)) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
