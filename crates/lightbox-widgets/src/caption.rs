#![forbid(unsafe_code)]

//! Caption panel placement strategies.
//!
//! A caption layout maps the captured origin rect and the caption's progress
//! value to the panel's screen rect. Both strategies interpolate between a
//! start rect (progress 0) and an end rect (progress 1); only the two
//! endpoint rects differ.
//!
//! | Layout    | At 0                                                  | At 1                                          |
//! |-----------|-------------------------------------------------------|-----------------------------------------------|
//! | `Cover`   | just below the grid cell, cell width, down to the screen bottom | overlapping the image bottom, full width, panel height |
//! | `SlideUp` | below the screen's bottom edge, full width            | directly under the expanded image             |

use std::fmt;
use std::str::FromStr;

use lightbox_core::animation::interpolate_rect;
use lightbox_core::geometry::{PageRect, Rect, Size};

use crate::error::ConfigError;

/// Fixed dimensions the caption strategies anchor to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionGeometry {
    pub screen: Size,
    /// Height of the expanded image.
    pub expanded_height: f32,
    /// Height of the caption panel when fully revealed.
    pub panel_height: f32,
}

/// Compute the caption panel rect from the origin rect and progress.
pub trait CaptionLayout {
    /// Panel rect at progress 0.
    fn start_rect(&self, origin: &PageRect, geometry: &CaptionGeometry) -> Rect;

    /// Panel rect at progress 1.
    fn end_rect(&self, geometry: &CaptionGeometry) -> Rect;

    /// Panel rect at `progress` (clamped to [0, 1]).
    fn caption_rect(&self, origin: &PageRect, progress: f32, geometry: &CaptionGeometry) -> Rect {
        interpolate_rect(
            progress,
            self.start_rect(origin, geometry),
            self.end_rect(geometry),
        )
    }
}

/// Panel grows out of the grid cell and settles over the bottom of the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cover;

impl CaptionLayout for Cover {
    fn start_rect(&self, origin: &PageRect, geometry: &CaptionGeometry) -> Rect {
        let top = origin.page_y + origin.height;
        Rect::new(
            origin.page_x,
            top,
            origin.width,
            (geometry.screen.height - top).max(0.0),
        )
    }

    fn end_rect(&self, geometry: &CaptionGeometry) -> Rect {
        Rect::new(
            0.0,
            geometry.expanded_height - geometry.panel_height,
            geometry.screen.width,
            geometry.panel_height,
        )
    }
}

/// Panel enters from below the screen and stops under the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlideUp;

impl CaptionLayout for SlideUp {
    fn start_rect(&self, _origin: &PageRect, geometry: &CaptionGeometry) -> Rect {
        Rect::new(
            0.0,
            geometry.screen.height,
            geometry.screen.width,
            geometry.panel_height,
        )
    }

    fn end_rect(&self, geometry: &CaptionGeometry) -> Rect {
        Rect::new(
            0.0,
            geometry.expanded_height,
            geometry.screen.width,
            geometry.panel_height,
        )
    }
}

/// Configured caption layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CaptionLayoutKind {
    #[default]
    Cover,
    SlideUp,
}

impl CaptionLayoutKind {
    /// The strategy for this layout.
    #[must_use]
    pub fn strategy(self) -> &'static dyn CaptionLayout {
        match self {
            Self::Cover => &Cover,
            Self::SlideUp => &SlideUp,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::SlideUp => "slide-up",
        }
    }
}

impl CaptionLayout for CaptionLayoutKind {
    fn start_rect(&self, origin: &PageRect, geometry: &CaptionGeometry) -> Rect {
        self.strategy().start_rect(origin, geometry)
    }

    fn end_rect(&self, geometry: &CaptionGeometry) -> Rect {
        self.strategy().end_rect(geometry)
    }
}

impl fmt::Display for CaptionLayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptionLayoutKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cover" => Ok(Self::Cover),
            "slide-up" | "slide_up" | "slideup" => Ok(Self::SlideUp),
            _ => Err(ConfigError::UnknownCaptionLayout(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> CaptionGeometry {
        CaptionGeometry {
            screen: Size::new(375.0, 667.0),
            expanded_height: 300.0,
            panel_height: 120.0,
        }
    }

    fn origin() -> PageRect {
        PageRect::new(0.0, 0.0, 100.0, 100.0, 10.0, 20.0)
    }

    #[test]
    fn cover_starts_below_cell() {
        let r = Cover.caption_rect(&origin(), 0.0, &geometry());
        assert_eq!(r, Rect::new(10.0, 120.0, 100.0, 547.0));
    }

    #[test]
    fn cover_ends_over_image_bottom() {
        let r = Cover.caption_rect(&origin(), 1.0, &geometry());
        assert_eq!(r, Rect::new(0.0, 180.0, 375.0, 120.0));
    }

    #[test]
    fn slide_up_starts_offscreen() {
        let r = SlideUp.caption_rect(&origin(), 0.0, &geometry());
        assert_eq!(r.y, 667.0);
        assert_eq!(r.width, 375.0);
    }

    #[test]
    fn slide_up_ends_under_image() {
        let r = SlideUp.caption_rect(&origin(), 1.0, &geometry());
        assert_eq!(r, Rect::new(0.0, 300.0, 375.0, 120.0));
    }

    #[test]
    fn progress_clamps() {
        let g = geometry();
        assert_eq!(
            SlideUp.caption_rect(&origin(), 2.0, &g),
            SlideUp.end_rect(&g)
        );
        assert_eq!(
            Cover.caption_rect(&origin(), -1.0, &g),
            Cover.start_rect(&origin(), &g)
        );
    }

    #[test]
    fn kind_dispatches_to_strategy() {
        let g = geometry();
        assert_eq!(
            CaptionLayoutKind::SlideUp.caption_rect(&origin(), 0.5, &g),
            SlideUp.caption_rect(&origin(), 0.5, &g)
        );
    }

    #[test]
    fn kind_parses() {
        assert_eq!("cover".parse::<CaptionLayoutKind>(), Ok(CaptionLayoutKind::Cover));
        assert_eq!(" Slide-Up ".parse::<CaptionLayoutKind>(), Ok(CaptionLayoutKind::SlideUp));
        assert_eq!(
            "fade".parse::<CaptionLayoutKind>(),
            Err(ConfigError::UnknownCaptionLayout("fade".into()))
        );
        assert_eq!(CaptionLayoutKind::SlideUp.to_string(), "slide-up");
    }
}
