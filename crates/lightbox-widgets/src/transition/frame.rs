#![forbid(unsafe_code)]

//! Read-only views of the machine for the presentation layer.
//!
//! [`TransitionSnapshot`] is the stored state. [`TransitionFrame`] adds the
//! visual properties derived from it, recomputed on every tick and never
//! stored by the machine.

use lightbox_core::animation::interpolate_rect;
use lightbox_core::geometry::{PageRect, Rect};

use crate::caption::CaptionLayout;
use crate::catalog::ItemId;
use crate::config::LightboxConfig;

use super::Phase;

/// The machine's state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionSnapshot {
    pub phase: Phase,
    pub active_item: Option<ItemId>,
    pub origin: Option<PageRect>,
    pub image_progress: f32,
    pub caption_progress: f32,
    pub close_control_progress: f32,
}

impl TransitionSnapshot {
    /// State at mount: idle, nothing selected, all progress at 0.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            phase: Phase::Idle,
            active_item: None,
            origin: None,
            image_progress: 0.0,
            caption_progress: 0.0,
            close_control_progress: 0.0,
        }
    }
}

impl Default for TransitionSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

/// A snapshot plus everything the renderer derives from it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionFrame {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub state: TransitionSnapshot,
    /// Screen rect of the overlay image; `None` while idle.
    pub overlay_rect: Option<Rect>,
    /// Screen rect of the caption panel; `None` while idle.
    pub caption_rect: Option<Rect>,
    pub caption_opacity: f32,
    pub close_control_opacity: f32,
}

/// Where the expanded image lands.
#[must_use]
pub fn destination_rect(config: &LightboxConfig) -> Rect {
    Rect::new(0.0, 0.0, config.screen.width, config.expanded_height)
}

impl TransitionFrame {
    /// Derive the visual properties of `state` under `config`.
    #[must_use]
    pub fn derive(state: TransitionSnapshot, config: &LightboxConfig) -> Self {
        let overlay_rect = state.origin.map(|origin| {
            interpolate_rect(state.image_progress, origin.page(), destination_rect(config))
        });
        let geometry = config.caption_geometry();
        let caption_rect = state.origin.map(|origin| {
            config
                .caption_layout
                .caption_rect(&origin, state.caption_progress, &geometry)
        });
        Self {
            state,
            overlay_rect,
            caption_rect,
            caption_opacity: state.caption_progress.clamp(0.0, 1.0),
            close_control_opacity: state.close_control_progress.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Whether the overlay covers the grid.
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_rect.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::CaptionLayoutKind;

    fn origin() -> PageRect {
        PageRect::new(0.0, 0.0, 100.0, 100.0, 10.0, 20.0)
    }

    fn expanding(progress: f32) -> TransitionSnapshot {
        TransitionSnapshot {
            phase: Phase::Expanding,
            active_item: Some(ItemId(5)),
            origin: Some(origin()),
            image_progress: progress,
            caption_progress: progress,
            close_control_progress: 0.0,
        }
    }

    #[test]
    fn idle_frame_has_no_overlay() {
        let frame = TransitionFrame::derive(TransitionSnapshot::initial(), &LightboxConfig::default());
        assert!(!frame.overlay_visible());
        assert_eq!(frame.caption_rect, None);
        assert_eq!(frame.caption_opacity, 0.0);
    }

    #[test]
    fn overlay_starts_at_page_rect() {
        let frame = TransitionFrame::derive(expanding(0.0), &LightboxConfig::default());
        assert_eq!(frame.overlay_rect, Some(Rect::new(10.0, 20.0, 100.0, 100.0)));
    }

    #[test]
    fn overlay_lands_on_destination_exactly() {
        let config = LightboxConfig::default();
        let frame = TransitionFrame::derive(expanding(1.0), &config);
        assert_eq!(frame.overlay_rect, Some(destination_rect(&config)));
        assert_eq!(frame.overlay_rect, Some(Rect::new(0.0, 0.0, 375.0, 300.0)));
    }

    #[test]
    fn caption_follows_configured_layout() {
        let config = LightboxConfig::default().caption_layout(CaptionLayoutKind::SlideUp);
        let frame = TransitionFrame::derive(expanding(1.0), &config);
        assert_eq!(frame.caption_rect, Some(Rect::new(0.0, 300.0, 375.0, 120.0)));
        assert_eq!(frame.caption_opacity, 1.0);
    }

    #[test]
    fn opacities_are_clamped() {
        let mut state = expanding(1.0);
        state.caption_progress = 1.2;
        state.close_control_progress = -0.1;
        let frame = TransitionFrame::derive(state, &LightboxConfig::default());
        assert_eq!(frame.caption_opacity, 1.0);
        assert_eq!(frame.close_control_opacity, 0.0);
    }
}
