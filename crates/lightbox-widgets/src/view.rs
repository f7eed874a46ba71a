#![forbid(unsafe_code)]

//! Presentation layer: widgets that render a [`TransitionFrame`] into a
//! [`DisplayList`], and hit testing that maps taps back to [`Intent`]s.
//!
//! Rendering is a pure function of the frame; widgets never touch the
//! machine. The platform backend walks the display list in order and draws
//! each command with its opacity.

use lightbox_core::geometry::{Point, Rect};

use crate::Widget;
use crate::catalog::{Catalog, ItemId};
use crate::config::LightboxConfig;
use crate::grid::GridLayout;
use crate::transition::{Intent, TransitionFrame};

/// Side length of the square close control.
pub const CLOSE_CONTROL_SIZE: f32 = 44.0;
/// Gap between the close control and the screen's top-right corner.
pub const CLOSE_CONTROL_INSET: f32 = 12.0;
/// Padding between the caption panel's edge and its text.
pub const CAPTION_PADDING: f32 = 12.0;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Screen background behind the grid.
    pub const BACKGROUND: Color = Color::rgb(0xF5, 0xFC, 0xFF);
    /// Scroll container background, visible through the cell margins.
    pub const GRID_BACKGROUND: Color = Color::BLACK;
    pub const CAPTION_PANEL: Color = Color::rgba(0, 0, 0, 0xB3);
}

/// One drawing operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "kebab-case"))]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: Color,
        opacity: f32,
    },
    /// Draw the catalog image for `item`, cover-scaled into `rect`.
    Image {
        item: ItemId,
        rect: Rect,
        opacity: f32,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        opacity: f32,
    },
    /// The dismiss affordance (an "X").
    CloseGlyph {
        rect: Rect,
        color: Color,
        opacity: f32,
    },
}

impl DrawCommand {
    #[must_use]
    pub fn rect(&self) -> Rect {
        match self {
            Self::Fill { rect, .. }
            | Self::Image { rect, .. }
            | Self::Text { rect, .. }
            | Self::CloseGlyph { rect, .. } => *rect,
        }
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        match self {
            Self::Fill { opacity, .. }
            | Self::Image { opacity, .. }
            | Self::Text { opacity, .. }
            | Self::CloseGlyph { opacity, .. } => *opacity,
        }
    }
}

/// Ordered drawing commands, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command. Fully transparent commands are dropped.
    pub fn push(&mut self, command: DrawCommand) {
        if command.opacity() > 0.0 {
            self.commands.push(command);
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Items drawn as images, in draw order.
    pub fn images(&self) -> impl Iterator<Item = (ItemId, Rect)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { item, rect, .. } => Some((*item, *rect)),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Screen rect of the close control.
#[must_use]
pub fn close_control_rect(config: &LightboxConfig) -> Rect {
    Rect::new(
        config.screen.width - CLOSE_CONTROL_SIZE - CLOSE_CONTROL_INSET,
        CLOSE_CONTROL_INSET,
        CLOSE_CONTROL_SIZE,
        CLOSE_CONTROL_SIZE,
    )
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

/// The scrolled image grid.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    grid: &'a GridLayout,
    hidden: Option<ItemId>,
}

impl<'a> GridView<'a> {
    #[must_use]
    pub fn new(grid: &'a GridLayout) -> Self {
        Self { grid, hidden: None }
    }

    /// Leave `item`'s cell empty; the overlay stands in for it.
    #[must_use]
    pub fn hide(mut self, item: Option<ItemId>) -> Self {
        self.hidden = item;
        self
    }
}

impl Widget for GridView<'_> {
    fn render(&self, area: Rect, list: &mut DisplayList) {
        if area.is_empty() {
            return;
        }
        list.push(DrawCommand::Fill {
            rect: area,
            color: Color::GRID_BACKGROUND,
            opacity: 1.0,
        });
        for item in self.grid.visible_items() {
            if Some(item) == self.hidden {
                continue;
            }
            if let Some(rect) = self.grid.page_rect(item) {
                list.push(DrawCommand::Image {
                    item,
                    rect: rect.page(),
                    opacity: 1.0,
                });
            }
        }
    }
}

/// Backdrop plus the moving image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayView {
    pub item: ItemId,
    pub image_rect: Rect,
    /// Backdrop opacity; follows the image progress.
    pub backdrop_opacity: f32,
}

impl Widget for OverlayView {
    fn render(&self, area: Rect, list: &mut DisplayList) {
        list.push(DrawCommand::Fill {
            rect: area,
            color: Color::BLACK,
            opacity: self.backdrop_opacity,
        });
        list.push(DrawCommand::Image {
            item: self.item,
            rect: self.image_rect,
            opacity: 1.0,
        });
    }
}

/// The caption panel and its text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionPanel<'a> {
    pub text: Option<&'a str>,
    pub opacity: f32,
}

impl Widget for CaptionPanel<'_> {
    fn render(&self, area: Rect, list: &mut DisplayList) {
        if area.is_empty() {
            return;
        }
        list.push(DrawCommand::Fill {
            rect: area,
            color: Color::CAPTION_PANEL,
            opacity: self.opacity,
        });
        if let Some(text) = self.text {
            let inner = Rect::new(
                area.x + CAPTION_PADDING,
                area.y + CAPTION_PADDING,
                (area.width - 2.0 * CAPTION_PADDING).max(0.0),
                (area.height - 2.0 * CAPTION_PADDING).max(0.0),
            );
            list.push(DrawCommand::Text {
                rect: inner,
                text: text.to_owned(),
                color: Color::WHITE,
                opacity: self.opacity,
            });
        }
    }
}

/// The dismiss affordance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseControl {
    pub opacity: f32,
}

impl Widget for CloseControl {
    fn render(&self, area: Rect, list: &mut DisplayList) {
        list.push(DrawCommand::CloseGlyph {
            rect: area,
            color: Color::WHITE,
            opacity: self.opacity,
        });
    }
}

/// Everything on screen for one frame.
#[derive(Debug, Clone, Copy)]
pub struct LightboxView<'a> {
    pub catalog: &'a Catalog,
    pub grid: &'a GridLayout,
    pub config: &'a LightboxConfig,
    pub frame: &'a TransitionFrame,
}

impl Widget for LightboxView<'_> {
    fn render(&self, area: Rect, list: &mut DisplayList) {
        list.push(DrawCommand::Fill {
            rect: area,
            color: Color::BACKGROUND,
            opacity: 1.0,
        });
        GridView::new(self.grid)
            .hide(self.frame.state.active_item)
            .render(self.grid.viewport(), list);

        let (Some(item), Some(image_rect)) = (self.frame.state.active_item, self.frame.overlay_rect)
        else {
            return;
        };
        OverlayView {
            item,
            image_rect,
            backdrop_opacity: self.frame.state.image_progress,
        }
        .render(area, list);

        if let Some(caption_rect) = self.frame.caption_rect {
            let text = self
                .catalog
                .get(item)
                .and_then(|entry| entry.caption.as_deref());
            CaptionPanel {
                text,
                opacity: self.frame.caption_opacity,
            }
            .render(caption_rect, list);
        }

        CloseControl {
            opacity: self.frame.close_control_opacity,
        }
        .render(close_control_rect(self.config), list);
    }
}

/// Map a tap to an intent.
///
/// The close control wins when it is visible and under the point. While the
/// overlay is shown nothing else is tappable; otherwise a grid cell under the
/// point selects its item.
#[must_use]
pub fn hit_test(
    frame: &TransitionFrame,
    grid: &GridLayout,
    config: &LightboxConfig,
    point: Point,
) -> Option<Intent> {
    if frame.close_control_opacity > 0.0 && close_control_rect(config).contains(point) {
        return Some(Intent::Dismiss);
    }
    if frame.overlay_visible() {
        return None;
    }
    grid.hit_test(point).map(Intent::Select)
}
