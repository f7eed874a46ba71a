#![forbid(unsafe_code)]

//! Wrap-grid layout of the catalog inside a vertical scroll container.
//!
//! Cells flow left to right in `columns` columns. Each cell is
//! `container_width * cell_width_fraction` wide and `cell_height` tall with
//! `margin` on every side, so one row advances by `cell_height + 2 * margin`.
//!
//! The layout doubles as the default geometry resolver. Cells that intersect
//! the viewport are mounted in a [`CellArena`]; their bounds become
//! measurable after the next [`layout_pass`](GridLayout::layout_pass).
//! Scrolling moves every cell, so it invalidates recorded layouts until the
//! following pass.
//!
//! # Invariants
//!
//! 1. Exactly the items whose cell intersects the viewport are mounted after
//!    [`sync_mounted`](GridLayout::sync_mounted).
//! 2. The scroll offset stays within `[0, max_scroll()]`.
//! 3. A measured [`PageRect`] has content-relative `x, y` (before scroll) and
//!    screen-relative `page_x, page_y` (after scroll and container origin).

use std::ops::Range;

use lightbox_core::geometry::{PageRect, Point, Rect};

use crate::catalog::ItemId;
use crate::error::ConfigError;
use crate::measure::{CellArena, Measure, Measurement};

/// Grid geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub columns: usize,
    /// Cell width as a fraction of the container width.
    pub cell_width_fraction: f32,
    pub cell_height: f32,
    /// Margin on all four sides of each cell.
    pub margin: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            cell_width_fraction: 0.328,
            cell_height: 120.0,
            margin: 1.0,
        }
    }
}

impl GridConfig {
    /// Set the column count (builder pattern).
    #[must_use]
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Set the cell height (builder pattern).
    #[must_use]
    pub fn cell_height(mut self, height: f32) -> Self {
        self.cell_height = height;
        self
    }

    /// Set the per-side margin (builder pattern).
    #[must_use]
    pub fn margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Check the geometry is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        let f = self.cell_width_fraction;
        if !(f.is_finite() && f > 0.0 && f <= 1.0) {
            return Err(ConfigError::CellWidthFraction(f));
        }
        if !(self.cell_height.is_finite() && self.cell_height > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "cell_height",
                value: self.cell_height,
            });
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "margin",
                value: self.margin,
            });
        }
        Ok(())
    }
}

/// Layout, scroll state, and mounted cells of the image grid.
#[derive(Debug, Clone)]
pub struct GridLayout {
    config: GridConfig,
    /// Screen-space bounds of the scroll container.
    viewport: Rect,
    item_count: usize,
    scroll: f32,
    arena: CellArena,
}

impl GridLayout {
    /// Lay out `item_count` cells in `viewport` and mount the visible ones.
    ///
    /// Mounted cells are pending until the first [`layout_pass`](Self::layout_pass).
    #[must_use]
    pub fn new(config: GridConfig, viewport: Rect, item_count: usize) -> Self {
        let mut grid = Self {
            config,
            viewport,
            item_count,
            scroll: 0.0,
            arena: CellArena::new(),
        };
        grid.sync_mounted();
        grid
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[must_use]
    pub fn arena(&self) -> &CellArena {
        &self.arena
    }

    #[must_use]
    pub fn cell_width(&self) -> f32 {
        self.viewport.width * self.config.cell_width_fraction
    }

    fn row_pitch(&self) -> f32 {
        self.config.cell_height + 2.0 * self.config.margin
    }

    fn column_pitch(&self) -> f32 {
        self.cell_width() + 2.0 * self.config.margin
    }

    fn rows(&self) -> usize {
        self.item_count.div_ceil(self.config.columns.max(1))
    }

    /// Height of the scrolled content.
    #[must_use]
    pub fn content_height(&self) -> f32 {
        self.rows() as f32 * self.row_pitch()
    }

    #[must_use]
    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport.height).max(0.0)
    }

    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Cell bounds relative to the scroll content (before scroll).
    #[must_use]
    pub fn cell_rect(&self, item: ItemId) -> Option<Rect> {
        if item.index() >= self.item_count {
            return None;
        }
        let columns = self.config.columns.max(1);
        let (row, col) = (item.index() / columns, item.index() % columns);
        let m = self.config.margin;
        Some(Rect::new(
            col as f32 * self.column_pitch() + m,
            row as f32 * self.row_pitch() + m,
            self.cell_width(),
            self.config.cell_height,
        ))
    }

    /// Current bounds of `item` in both coordinate spaces.
    #[must_use]
    pub fn page_rect(&self, item: ItemId) -> Option<PageRect> {
        self.cell_rect(item).map(|local| {
            PageRect::new(
                local.x,
                local.y,
                local.width,
                local.height,
                self.viewport.x + local.x,
                self.viewport.y + local.y - self.scroll,
            )
        })
    }

    /// Items whose row range overlaps the viewport. Callers still check the
    /// exact cell bounds; this only narrows the scan.
    fn candidate_range(&self) -> Range<usize> {
        let columns = self.config.columns.max(1);
        let pitch = self.row_pitch();
        if pitch <= 0.0 || self.item_count == 0 {
            return 0..0;
        }
        let first_row = (self.scroll / pitch).floor().max(0.0) as usize;
        let last_row = ((self.scroll + self.viewport.height) / pitch).floor().max(0.0) as usize;
        let start = (first_row * columns).min(self.item_count);
        let end = ((last_row + 1) * columns).min(self.item_count);
        start..end
    }

    /// Whether `item`'s cell intersects the viewport.
    #[must_use]
    pub fn is_visible(&self, item: ItemId) -> bool {
        self.page_rect(item)
            .is_some_and(|r| r.page().intersects(&self.viewport))
    }

    /// Items currently intersecting the viewport, in index order.
    pub fn visible_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.candidate_range()
            .map(ItemId)
            .filter(|&item| self.is_visible(item))
    }

    /// Mount newly visible cells and unmount cells that left the viewport.
    pub fn sync_mounted(&mut self) {
        let stale: Vec<ItemId> = self
            .arena
            .mounted()
            .filter(|&item| !self.is_visible(item))
            .collect();
        for item in stale {
            self.arena.unmount(item);
        }
        let visible: Vec<ItemId> = self.visible_items().collect();
        for item in visible {
            self.arena.mount(item);
        }
    }

    /// Resolve every pending layout. Returns how many cells were resolved.
    pub fn layout_pass(&mut self) -> usize {
        let pending: Vec<ItemId> = self.arena.pending().collect();
        let mut resolved = 0;
        for item in pending {
            if let Some(rect) = self.page_rect(item)
                && self.arena.record_layout(item, rect)
            {
                resolved += 1;
            }
        }
        resolved
    }

    /// Scroll to `offset` (clamped). Returns `true` if the offset changed.
    pub fn set_scroll(&mut self, offset: f32) -> bool {
        let offset = if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll())
        } else {
            self.scroll
        };
        if offset == self.scroll {
            return false;
        }
        self.scroll = offset;
        self.arena.invalidate_layouts();
        self.sync_mounted();
        true
    }

    /// Scroll by `dy` pixels (positive moves content up).
    pub fn scroll_by(&mut self, dy: f32) -> bool {
        self.set_scroll(self.scroll + dy)
    }

    /// Grid cell under a screen-space point, if any.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<ItemId> {
        if !self.viewport.contains(point) {
            return None;
        }
        self.visible_items().find(|&item| {
            self.page_rect(item)
                .is_some_and(|r| r.page().contains(point))
        })
    }
}

impl Measure for GridLayout {
    fn measure(&mut self, item: ItemId) -> Measurement {
        self.arena.measure(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize) -> GridLayout {
        GridLayout::new(
            GridConfig::default(),
            Rect::new(0.0, 0.0, 375.0, 667.0),
            count,
        )
    }

    #[test]
    fn default_config_matches_three_column_grid() {
        let config = GridConfig::default();
        assert_eq!(config.columns, 3);
        assert_eq!(config.cell_height, 120.0);
        assert_eq!(config.margin, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        assert_eq!(
            GridConfig::default().columns(0).validate(),
            Err(ConfigError::NoColumns)
        );
        assert!(matches!(
            GridConfig::default().cell_height(0.0).validate(),
            Err(ConfigError::NonPositive { field: "cell_height", .. })
        ));
        let wide = GridConfig {
            cell_width_fraction: 1.5,
            ..GridConfig::default()
        };
        assert_eq!(wide.validate(), Err(ConfigError::CellWidthFraction(1.5)));
    }

    #[test]
    fn cells_wrap_into_rows() {
        let g = grid(7);
        let w = 375.0 * 0.328;
        assert_eq!(g.cell_rect(ItemId(0)), Some(Rect::new(1.0, 1.0, w, 120.0)));
        let fourth = g.cell_rect(ItemId(3)).unwrap();
        assert_eq!(fourth.x, 1.0);
        assert_eq!(fourth.y, 123.0);
        let second = g.cell_rect(ItemId(1)).unwrap();
        assert!((second.x - (w + 3.0)).abs() < 1e-4);
        assert_eq!(g.cell_rect(ItemId(7)), None);
    }

    #[test]
    fn content_height_and_scroll_clamp() {
        let mut g = grid(30);
        assert_eq!(g.content_height(), 10.0 * 122.0);
        assert!(g.set_scroll(10_000.0));
        assert_eq!(g.scroll(), g.max_scroll());
        assert!(g.set_scroll(-5.0));
        assert_eq!(g.scroll(), 0.0);
        assert!(!g.set_scroll(f32::NAN));
    }

    #[test]
    fn only_visible_cells_mount() {
        let g = grid(30);
        // 667 / 122 covers rows 0..=5.
        assert_eq!(g.arena().mounted_count(), 18);
        assert!(g.arena().is_mounted(ItemId(17)));
        assert!(!g.arena().is_mounted(ItemId(18)));
    }

    #[test]
    fn layout_pass_resolves_pending_cells() {
        let mut g = grid(6);
        assert_eq!(g.measure(ItemId(4)), Measurement::Pending);
        assert_eq!(g.layout_pass(), 6);
        let rect = g.measure(ItemId(4)).ready().unwrap();
        assert_eq!(rect.y, 123.0);
        assert_eq!(rect.page_y, 123.0);
        assert_eq!(g.layout_pass(), 0);
    }

    #[test]
    fn scrolling_unmounts_and_invalidates() {
        let mut g = grid(60);
        g.layout_pass();
        assert!(g.scroll_by(122.0 * 3.0));
        assert_eq!(g.measure(ItemId(0)), Measurement::Unavailable);
        assert_eq!(g.measure(ItemId(9)), Measurement::Pending);
        g.layout_pass();
        let rect = g.measure(ItemId(9)).ready().unwrap();
        assert_eq!(rect.y, 367.0);
        assert_eq!(rect.page_y, 1.0);
    }

    #[test]
    fn page_rect_includes_viewport_origin() {
        let g = GridLayout::new(
            GridConfig::default(),
            Rect::new(0.0, 44.0, 375.0, 600.0),
            3,
        );
        let rect = g.page_rect(ItemId(0)).unwrap();
        assert_eq!(rect.y, 1.0);
        assert_eq!(rect.page_y, 45.0);
    }

    #[test]
    fn hit_test_maps_points_to_cells() {
        let g = grid(9);
        assert_eq!(g.hit_test(Point::new(10.0, 10.0)), Some(ItemId(0)));
        assert_eq!(g.hit_test(Point::new(10.0, 130.0)), Some(ItemId(3)));
        // Margin gutter between rows.
        assert_eq!(g.hit_test(Point::new(10.0, 121.5)), None);
        // Below the last row.
        assert_eq!(g.hit_test(Point::new(10.0, 500.0)), None);
        assert_eq!(g.hit_test(Point::new(-1.0, 10.0)), None);
    }
}
