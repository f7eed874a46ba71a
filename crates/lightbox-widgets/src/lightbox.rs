#![forbid(unsafe_code)]

//! The lightbox controller: catalog, grid, and transition machine wired
//! together.
//!
//! [`Lightbox`] is what a host embeds. It turns taps into intents, resolves a
//! selected cell's geometry through the grid, and drives everything from one
//! [`tick`](Lightbox::tick) per display frame.
//!
//! # Measurement
//!
//! A freshly mounted cell has no layout until the next layout pass, which
//! runs at the start of each tick. Selecting such a cell parks the selection
//! as *pending*; the expand starts on the tick whose layout pass resolves
//! it, or the selection is dropped if the cell unmounts first. While a
//! selection is pending further selects are ignored, matching the rule for
//! selects during a transition.

use std::time::Duration;

use lightbox_core::geometry::{Point, Rect};

use crate::Widget;
use crate::catalog::{Catalog, ItemId};
use crate::config::LightboxConfig;
use crate::error::{ConfigError, TransitionError};
use crate::grid::GridLayout;
use crate::measure::{Measure, Measurement};
use crate::transition::{Intent, Phase, TransitionFrame, TransitionMachine};
use crate::view::{DisplayList, LightboxView, hit_test};

/// An image grid with an animated lightbox overlay.
#[derive(Debug, Clone)]
pub struct Lightbox {
    catalog: Catalog,
    grid: GridLayout,
    machine: TransitionMachine,
    pending: Option<ItemId>,
}

impl Lightbox {
    /// Validate `config` and lay out `catalog` full-screen.
    pub fn new(catalog: Catalog, config: &LightboxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = GridLayout::new(config.grid, Rect::from_size(config.screen), catalog.len());
        Ok(Self {
            catalog,
            grid,
            machine: TransitionMachine::new(config),
            pending: None,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    #[must_use]
    pub fn machine(&self) -> &TransitionMachine {
        &self.machine
    }

    /// The effective configuration.
    #[must_use]
    pub fn config(&self) -> &LightboxConfig {
        self.machine.config()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Selection waiting for its cell's layout.
    #[must_use]
    pub fn pending_selection(&self) -> Option<ItemId> {
        self.pending
    }

    /// Current frame with derived geometry.
    #[must_use]
    pub fn frame(&self) -> TransitionFrame {
        self.machine.frame()
    }

    /// Apply `intent`. Returns `true` if it was accepted (a select whose
    /// measurement is pending counts as accepted).
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Select(item) => self.select(item),
            Intent::Dismiss => self.machine.dismiss(),
        }
    }

    /// Select `item`, measuring its cell.
    pub fn select(&mut self, item: ItemId) -> bool {
        match self.try_select(item) {
            Ok(()) => true,
            Err(err) => {
                lightbox_core::debug!(item = item.index() as u64, reason = %err, "select dropped");
                false
            }
        }
    }

    fn try_select(&mut self, item: ItemId) -> Result<(), TransitionError> {
        if let Some(pending) = self.pending {
            return Err(TransitionError::MeasurementPending { pending });
        }
        let phase = self.machine.phase();
        if phase != Phase::Idle {
            return Err(TransitionError::InvalidTransition {
                intent: Intent::Select(item),
                phase,
            });
        }
        if !self.catalog.contains(item) {
            return Err(TransitionError::MeasurementUnavailable { item });
        }
        match self.grid.measure(item) {
            Measurement::Ready(origin) => {
                if self.machine.select(item, origin) {
                    Ok(())
                } else {
                    Err(TransitionError::MeasurementUnavailable { item })
                }
            }
            Measurement::Pending => {
                lightbox_core::debug!(item = item.index() as u64, "measurement pending");
                self.pending = Some(item);
                Ok(())
            }
            Measurement::Unavailable => Err(TransitionError::MeasurementUnavailable { item }),
        }
    }

    /// Start collapsing the overlay.
    pub fn dismiss(&mut self) -> bool {
        self.machine.dismiss()
    }

    /// Intent for a tap at `point`, without applying it.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<Intent> {
        hit_test(&self.machine.frame(), &self.grid, self.config(), point)
    }

    /// Handle a tap at `point`. Returns the intent it mapped to, if any was
    /// accepted.
    pub fn tap(&mut self, point: Point) -> Option<Intent> {
        let intent = self.hit_test(point)?;
        self.dispatch(intent).then_some(intent)
    }

    /// Scroll the grid. Ignored while the overlay is shown. Returns `true` if
    /// the grid moved.
    ///
    /// Scrolling re-lays out every cell, so a pending selection keeps waiting;
    /// if its cell scrolls out of view the selection is dropped on the next
    /// tick.
    pub fn scroll_by(&mut self, dy: f32) -> bool {
        if self.machine.phase().is_visible() {
            return false;
        }
        self.grid.scroll_by(dy)
    }

    /// Run one frame: layout pass, pending selection, then animations.
    ///
    /// Returns `true` if the phase changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let before = self.machine.phase();
        self.grid.layout_pass();
        self.resolve_pending();
        self.machine.tick(dt);
        self.machine.phase() != before
    }

    fn resolve_pending(&mut self) {
        let Some(item) = self.pending else {
            return;
        };
        match self.grid.measure(item) {
            Measurement::Ready(origin) => {
                self.pending = None;
                self.machine.select(item, origin);
            }
            Measurement::Pending => {}
            Measurement::Unavailable => {
                self.pending = None;
                lightbox_core::debug!(item = item.index() as u64, "pending selection dropped");
            }
        }
    }

    /// Draw the current frame.
    pub fn render(&self, list: &mut DisplayList) {
        let frame = self.machine.frame();
        LightboxView {
            catalog: &self.catalog,
            grid: &self.grid,
            config: self.config(),
            frame: &frame,
        }
        .render(Rect::from_size(self.config().screen), list);
    }
}
