#![forbid(unsafe_code)]

//! Geometry resolution for grid cells.
//!
//! A cell's on-screen bounds are only known after the platform's layout pass
//! for it has run. [`CellArena`] models that: mounting a cell registers a
//! handle whose layout is *pending* until a layout pass records it, and
//! unmounting (scrolling out of view) releases the handle. Measuring goes
//! through the [`Measure`] trait, so the transition controller never touches
//! layout directly.
//!
//! # Invariants
//!
//! 1. The arena is indexed by item index; there is no string lookup.
//! 2. An unmounted item always measures as [`Measurement::Unavailable`].
//! 3. A mounted item measures as [`Measurement::Pending`] until
//!    [`CellArena::record_layout`] is called for it, then as
//!    [`Measurement::Ready`] with that snapshot.
//! 4. Remounting an item issues a fresh handle and clears its old layout.

use lightbox_core::geometry::PageRect;

use crate::catalog::ItemId;

/// Result of asking for an item's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// The layout is known.
    Ready(PageRect),
    /// The item is mounted but its layout pass has not completed yet.
    Pending,
    /// The item is not mounted (never rendered, or scrolled out).
    Unavailable,
}

impl Measurement {
    /// The measured rect, if ready.
    #[must_use]
    pub fn ready(self) -> Option<PageRect> {
        match self {
            Self::Ready(rect) => Some(rect),
            Self::Pending | Self::Unavailable => None,
        }
    }
}

/// A source of item bounds.
pub trait Measure {
    /// Current bounds of `item`.
    fn measure(&mut self, item: ItemId) -> Measurement;
}

impl Measure for CellArena {
    fn measure(&mut self, item: ItemId) -> Measurement {
        CellArena::measure(self, item)
    }
}

/// Handle to a mounted cell. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle(u32);

impl CellHandle {
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct CellSlot {
    handle: CellHandle,
    layout: Option<PageRect>,
}

/// Arena of measurable cell handles, indexed by item index.
#[derive(Debug, Clone, Default)]
pub struct CellArena {
    slots: Vec<Option<CellSlot>>,
    next_handle: u32,
    mounted: usize,
}

impl CellArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `item`, returning its handle. Mounting an already-mounted item
    /// returns the existing handle and keeps its layout.
    pub fn mount(&mut self, item: ItemId) -> CellHandle {
        let index = item.index();
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        if let Some(slot) = self.slots[index] {
            return slot.handle;
        }
        let handle = CellHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.slots[index] = Some(CellSlot {
            handle,
            layout: None,
        });
        self.mounted += 1;
        handle
    }

    /// Unmount `item`. Returns `true` if it was mounted.
    pub fn unmount(&mut self, item: ItemId) -> bool {
        match self.slots.get_mut(item.index()).and_then(Option::take) {
            Some(_) => {
                self.mounted -= 1;
                true
            }
            None => false,
        }
    }

    /// Record the result of a layout pass for a mounted item.
    ///
    /// Returns `false` (and records nothing) if the item is not mounted.
    pub fn record_layout(&mut self, item: ItemId, rect: PageRect) -> bool {
        match self.slots.get_mut(item.index()) {
            Some(Some(slot)) => {
                slot.layout = Some(rect);
                true
            }
            _ => false,
        }
    }

    /// Forget every recorded layout, leaving cells mounted but pending.
    pub fn invalidate_layouts(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.layout = None;
        }
    }

    /// Handle of a mounted item.
    #[must_use]
    pub fn handle(&self, item: ItemId) -> Option<CellHandle> {
        self.slots.get(item.index()).copied().flatten().map(|s| s.handle)
    }

    #[must_use]
    pub fn is_mounted(&self, item: ItemId) -> bool {
        self.handle(item).is_some()
    }

    /// Number of mounted cells.
    #[must_use]
    pub fn mounted_count(&self) -> usize {
        self.mounted
    }

    /// Mounted items whose layout is still pending.
    pub fn pending(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Some(CellSlot { layout: None, .. }) => Some(ItemId(i)),
            _ => None,
        })
    }

    /// Mounted items in index order.
    pub fn mounted(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|_| ItemId(i)))
    }

    /// Bounds of `item` as of the last layout pass.
    #[must_use]
    pub fn measure(&self, item: ItemId) -> Measurement {
        match self.slots.get(item.index()) {
            Some(Some(CellSlot {
                layout: Some(rect), ..
            })) => Measurement::Ready(*rect),
            Some(Some(_)) => Measurement::Pending,
            _ => Measurement::Unavailable,
        }
    }
}
