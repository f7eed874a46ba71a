#![forbid(unsafe_code)]

//! The ordered image catalog shown in the grid.
//!
//! Entries are immutable once added. An entry's position is its identity:
//! [`ItemId`] is the stable index key used by the grid, the cell arena, and
//! the transition machine.

use std::fmt;

/// Stable index of an entry in the [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub usize);

impl ItemId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for ItemId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// One image in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    /// Opaque image source handed to the platform renderer.
    pub source: String,
    /// Text shown in the caption panel when the image is expanded.
    pub caption: Option<String>,
}

impl CatalogEntry {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            caption: None,
        }
    }

    /// Attach a caption (builder pattern).
    #[must_use]
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Ordered, append-only list of images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog of caption-less entries from image sources.
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: sources.into_iter().map(CatalogEntry::new).collect(),
        }
    }

    /// Append an entry and return its id.
    pub fn push(&mut self, entry: CatalogEntry) -> ItemId {
        self.entries.push(entry);
        ItemId(self.entries.len() - 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&CatalogEntry> {
        self.entries.get(id.0)
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        id.0 < self.entries.len()
    }

    /// Entries in display order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &CatalogEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (ItemId(i), entry))
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_positions() {
        let mut catalog = Catalog::new();
        let a = catalog.push(CatalogEntry::new("a.jpg"));
        let b = catalog.push(CatalogEntry::new("b.jpg").caption("Bee"));
        assert_eq!(a, ItemId(0));
        assert_eq!(b, ItemId(1));
        assert_eq!(catalog.get(b).and_then(|e| e.caption.as_deref()), Some("Bee"));
        assert!(catalog.contains(b));
        assert!(!catalog.contains(ItemId(2)));
    }

    #[test]
    fn from_sources_preserves_order() {
        let catalog = Catalog::from_sources(["x", "y", "z"]);
        let sources: Vec<_> = catalog.iter().map(|(_, e)| e.source.as_str()).collect();
        assert_eq!(sources, ["x", "y", "z"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn display_item_id() {
        assert_eq!(ItemId(5).to_string(), "#5");
    }
}
