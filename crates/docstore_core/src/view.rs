//! Derived views over the entity store.
//!
//! Views hold no data of their own: every call recomputes from the store,
//! so a view can never disagree with the canonical state.

use crate::document::Document;
use crate::error::StoreError;
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which subset of documents the filtered view returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentFilter {
    /// Every document.
    #[default]
    None,
    /// Only documents with local changes.
    OnlyDirty,
    /// Only documents matching the authority.
    OnlyClean,
}

impl DocumentFilter {
    /// Every filter value.
    pub const ALL: [DocumentFilter; 3] = [Self::None, Self::OnlyDirty, Self::OnlyClean];

    /// Returns the wire name of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::OnlyDirty => "ONLY_DIRTY",
            Self::OnlyClean => "ONLY_CLEAN",
        }
    }

    /// Returns true if `document` belongs to this subset.
    #[inline]
    #[must_use]
    pub fn matches(self, document: &Document) -> bool {
        match self {
            Self::None => true,
            Self::OnlyDirty => document.is_dirty,
            Self::OnlyClean => !document.is_dirty,
        }
    }
}

impl fmt::Display for DocumentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFilter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| StoreError::InvalidFilter { value: s.into() })
    }
}

/// A read-only view of a store under a filter.
#[derive(Debug, Clone, Copy)]
pub struct DocumentView<'a> {
    store: &'a EntityStore,
    filter: DocumentFilter,
}

impl<'a> DocumentView<'a> {
    /// Creates a view of `store` with `filter` as the default subset.
    #[must_use]
    pub fn new(store: &'a EntityStore, filter: DocumentFilter) -> Self {
        Self { store, filter }
    }

    /// The filter used by [`filtered`](Self::filtered).
    #[must_use]
    pub fn filter(&self) -> DocumentFilter {
        self.filter
    }

    /// All documents in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &'a Document> + Clone + 'a {
        self.store.all()
    }

    /// Documents with local changes, in insertion order.
    pub fn dirty(&self) -> impl Iterator<Item = &'a Document> + Clone + 'a {
        self.subset(DocumentFilter::OnlyDirty)
    }

    /// Documents matching the authority, in insertion order.
    pub fn clean(&self) -> impl Iterator<Item = &'a Document> + Clone + 'a {
        self.subset(DocumentFilter::OnlyClean)
    }

    /// Documents selected by the view's filter.
    pub fn filtered(&self) -> impl Iterator<Item = &'a Document> + Clone + 'a {
        self.subset(self.filter)
    }

    /// Documents selected by an explicit filter.
    pub fn subset(&self, filter: DocumentFilter) -> impl Iterator<Item = &'a Document> + Clone + 'a {
        self.store.all().filter(move |doc| filter.matches(doc))
    }

    /// Number of documents.
    #[must_use]
    pub fn all_count(&self) -> usize {
        self.store.len()
    }

    /// Number of dirty documents.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty().count()
    }

    /// Number of clean documents.
    #[must_use]
    pub fn clean_count(&self) -> usize {
        self.clean().count()
    }

    /// Number of documents selected by the view's filter.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.filtered().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentPatch;
    use crate::types::Timestamp;

    fn store_with(ids: &[&str], dirty: &[&str]) -> EntityStore {
        let mut store = EntityStore::new();
        for id in ids {
            store.add_document(Document::new(*id, *id, "", "", Timestamp::from_millis(1)));
        }
        for id in dirty {
            store.edit_document(&(*id).into(), DocumentPatch::new()).unwrap();
        }
        store
    }

    fn ids<'a>(docs: impl Iterator<Item = &'a Document>) -> Vec<&'a str> {
        docs.map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn subsets_preserve_order() {
        let store = store_with(&["a", "b", "c", "d"], &["d", "b"]);
        let view = DocumentView::new(&store, DocumentFilter::None);

        assert_eq!(ids(view.all()), vec!["a", "b", "c", "d"]);
        assert_eq!(ids(view.dirty()), vec!["b", "d"]);
        assert_eq!(ids(view.clean()), vec!["a", "c"]);
    }

    #[test]
    fn filtered_follows_filter() {
        let store = store_with(&["a", "b"], &["b"]);

        let view = DocumentView::new(&store, DocumentFilter::None);
        assert_eq!(ids(view.filtered()), vec!["a", "b"]);

        let view = DocumentView::new(&store, DocumentFilter::OnlyDirty);
        assert_eq!(ids(view.filtered()), vec!["b"]);
        assert_eq!(view.filtered_count(), 1);

        let view = DocumentView::new(&store, DocumentFilter::OnlyClean);
        assert_eq!(ids(view.filtered()), vec!["a"]);
    }

    #[test]
    fn counts() {
        let store = store_with(&["a", "b", "c"], &["a"]);
        let view = DocumentView::new(&store, DocumentFilter::OnlyClean);

        assert_eq!(view.all_count(), 3);
        assert_eq!(view.dirty_count(), 1);
        assert_eq!(view.clean_count(), 2);
        assert_eq!(view.filtered_count(), 2);
    }

    #[test]
    fn filter_names_round_trip() {
        for filter in DocumentFilter::ALL {
            assert_eq!(filter.as_str().parse::<DocumentFilter>().unwrap(), filter);
        }
        assert!("only_dirty".parse::<DocumentFilter>().is_err());
        assert!("".parse::<DocumentFilter>().is_err());
    }

    #[test]
    fn filter_serde_uses_wire_names() {
        let json = serde_json::to_string(&DocumentFilter::OnlyDirty).unwrap();
        assert_eq!(json, "\"ONLY_DIRTY\"");
        let parsed: DocumentFilter = serde_json::from_str("\"ONLY_CLEAN\"").unwrap();
        assert_eq!(parsed, DocumentFilter::OnlyClean);
    }

    #[test]
    fn default_filter_is_none() {
        assert_eq!(DocumentFilter::default(), DocumentFilter::None);
    }
}
