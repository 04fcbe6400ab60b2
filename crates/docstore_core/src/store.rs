//! Normalized in-memory document store.

use crate::document::{Document, DocumentId, DocumentPatch};
use crate::error::{StoreError, StoreResult};
use crate::types::{Revision, Timestamp};
use std::collections::HashMap;
use std::iter::FusedIterator;
use std::slice;

/// A stored document together with its local revision.
#[derive(Debug, Clone)]
struct Slot {
    document: Document,
    revision: Revision,
}

/// Outcome of a revision-checked clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// The document was at the expected revision and is now clean.
    Cleaned,
    /// The document changed after the expected revision; it was left as is.
    Stale {
        /// Revision the document is at now.
        current: Revision,
    },
    /// No document with that id is held by the store.
    Missing,
}

/// Owns every document, keyed by id, in insertion order.
///
/// # Invariants
///
/// - `order` has no duplicates
/// - every id in `order` has exactly one slot in `by_id`, and vice versa
/// - a slot's revision increases on every change to its document
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    order: Vec<DocumentId>,
    by_id: HashMap<DocumentId, Slot>,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document.
    ///
    /// A new id is appended to the iteration order. An existing id keeps its
    /// position and has its record overwritten in place. Returns true if the
    /// id was new.
    pub fn add_document(&mut self, document: Document) -> bool {
        match self.by_id.get_mut(&document.id) {
            Some(slot) => {
                slot.document = document;
                slot.revision = slot.revision.next();
                false
            }
            None => {
                self.order.push(document.id.clone());
                self.by_id.insert(
                    document.id.clone(),
                    Slot {
                        document,
                        revision: Revision::default(),
                    },
                );
                true
            }
        }
    }

    /// Merges `patch` onto the document with `id` and marks it dirty.
    ///
    /// When the patch carries no `updated_at`, the current time is stamped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] if the id is unknown; the
    /// store is left unchanged.
    pub fn edit_document(&mut self, id: &DocumentId, patch: DocumentPatch) -> StoreResult<&Document> {
        let slot = self
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id.clone()))?;

        patch.apply(&mut slot.document, Timestamp::now());
        slot.revision = slot.revision.next();
        Ok(&slot.document)
    }

    /// Clears the dirty flag of every listed document.
    ///
    /// Ids the store does not hold are ignored. Other fields are untouched.
    /// Returns the number of listed ids that were present.
    pub fn mark_clean<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a DocumentId>,
    {
        let mut present = 0;
        for id in ids {
            if let Some(slot) = self.by_id.get_mut(id) {
                present += 1;
                if slot.document.is_dirty {
                    slot.document.is_dirty = false;
                    slot.revision = slot.revision.next();
                }
            }
        }
        present
    }

    /// Clears the dirty flag of `id` only if it is still at `expected`.
    pub fn mark_clean_at(&mut self, id: &DocumentId, expected: Revision) -> CleanOutcome {
        let Some(slot) = self.by_id.get_mut(id) else {
            return CleanOutcome::Missing;
        };

        if slot.revision != expected {
            return CleanOutcome::Stale {
                current: slot.revision,
            };
        }

        if slot.document.is_dirty {
            slot.document.is_dirty = false;
            slot.revision = slot.revision.next();
        }
        CleanOutcome::Cleaned
    }

    /// Returns the document with `id`, if present.
    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.by_id.get(id).map(|slot| &slot.document)
    }

    /// Returns the current local revision of `id`, if present.
    #[must_use]
    pub fn revision(&self, id: &DocumentId) -> Option<Revision> {
        self.by_id.get(id).map(|slot| slot.revision)
    }

    /// Returns true if the store holds `id`.
    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns the number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[DocumentId] {
        &self.order
    }

    /// Iterates over all documents in insertion order.
    ///
    /// The iterator borrows the store and can be cloned to restart.
    pub fn all(&self) -> Documents<'_> {
        Documents {
            order: self.order.iter(),
            by_id: &self.by_id,
        }
    }

    /// Iterates over `(document, revision)` pairs in insertion order.
    pub(crate) fn with_revisions(&self) -> impl Iterator<Item = (&Document, Revision)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .map(|slot| (&slot.document, slot.revision))
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        use std::collections::HashSet;

        let unique: HashSet<_> = self.order.iter().collect();
        assert_eq!(unique.len(), self.order.len(), "duplicate ids in order");
        assert_eq!(self.order.len(), self.by_id.len(), "order/by_id size mismatch");
        for id in &self.order {
            let slot = self.by_id.get(id).expect("id in order without slot");
            assert_eq!(&slot.document.id, id, "slot keyed under a different id");
        }
    }
}

/// Iterator over documents in insertion order.
#[derive(Debug, Clone)]
pub struct Documents<'a> {
    order: slice::Iter<'a, DocumentId>,
    by_id: &'a HashMap<DocumentId, Slot>,
}

impl<'a> Iterator for Documents<'a> {
    type Item = &'a Document;

    fn next(&mut self) -> Option<Self::Item> {
        let by_id = self.by_id;
        self.order
            .by_ref()
            .find_map(|id| by_id.get(id))
            .map(|slot| &slot.document)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.order.size_hint().1)
    }
}

impl FusedIterator for Documents<'_> {}
