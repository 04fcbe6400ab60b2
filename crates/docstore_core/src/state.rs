//! The documents state object and its transitions.
//!
//! [`DocumentsState`] bundles the entity store, the active filter and the
//! request status. Every change goes through a method on it; remote flows
//! are split into a `begin_*` half that runs before the network call and a
//! `complete_*` half that applies the response.

use crate::document::{Document, DocumentId, DocumentPatch};
use crate::error::StoreResult;
use crate::status::{OperationKind, OperationTicket, RequestStatus};
use crate::store::{CleanOutcome, EntityStore};
use crate::types::Revision;
use crate::view::{DocumentFilter, DocumentView};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// How acknowledgments from the authority are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckPolicy {
    /// Clean an acknowledged document only if it was part of the snapshot
    /// and has not been edited since.
    #[default]
    RequireUnchanged,
    /// Clean every acknowledged document the store holds, even one edited
    /// while the sync was in flight.
    TrustAcknowledged,
}

/// Dirty documents captured at the moment a sync is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    documents: Vec<Document>,
    revisions: HashMap<DocumentId, Revision>,
}

impl SyncSnapshot {
    /// The captured documents, in store order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Revision the document was at when captured.
    pub fn revision_of(&self, id: &DocumentId) -> Option<Revision> {
        self.revisions.get(id).copied()
    }

    /// Number of captured documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if nothing was dirty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// What a successful sync did to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of documents sent to the authority.
    pub submitted: usize,
    /// Documents whose dirty flag was cleared.
    pub cleaned: Vec<DocumentId>,
    /// Acknowledged documents that were edited after the snapshot.
    ///
    /// Under [`AckPolicy::RequireUnchanged`] these stay dirty; under
    /// [`AckPolicy::TrustAcknowledged`] they were cleaned anyway and also
    /// appear in `cleaned`.
    pub stale: Vec<DocumentId>,
    /// Acknowledged ids that were ignored: not held by the store, or (under
    /// `RequireUnchanged`) not part of the snapshot.
    pub unknown: Vec<DocumentId>,
    /// Dirty documents left in the store after applying the acknowledgment.
    pub remaining_dirty: usize,
}

/// Canonical client-side state for documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentsState {
    store: EntityStore,
    filter: DocumentFilter,
    status: RequestStatus,
}

impl DocumentsState {
    /// Creates an empty state with no filter and nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entity store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Derived views under the active filter.
    pub fn view(&self) -> DocumentView<'_> {
        DocumentView::new(&self.store, self.filter)
    }

    /// The active filter.
    pub fn filter(&self) -> DocumentFilter {
        self.filter
    }

    /// Request status for all flows.
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Returns true while any remote operation is outstanding.
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Message of the most recent failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }

    /// Sets the active filter.
    pub fn set_filter(&mut self, filter: DocumentFilter) {
        self.filter = filter;
    }

    /// Sets the active filter from its wire name.
    ///
    /// Unknown names are ignored and the current filter is kept. Returns
    /// true if the filter was accepted.
    pub fn set_filter_name(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(filter) => {
                self.filter = filter;
                true
            }
            Err(err) => {
                debug!(%err, "ignoring filter");
                false
            }
        }
    }

    /// Inserts or replaces a document exactly as given.
    pub fn add_document(&mut self, document: Document) -> bool {
        self.store.add_document(document)
    }

    /// Applies a local edit and marks the document dirty.
    pub fn edit_document(&mut self, id: &DocumentId, patch: DocumentPatch) -> StoreResult<&Document> {
        self.store.edit_document(id, patch)
    }

    /// Clears the dirty flag of the listed documents.
    pub fn mark_clean<'a, I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a DocumentId>,
    {
        self.store.mark_clean(ids)
    }

    /// Starts a create request.
    pub fn begin_create(&mut self) -> OperationTicket {
        self.status.begin(OperationKind::Create)
    }

    /// Adds the authoritative record returned by a create request.
    ///
    /// The record is stored clean whatever its `is_dirty` says.
    pub fn complete_create(&mut self, ticket: OperationTicket, mut document: Document) {
        document.is_dirty = false;
        debug!(id = %document.id, "document created");
        self.store.add_document(document);
        self.status.settle(ticket, None);
    }

    /// Records a failed create request. The store is not touched.
    pub fn fail_create(&mut self, ticket: OperationTicket, message: impl Into<String>) {
        if !self.status.settle(ticket, Some(message.into())) {
            debug!("dropping superseded create failure");
        }
    }

    /// Starts a sync: marks it in flight and captures the dirty documents.
    pub fn begin_sync(&mut self) -> (OperationTicket, SyncSnapshot) {
        let ticket = self.status.begin(OperationKind::Sync);

        let mut snapshot = SyncSnapshot::default();
        for (document, revision) in self.store.with_revisions() {
            if document.is_dirty {
                snapshot.revisions.insert(document.id.clone(), revision);
                snapshot.documents.push(document.clone());
            }
        }

        (ticket, snapshot)
    }

    /// Applies a successful sync acknowledgment.
    ///
    /// Every acknowledged id is cleaned according to `policy`; dirty
    /// documents without an acknowledgment stay dirty. Repeated ids count
    /// once.
    pub fn complete_sync<I>(
        &mut self,
        ticket: OperationTicket,
        snapshot: &SyncSnapshot,
        acknowledged: I,
        policy: AckPolicy,
    ) -> SyncReport
    where
        I: IntoIterator<Item = DocumentId>,
    {
        let mut report = SyncReport {
            submitted: snapshot.len(),
            ..SyncReport::default()
        };

        let mut seen = HashSet::new();
        for id in acknowledged {
            if !seen.insert(id.clone()) {
                continue;
            }
            match policy {
                AckPolicy::RequireUnchanged => self.apply_fenced_ack(snapshot, id, &mut report),
                AckPolicy::TrustAcknowledged => self.apply_trusted_ack(snapshot, id, &mut report),
            }
        }

        report.remaining_dirty = self.view().dirty_count();
        self.status.settle(ticket, None);
        report
    }

    /// Records a failed sync. No dirty flag changes.
    pub fn fail_sync(&mut self, ticket: OperationTicket, message: impl Into<String>) {
        if !self.status.settle(ticket, Some(message.into())) {
            debug!("dropping superseded sync failure");
        }
    }

    fn apply_fenced_ack(&mut self, snapshot: &SyncSnapshot, id: DocumentId, report: &mut SyncReport) {
        let Some(expected) = snapshot.revision_of(&id) else {
            warn!(%id, "acknowledgment for a document that was not submitted");
            report.unknown.push(id);
            return;
        };

        match self.store.mark_clean_at(&id, expected) {
            CleanOutcome::Cleaned => report.cleaned.push(id),
            CleanOutcome::Stale { current } => {
                warn!(%id, %expected, %current, "changed during sync, ignoring acknowledgment");
                report.stale.push(id);
            }
            CleanOutcome::Missing => report.unknown.push(id),
        }
    }

    fn apply_trusted_ack(&mut self, snapshot: &SyncSnapshot, id: DocumentId, report: &mut SyncReport) {
        let Some(current) = self.store.revision(&id) else {
            report.unknown.push(id);
            return;
        };

        // Every document dirty at snapshot time was captured, so one outside
        // the snapshot that is dirty now changed while the sync was in flight.
        let changed = match snapshot.revision_of(&id) {
            Some(seen) => seen != current,
            None => self.store.get(&id).is_some_and(|doc| doc.is_dirty),
        };
        if changed {
            warn!(%id, "acknowledgment clears an edit made during sync");
            report.stale.push(id.clone());
        }

        self.store.mark_clean([&id]);
        report.cleaned.push(id);
    }
}
