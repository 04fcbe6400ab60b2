//! Document client: local edits, create and sync flows.

use crate::api::{Credentials, RemoteApi};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::session::{SessionManager, SessionUser};
use docstore_core::{
    Document, DocumentFilter, DocumentId, DocumentPatch, DocumentsState, NewDocument,
    OperationKind, OperationStatus, SyncReport,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the documents state and runs the remote flows against it.
///
/// All mutation goes through this type; the state lock is only held for
/// synchronous transitions, never across a network call. While a create or
/// sync is awaiting the authority, other calls (including further edits)
/// proceed immediately.
///
/// Clones share the same state, API and session.
pub struct DocumentClient<A: RemoteApi> {
    config: ClientConfig,
    api: Arc<A>,
    session: Arc<SessionManager>,
    state: Arc<RwLock<DocumentsState>>,
}

impl<A: RemoteApi> Clone for DocumentClient<A> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            api: Arc::clone(&self.api),
            session: Arc::clone(&self.session),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: RemoteApi> DocumentClient<A> {
    /// Creates a client with an empty store.
    pub fn new(config: ClientConfig, api: A, session: Arc<SessionManager>) -> Self {
        Self::with_shared_api(config, Arc::new(api), session)
    }

    /// Creates a client around an API handle shared with other owners.
    pub fn with_shared_api(config: ClientConfig, api: Arc<A>, session: Arc<SessionManager>) -> Self {
        Self {
            config,
            api,
            session,
            state: Arc::new(RwLock::new(DocumentsState::new())),
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The remote API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The session supplying bearer tokens.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Signs in through this client's API.
    pub async fn sign_in(&self, credentials: &Credentials) -> ClientResult<SessionUser> {
        self.session.sign_in(self.api.as_ref(), credentials).await
    }

    /// Runs `f` against the current state under a read lock.
    pub fn read<R>(&self, f: impl FnOnce(&DocumentsState) -> R) -> R {
        f(&self.state.read())
    }

    /// Looks up a document by id.
    pub fn document(&self, id: &DocumentId) -> Option<Document> {
        self.read(|state| state.store().get(id).cloned())
    }

    /// All documents in insertion order.
    pub fn all_documents(&self) -> Vec<Document> {
        self.read(|state| state.view().all().cloned().collect())
    }

    /// Dirty documents in insertion order.
    pub fn dirty_documents(&self) -> Vec<Document> {
        self.read(|state| state.view().dirty().cloned().collect())
    }

    /// Clean documents in insertion order.
    pub fn clean_documents(&self) -> Vec<Document> {
        self.read(|state| state.view().clean().cloned().collect())
    }

    /// Documents selected by the active filter.
    pub fn filtered_documents(&self) -> Vec<Document> {
        self.read(|state| state.view().filtered().cloned().collect())
    }

    /// Number of documents.
    pub fn all_count(&self) -> usize {
        self.read(|state| state.view().all_count())
    }

    /// Number of dirty documents.
    pub fn dirty_count(&self) -> usize {
        self.read(|state| state.view().dirty_count())
    }

    /// Number of clean documents.
    pub fn clean_count(&self) -> usize {
        self.read(|state| state.view().clean_count())
    }

    /// Number of documents selected by the active filter.
    pub fn filtered_count(&self) -> usize {
        self.read(|state| state.view().filtered_count())
    }

    /// The active filter.
    pub fn filter(&self) -> DocumentFilter {
        self.read(DocumentsState::filter)
    }

    /// Sets the active filter.
    pub fn set_filter(&self, filter: DocumentFilter) {
        self.state.write().set_filter(filter);
    }

    /// Sets the active filter by wire name, ignoring unknown names.
    pub fn set_filter_name(&self, name: &str) -> bool {
        self.state.write().set_filter_name(name)
    }

    /// Returns true while any create or sync is outstanding.
    pub fn is_loading(&self) -> bool {
        self.read(DocumentsState::is_loading)
    }

    /// Message of the most recent failed create or sync.
    pub fn error(&self) -> Option<String> {
        self.read(|state| state.error().map(str::to_owned))
    }

    /// Status of one kind of operation.
    pub fn status(&self, kind: OperationKind) -> OperationStatus {
        self.read(|state| state.status().get(kind).clone())
    }

    /// Inserts or replaces a document exactly as given.
    pub fn add_document(&self, document: Document) -> bool {
        self.state.write().add_document(document)
    }

    /// Applies a local edit and marks the document dirty.
    ///
    /// # Errors
    ///
    /// Fails with a store error if the id is unknown. The failure is not
    /// recorded in the request status.
    pub fn edit_document(&self, id: &DocumentId, patch: DocumentPatch) -> ClientResult<Document> {
        let mut state = self.state.write();
        let document = state.edit_document(id, patch)?.clone();
        debug!(%id, "document edited");
        Ok(document)
    }

    /// Asks the authority to create a document and adds the result.
    ///
    /// The failure is recorded in the create status and also returned.
    pub async fn create_document(&self, request: NewDocument) -> ClientResult<Document> {
        let ticket = self.state.write().begin_create();
        let token = self.session.token();
        debug!(title = %request.title, "creating document");

        match self.api.create_document(&token, &request).await {
            Ok(mut document) => {
                document.is_dirty = false;
                info!(id = %document.id, "document created");
                self.state.write().complete_create(ticket, document.clone());
                Ok(document)
            }
            Err(err) => {
                warn!(%err, "create failed");
                self.state.write().fail_create(ticket, err.message());
                Err(err)
            }
        }
    }

    /// Pushes every dirty document to the authority in one batch and
    /// cleans the acknowledged ones.
    ///
    /// The dirty set is captured when the call starts; documents edited
    /// while the request is in flight are handled according to
    /// [`ClientConfig::ack_policy`]. Ids the authority does not acknowledge
    /// stay dirty. On failure nothing but the sync status changes.
    pub async fn sync_dirty(&self) -> ClientResult<SyncReport> {
        let (ticket, snapshot) = self.state.write().begin_sync();

        if snapshot.is_empty() && self.config.skip_empty_sync {
            debug!("nothing dirty, skipping sync");
            let report = self.state.write().complete_sync(
                ticket,
                &snapshot,
                Vec::new(),
                self.config.ack_policy,
            );
            return Ok(report);
        }

        let token = self.session.token();
        info!(dirty = snapshot.len(), "syncing documents");

        match self.api.sync_documents(&token, snapshot.documents()).await {
            Ok(acks) => {
                let report = self.state.write().complete_sync(
                    ticket,
                    &snapshot,
                    acks.into_iter().map(|ack| ack.id),
                    self.config.ack_policy,
                );
                info!(
                    submitted = report.submitted,
                    cleaned = report.cleaned.len(),
                    stale = report.stale.len(),
                    remaining = report.remaining_dirty,
                    "sync complete"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(%err, "sync failed");
                self.state.write().fail_sync(ticket, err.message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRemote;
    use crate::ClientError;
    use docstore_core::{StoreError, Timestamp};

    fn client() -> DocumentClient<MockRemote> {
        DocumentClient::new(
            ClientConfig::default(),
            MockRemote::new(),
            Arc::new(SessionManager::with_user("tok", "Ann")),
        )
    }

    fn doc(id: &str) -> Document {
        Document::new(id, id, "", "Ann", Timestamp::from_millis(5))
    }

    #[test]
    fn local_edits_and_views() {
        let client = client();
        client.add_document(doc("a"));
        client.add_document(doc("b"));

        let edited = client
            .edit_document(&"b".into(), DocumentPatch::new().title("B"))
            .unwrap();
        assert!(edited.is_dirty);
        assert_eq!(edited.title, "B");

        assert_eq!(client.all_count(), 2);
        assert_eq!(client.dirty_count(), 1);
        assert_eq!(client.clean_count(), 1);

        client.set_filter(DocumentFilter::OnlyClean);
        assert_eq!(client.filtered_documents(), vec![doc("a")]);
        assert_eq!(client.filtered_count(), 1);
    }

    #[test]
    fn editing_unknown_document_is_a_local_error() {
        let client = client();
        let err = client
            .edit_document(&"nope".into(), DocumentPatch::new())
            .unwrap_err();

        assert_eq!(err, ClientError::Store(StoreError::not_found("nope")));
        assert_eq!(client.error(), None);
        assert!(!client.is_loading());
    }

    #[test]
    fn invalid_filter_name_is_ignored() {
        let client = client();
        assert!(client.set_filter_name("ONLY_DIRTY"));
        assert!(!client.set_filter_name("bogus"));
        assert_eq!(client.filter(), DocumentFilter::OnlyDirty);
    }

    #[test]
    fn clones_share_state() {
        let client = client();
        let other = client.clone();
        client.add_document(doc("a"));
        assert_eq!(other.document(&"a".into()), Some(doc("a")));
    }

    #[tokio::test]
    async fn create_passes_session_token() {
        let client = client();
        let created = client
            .create_document(NewDocument::new("t", "c", "Ann"))
            .await
            .unwrap();

        let id = created.id.clone();
        assert_eq!(client.document(&id), Some(created));
        assert_eq!(client.api().tokens_seen(), vec!["tok".to_string()]);
    }

    #[tokio::test]
    async fn empty_sync_can_skip_round_trip() {
        let client = DocumentClient::new(
            ClientConfig::new().with_skip_empty_sync(true),
            MockRemote::new(),
            Arc::new(SessionManager::new()),
        );

        let report = client.sync_dirty().await.unwrap();
        assert_eq!(report, SyncReport::default());
        assert!(client.api().sync_requests().is_empty());
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn empty_sync_still_calls_authority_by_default() {
        let client = client();
        let report = client.sync_dirty().await.unwrap();

        assert_eq!(report.submitted, 0);
        assert_eq!(client.api().sync_requests(), vec![Vec::<Document>::new()]);
    }
}
