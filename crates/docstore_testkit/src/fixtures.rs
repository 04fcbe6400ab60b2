//! Test fixtures and client helpers.
//!
//! Provides document builders and a client harness wired to a
//! [`MockRemote`] with a known account.

use docstore_core::{Document, DocumentId, DocumentsState, NewDocument, Timestamp};
use docstore_sync_engine::{ClientConfig, DocumentClient, MockRemote, SessionManager};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Email of the account every harness registers.
pub const TEST_EMAIL: &str = "tester@example.com";
/// Password of the account every harness registers.
pub const TEST_PASSWORD: &str = "correct horse";
/// Display name of the account every harness registers.
pub const TEST_USER: &str = "Tester";
/// Creation time used by fixture documents.
pub const FIXTURE_TIME: Timestamp = Timestamp(1_700_000_000_000);

/// A clean document whose title is its id.
pub fn document(id: &str) -> Document {
    Document::new(id, id, format!("content of {id}"), TEST_USER, FIXTURE_TIME)
}

/// A document with unsynced local changes.
pub fn dirty_document(id: &str) -> Document {
    Document {
        is_dirty: true,
        ..document(id)
    }
}

/// Clean documents for each id, in order.
pub fn documents(ids: &[&str]) -> Vec<Document> {
    ids.iter().map(|id| document(id)).collect()
}

/// A create request authored by the test user.
pub fn new_document(title: &str) -> NewDocument {
    NewDocument::new(title, format!("content of {title}"), TEST_USER)
}

/// A state holding a clean document for each id.
pub fn state_with(ids: &[&str]) -> DocumentsState {
    let mut state = DocumentsState::new();
    for doc in documents(ids) {
        state.add_document(doc);
    }
    state
}

/// Installs a test-friendly tracing subscriber.
///
/// Honors `RUST_LOG`. Safe to call from every test; only the first call
/// installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A document client backed by a [`MockRemote`].
///
/// Dereferences to the client, so every client method is available
/// directly on the harness.
pub struct TestClient {
    client: DocumentClient<MockRemote>,
}

impl TestClient {
    /// Creates a signed-out harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a signed-out harness with `config`.
    pub fn with_config(config: ClientConfig) -> Self {
        Self::build(config, SessionManager::new())
    }

    /// Creates a harness whose session already holds a token.
    pub fn signed_in() -> Self {
        Self::build(
            ClientConfig::default(),
            SessionManager::with_user("test-token", TEST_USER),
        )
    }

    fn build(config: ClientConfig, session: SessionManager) -> Self {
        let remote = MockRemote::new();
        remote.add_account(TEST_EMAIL, TEST_PASSWORD, TEST_USER);
        Self {
            client: DocumentClient::new(config, remote, Arc::new(session)),
        }
    }

    /// The mock authority behind the client.
    pub fn remote(&self) -> &MockRemote {
        self.client.api()
    }

    /// A handle to the client that can be moved into a task.
    pub fn handle(&self) -> DocumentClient<MockRemote> {
        self.client.clone()
    }

    /// Adds each document as is.
    pub fn seed(&self, documents: impl IntoIterator<Item = Document>) {
        for doc in documents {
            self.client.add_document(doc);
        }
    }

    /// Ids of the dirty documents, in store order.
    pub fn dirty_ids(&self) -> Vec<DocumentId> {
        self.client.dirty_documents().into_iter().map(|d| d.id).collect()
    }

    /// Ids of the clean documents, in store order.
    pub fn clean_ids(&self) -> Vec<DocumentId> {
        self.client.clean_documents().into_iter().map(|d| d.id).collect()
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestClient {
    type Target = DocumentClient<MockRemote>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
