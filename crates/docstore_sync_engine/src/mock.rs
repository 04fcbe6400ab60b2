//! In-memory authority for tests.

use crate::api::{AuthGrant, Credentials, RemoteApi, SyncAck};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use docstore_core::{Document, DocumentId, NewDocument, Timestamp};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::{oneshot, Notify};
use tracing::debug;

/// Scripted reaction to the next sync call.
#[derive(Debug, Clone)]
enum SyncScript {
    Fail(String),
    AckOnly(Vec<DocumentId>),
}

#[derive(Debug)]
struct Account {
    password: String,
    user_name: String,
}

/// Releases a sync call held by [`MockRemote::hold_next_sync`].
#[derive(Debug)]
pub struct SyncRelease(oneshot::Sender<()>);

impl SyncRelease {
    /// Lets the held sync call return.
    pub fn release(self) {
        // The receiver is gone only if the held call was dropped.
        let _ = self.0.send(());
    }
}

/// A mock authority.
///
/// By default it behaves like a well-formed server: create assigns a fresh
/// id and timestamps, sync stores every submitted document and
/// acknowledges all of them. Failures, partial acknowledgments and delayed
/// responses can be scripted per call.
#[derive(Debug, Default)]
pub struct MockRemote {
    accounts: Mutex<HashMap<String, Account>>,
    issued_tokens: Mutex<HashSet<String>>,
    require_token: Mutex<bool>,
    documents: Mutex<HashMap<DocumentId, Document>>,
    create_failures: Mutex<VecDeque<String>>,
    sync_scripts: Mutex<VecDeque<SyncScript>>,
    sync_requests: Mutex<Vec<Vec<Document>>>,
    tokens_seen: Mutex<Vec<String>>,
    held_sync: Mutex<Option<oneshot::Receiver<()>>>,
    sync_received: Notify,
}

impl MockRemote {
    /// Creates a mock authority with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that can sign in.
    pub fn add_account(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        user_name: impl Into<String>,
    ) {
        self.accounts.lock().insert(
            email.into(),
            Account {
                password: password.into(),
                user_name: user_name.into(),
            },
        );
    }

    /// Rejects document calls whose token was not issued by this mock.
    pub fn set_require_token(&self, required: bool) {
        *self.require_token.lock() = required;
    }

    /// Makes the next create call fail with `message`.
    pub fn fail_next_create(&self, message: impl Into<String>) {
        self.create_failures.lock().push_back(message.into());
    }

    /// Makes the next sync call fail with `message`.
    pub fn fail_next_sync(&self, message: impl Into<String>) {
        self.sync_scripts
            .lock()
            .push_back(SyncScript::Fail(message.into()));
    }

    /// Makes the next sync call acknowledge exactly `ids`.
    ///
    /// The ids need not match what was submitted.
    pub fn ack_next_sync<I>(&self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<DocumentId>,
    {
        let ids = ids.into_iter().map(Into::into).collect();
        self.sync_scripts.lock().push_back(SyncScript::AckOnly(ids));
    }

    /// Holds the next sync call after it has received its documents and
    /// until the returned handle is released.
    pub fn hold_next_sync(&self) -> SyncRelease {
        let (tx, rx) = oneshot::channel();
        *self.held_sync.lock() = Some(rx);
        SyncRelease(tx)
    }

    /// Waits until a sync call has received its documents.
    ///
    /// Returns immediately if one arrived since the last wait.
    pub async fn sync_received(&self) {
        self.sync_received.notified().await;
    }

    /// Batches received by sync calls, oldest first.
    pub fn sync_requests(&self) -> Vec<Vec<Document>> {
        self.sync_requests.lock().clone()
    }

    /// Tokens presented on document calls, oldest first.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().clone()
    }

    /// The authority's copy of a document.
    pub fn stored(&self, id: &DocumentId) -> Option<Document> {
        self.documents.lock().get(id).cloned()
    }

    /// Number of documents the authority holds.
    pub fn stored_count(&self) -> usize {
        self.documents.lock().len()
    }

    fn check_token(&self, token: &str) -> Result<(), String> {
        self.tokens_seen.lock().push(token.to_owned());
        if *self.require_token.lock() && !self.issued_tokens.lock().contains(token) {
            return Err("unauthorized".into());
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteApi for MockRemote {
    async fn authenticate(&self, credentials: &Credentials) -> ClientResult<AuthGrant> {
        let user_name = {
            let accounts = self.accounts.lock();
            match accounts.get(&credentials.email) {
                Some(account) if account.password == credentials.password => {
                    account.user_name.clone()
                }
                _ => return Err(ClientError::auth("invalid email or password")),
            }
        };

        let token = format!("token-{}", DocumentId::generate());
        self.issued_tokens.lock().insert(token.clone());
        Ok(AuthGrant::new(token, user_name))
    }

    async fn create_document(&self, token: &str, request: &NewDocument) -> ClientResult<Document> {
        self.check_token(token).map_err(ClientError::Create)?;

        if let Some(message) = self.create_failures.lock().pop_front() {
            return Err(ClientError::Create(message));
        }

        let document = Document::new(
            DocumentId::generate(),
            request.title.clone(),
            request.content.clone(),
            request.author.clone(),
            Timestamp::now(),
        );
        debug!(id = %document.id, "mock authority created document");
        self.documents
            .lock()
            .insert(document.id.clone(), document.clone());
        Ok(document)
    }

    async fn sync_documents(&self, token: &str, documents: &[Document]) -> ClientResult<Vec<SyncAck>> {
        self.sync_requests.lock().push(documents.to_vec());
        self.sync_received.notify_one();

        let held = self.held_sync.lock().take();
        if let Some(gate) = held {
            // A dropped release handle also lets the call through.
            let _ = gate.await;
        }

        self.check_token(token).map_err(ClientError::Sync)?;

        let script = self.sync_scripts.lock().pop_front();
        match script {
            Some(SyncScript::Fail(message)) => Err(ClientError::Sync(message)),
            Some(SyncScript::AckOnly(ids)) => {
                let mut stored = self.documents.lock();
                for document in documents.iter().filter(|doc| ids.contains(&doc.id)) {
                    stored.insert(document.id.clone(), clean_copy(document));
                }
                Ok(ids.into_iter().map(SyncAck::from).collect())
            }
            None => {
                let mut stored = self.documents.lock();
                Ok(documents
                    .iter()
                    .map(|document| {
                        stored.insert(document.id.clone(), clean_copy(document));
                        SyncAck::new(document.id.clone())
                    })
                    .collect())
            }
        }
    }
}

fn clean_copy(document: &Document) -> Document {
    Document {
        is_dirty: false,
        ..document.clone()
    }
}
