//! Remote API abstraction.

use crate::error::ClientResult;
use async_trait::async_trait;
use docstore_core::{Document, DocumentId, NewDocument};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign-in credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What the authority returns after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    /// Opaque bearer token for subsequent calls.
    pub token: String,
    /// Display name of the signed-in user.
    pub user_name: String,
}

impl AuthGrant {
    /// Creates a grant.
    pub fn new(token: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_name: user_name.into(),
        }
    }
}

/// Confirmation that the authority durably received one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAck {
    /// Id of the acknowledged document.
    pub id: DocumentId,
}

impl SyncAck {
    /// Creates an acknowledgment for `id`.
    pub fn new(id: impl Into<DocumentId>) -> Self {
        Self { id: id.into() }
    }
}

impl From<DocumentId> for SyncAck {
    fn from(id: DocumentId) -> Self {
        Self { id }
    }
}

/// The remote authority.
///
/// This trait abstracts the network layer. Implementations decide on
/// transport, encoding and timeouts; the client only sees typed results.
/// Every call may fail, and none is retried by the client.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    ///
    /// Failures should be reported as [`ClientError::Auth`](crate::ClientError::Auth).
    async fn authenticate(&self, credentials: &Credentials) -> ClientResult<AuthGrant>;

    /// Creates a document and returns the authoritative record, including
    /// the assigned id and timestamps.
    ///
    /// Failures should be reported as [`ClientError::Create`](crate::ClientError::Create).
    async fn create_document(&self, token: &str, request: &NewDocument) -> ClientResult<Document>;

    /// Submits a batch of dirty documents and returns one acknowledgment
    /// per document the authority accepted.
    ///
    /// Failures should be reported as [`ClientError::Sync`](crate::ClientError::Sync).
    async fn sync_documents(&self, token: &str, documents: &[Document]) -> ClientResult<Vec<SyncAck>>;
}
