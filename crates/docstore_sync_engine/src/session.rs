//! Session management.
//!
//! The session holds the bearer token handed out by the authority. An empty
//! token means nobody is signed in.

use crate::api::{Credentials, RemoteApi};
use crate::error::ClientResult;
use docstore_core::{OperationKind, RequestStatus};
use parking_lot::RwLock;
use tracing::{info, warn};

/// The signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUser {
    /// Bearer token, empty when signed out.
    pub token: String,
    /// Display name, empty when signed out.
    pub user_name: String,
}

impl SessionUser {
    /// Returns true if the user holds a token.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user: SessionUser,
    status: RequestStatus,
}

/// Owns the current session and the sign-in flow.
#[derive(Debug, Default)]
pub struct SessionManager {
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that is already signed in.
    pub fn with_user(token: impl Into<String>, user_name: impl Into<String>) -> Self {
        let manager = Self::new();
        manager.state.write().user = SessionUser {
            token: token.into(),
            user_name: user_name.into(),
        };
        manager
    }

    /// Signs in with `credentials`.
    ///
    /// While the call is outstanding the session reports loading. On
    /// success the returned token and user name replace the current user;
    /// on failure the session is reset to signed out and the error message
    /// is recorded. If a newer sign-in already settled, this outcome is
    /// returned to the caller but not applied.
    pub async fn sign_in<A>(&self, api: &A, credentials: &Credentials) -> ClientResult<SessionUser>
    where
        A: RemoteApi + ?Sized,
    {
        let ticket = self.state.write().status.begin(OperationKind::Auth);
        info!(email = %credentials.email, "signing in");

        let result = api.authenticate(credentials).await;

        let mut state = self.state.write();
        match result {
            Ok(grant) => {
                let user = SessionUser {
                    token: grant.token,
                    user_name: grant.user_name,
                };
                if state.status.settle(ticket, None) {
                    info!(user = %user.user_name, "signed in");
                    state.user = user.clone();
                }
                Ok(user)
            }
            Err(err) => {
                if state.status.settle(ticket, Some(err.message())) {
                    warn!(%err, "sign in failed");
                    state.user = SessionUser::default();
                }
                Err(err)
            }
        }
    }

    /// Forgets the current user.
    pub fn sign_out(&self) {
        self.state.write().user = SessionUser::default();
    }

    /// The current user.
    pub fn user(&self) -> SessionUser {
        self.state.read().user.clone()
    }

    /// The current bearer token, empty when signed out.
    pub fn token(&self) -> String {
        self.state.read().user.token.clone()
    }

    /// The current user name, empty when signed out.
    pub fn user_name(&self) -> String {
        self.state.read().user.user_name.clone()
    }

    /// Returns true if a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.state.read().user.is_authenticated()
    }

    /// Returns true while a sign-in is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state.read().status.is_loading()
    }

    /// Message of the last failed sign-in, cleared when a new one starts.
    pub fn error(&self) -> Option<String> {
        self.state.read().status.error().map(str::to_owned)
    }
}
