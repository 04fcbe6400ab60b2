//! # DocStore Sync Engine
//!
//! Remote flows for DocStore.
//!
//! This crate provides:
//! - The [`RemoteApi`] seam to the authority (create, sync, authenticate)
//! - [`DocumentClient`], the single entry point that owns the documents state
//! - Create and batched sync flows with partial-acknowledgment reconciliation
//! - [`SessionManager`] for sign-in and bearer tokens
//! - [`MockRemote`], an in-memory authority for tests
//!
//! ## Sync Protocol
//!
//! 1. Mark the sync in flight and snapshot the dirty documents
//! 2. Send the snapshot to the authority in one call
//! 3. Clean each acknowledged document; unacknowledged ones stay dirty
//! 4. On failure, record the message and leave every dirty flag alone
//!
//! ## Key Invariants
//!
//! - The authority assigns ids; the client never invents them
//! - Nothing is retried automatically; callers re-invoke on failure
//! - No lock is held across a network call
//! - A document edited while its sync is in flight stays dirty unless
//!   [`AckPolicy::TrustAcknowledged`](docstore_core::AckPolicy) is configured

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod client;
mod config;
mod error;
mod mock;
mod session;

pub use api::{AuthGrant, Credentials, RemoteApi, SyncAck};
pub use client::DocumentClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use mock::{MockRemote, SyncRelease};
pub use session::{SessionManager, SessionUser};
