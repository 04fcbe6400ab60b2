//! # DocStore Core
//!
//! Local-first document state for DocStore.
//!
//! This crate provides:
//! - The [`Document`] model and authority-assigned [`DocumentId`]s
//! - An insertion-ordered [`EntityStore`] with dirty tracking
//! - Derived views (all, dirty, clean, filtered) recomputed on every read
//! - Per-operation request status
//! - [`DocumentsState`], whose methods are the only way to change state
//!
//! ## Key Invariants
//!
//! - A document id is never reassigned and appears once in iteration order
//! - Documents enter the store clean; only local edits make them dirty
//! - Only an acknowledgment from the authority makes a dirty document clean
//! - Views never store data of their own
//!
//! Nothing here performs I/O. Remote flows live in `docstore_sync_engine`,
//! which drives the `begin_*`/`complete_*` transitions around its network
//! calls.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod state;
mod status;
mod store;
mod types;
mod view;

pub use document::{Document, DocumentId, DocumentPatch, NewDocument};
pub use error::{StoreError, StoreResult};
pub use state::{AckPolicy, DocumentsState, SyncReport, SyncSnapshot};
pub use status::{OperationKind, OperationStatus, OperationTicket, RequestStatus};
pub use store::{CleanOutcome, Documents, EntityStore};
pub use types::{Revision, Timestamp};
pub use view::{DocumentFilter, DocumentView};
