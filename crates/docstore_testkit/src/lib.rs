//! # DocStore Testkit
//!
//! Test utilities for DocStore.
//!
//! This crate provides:
//! - Document fixtures and a ready-to-use client harness
//! - Property-based test generators using proptest
//! - Wire-format checks against reference JSON
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docstore_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn creates_clean_documents() {
//!     let harness = TestClient::signed_in();
//!     let doc = harness.create_document(new_document("Notes")).await.unwrap();
//!     assert!(doc.is_clean());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod wire;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::wire::*;
}

pub use fixtures::*;
pub use generators::*;
pub use wire::*;
