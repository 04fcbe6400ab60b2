//! Property-based test generators using proptest.
//!
//! Provides strategies for documents, patches and filters, plus a small
//! operation language for driving a [`DocumentsState`] through random
//! histories.

use docstore_core::{
    AckPolicy, Document, DocumentFilter, DocumentId, DocumentPatch, DocumentsState, Timestamp,
};
use proptest::prelude::*;

/// Strategy for generating document ids from a small pool, so that
/// operations collide often.
pub fn document_id_strategy() -> impl Strategy<Value = DocumentId> {
    (0u8..16).prop_map(|n| DocumentId::new(format!("doc-{n}")))
}

/// Strategy for generating short free text.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ]{0,24}").expect("Invalid regex")
}

/// Strategy for generating timestamps.
pub fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
    (0u64..4_000_000_000_000).prop_map(Timestamp::from_millis)
}

/// Strategy for generating documents with either dirty state.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    (
        document_id_strategy(),
        text_strategy(),
        text_strategy(),
        text_strategy(),
        timestamp_strategy(),
        any::<bool>(),
    )
        .prop_map(|(id, title, content, author, created_at, is_dirty)| Document {
            is_dirty,
            ..Document::new(id, title, content, author, created_at)
        })
}

/// Strategy for generating patches touching any subset of fields.
pub fn patch_strategy() -> impl Strategy<Value = DocumentPatch> {
    (
        prop::option::of(text_strategy()),
        prop::option::of(text_strategy()),
        prop::option::of(text_strategy()),
        prop::option::of(timestamp_strategy()),
    )
        .prop_map(|(title, content, author, updated_at)| DocumentPatch {
            title,
            content,
            author,
            updated_at,
        })
}

/// Strategy for generating filters.
pub fn filter_strategy() -> impl Strategy<Value = DocumentFilter> {
    prop::sample::select(DocumentFilter::ALL.to_vec())
}

/// Strategy for generating filter names, valid or not.
pub fn filter_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        filter_strategy().prop_map(|f| f.as_str().to_owned()),
        prop::string::string_regex("[A-Za-z_]{0,12}").expect("Invalid regex"),
    ]
}

/// One step in a random store history.
#[derive(Debug, Clone)]
pub enum StoreOp {
    /// Insert or replace a document.
    Add(Document),
    /// Edit a document, which may not exist.
    Edit(DocumentId, DocumentPatch),
    /// Run a sync that acknowledges the listed ids.
    Sync(Vec<DocumentId>),
    /// Run a sync that fails.
    FailSync,
    /// Change the active filter.
    SetFilter(DocumentFilter),
}

/// Strategy for generating a single store operation.
pub fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        3 => document_strategy().prop_map(StoreOp::Add),
        3 => (document_id_strategy(), patch_strategy())
            .prop_map(|(id, patch)| StoreOp::Edit(id, patch)),
        2 => prop::collection::vec(document_id_strategy(), 0..6).prop_map(StoreOp::Sync),
        1 => Just(StoreOp::FailSync),
        1 => filter_strategy().prop_map(StoreOp::SetFilter),
    ]
}

/// Strategy for generating a history of up to `max_len` operations.
pub fn store_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<StoreOp>> {
    prop::collection::vec(store_op_strategy(), 0..max_len)
}

/// Applies `op` to `state`. Edits of unknown ids are skipped.
pub fn apply_op(state: &mut DocumentsState, op: StoreOp, policy: AckPolicy) {
    match op {
        StoreOp::Add(doc) => {
            state.add_document(doc);
        }
        StoreOp::Edit(id, patch) => {
            let _ = state.edit_document(&id, patch);
        }
        StoreOp::Sync(acks) => {
            let (ticket, snapshot) = state.begin_sync();
            state.complete_sync(ticket, &snapshot, acks, policy);
        }
        StoreOp::FailSync => {
            let (ticket, _snapshot) = state.begin_sync();
            state.fail_sync(ticket, "unavailable");
        }
        StoreOp::SetFilter(filter) => state.set_filter(filter),
    }
}

/// Applies every operation in order.
pub fn apply_ops(state: &mut DocumentsState, ops: impl IntoIterator<Item = StoreOp>, policy: AckPolicy) {
    for op in ops {
        apply_op(state, op, policy);
    }
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn document_ids_come_from_pool(id in document_id_strategy()) {
            prop_assert!(id.as_str().starts_with("doc-"));
        }

        #[test]
        fn generated_documents_have_consistent_times(doc in document_strategy()) {
            prop_assert_eq!(doc.created_at, doc.updated_at);
        }

        #[test]
        fn valid_filter_names_parse(filter in filter_strategy()) {
            prop_assert_eq!(filter.as_str().parse::<DocumentFilter>().ok(), Some(filter));
        }

        #[test]
        fn histories_apply_without_loading(ops in store_ops_strategy(24)) {
            let mut state = DocumentsState::new();
            apply_ops(&mut state, ops, AckPolicy::default());
            prop_assert!(!state.is_loading());
        }
    }
}
