//! Benchmark utilities.

use docstore_core::{Document, DocumentId, DocumentsState, Timestamp};
use rand::Rng;

/// Generate random text of the specified length.
pub fn random_text(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect()
}

/// Generate `count` documents, each dirty with probability `dirty_ratio`.
pub fn generate_documents(count: usize, dirty_ratio: f64) -> Vec<Document> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|n| Document {
            is_dirty: rng.gen_bool(dirty_ratio),
            ..Document::new(
                format!("doc-{n}"),
                random_text(16),
                random_text(256),
                "bench",
                Timestamp::from_millis(n as u64),
            )
        })
        .collect()
}

/// A state holding `count` documents, each dirty with probability `dirty_ratio`.
pub fn populated_state(count: usize, dirty_ratio: f64) -> DocumentsState {
    let mut state = DocumentsState::new();
    for doc in generate_documents(count, dirty_ratio) {
        state.add_document(doc);
    }
    state
}

/// Ids of the dirty documents in `state`.
pub fn dirty_ids(state: &DocumentsState) -> Vec<DocumentId> {
    state.view().dirty().map(|doc| doc.id.clone()).collect()
}
