//! Document types.

mod id;
mod record;

pub use id::DocumentId;
pub use record::{Document, DocumentPatch, NewDocument};
