//! Document records, create requests and edit patches.

use crate::document::DocumentId;
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// A document as held by the entity store.
///
/// `is_dirty` is true iff the local copy is known to differ from the last
/// copy the authority acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Authority-assigned identifier. Never reassigned.
    pub id: DocumentId,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author name.
    pub author: String,
    /// Creation time, set once by the authority.
    pub created_at: Timestamp,
    /// Time of the last local or remote mutation.
    pub updated_at: Timestamp,
    /// Whether the local copy has diverged from the authority.
    #[serde(default)]
    pub is_dirty: bool,
}

impl Document {
    /// Creates a clean document with identical creation and update times.
    pub fn new(
        id: impl Into<DocumentId>,
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            author: author.into(),
            created_at,
            updated_at: created_at,
            is_dirty: false,
        }
    }

    /// Returns true if the document matches the last acknowledged copy.
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.is_dirty
    }
}

/// Fields a client supplies when asking the authority to create a document.
///
/// There is no id: the authority assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author name.
    pub author: String,
}

impl NewDocument {
    /// Creates a new create request.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
        }
    }
}

/// A partial update to a document.
///
/// Fields left as `None` keep their current value. Applying any patch,
/// even an empty one, marks the document dirty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Explicit update time. Stamped with the current time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl DocumentPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the author.
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets an explicit update time.
    #[must_use]
    pub fn updated_at(mut self, at: Timestamp) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Returns true if no field would be overwritten.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.updated_at.is_none()
    }

    /// Merges the patch onto `document` and marks it dirty.
    ///
    /// `now` is used for `updated_at` when the patch carries none.
    pub(crate) fn apply(self, document: &mut Document, now: Timestamp) {
        if let Some(title) = self.title {
            document.title = title;
        }
        if let Some(content) = self.content {
            document.content = content;
        }
        if let Some(author) = self.author {
            document.author = author;
        }
        document.updated_at = self.updated_at.unwrap_or(now);
        document.is_dirty = true;
    }
}
