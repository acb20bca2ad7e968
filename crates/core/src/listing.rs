//! Document list ordering and the refresh signal shared with the dashboard.

use crate::document::Document;

/// Prompt shown before a delete is sent.
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this document?";

/// Message for an empty list.
pub const EMPTY_LIST_MESSAGE: &str = "No documents uploaded yet";

/// Hint shown under [`EMPTY_LIST_MESSAGE`].
pub const EMPTY_LIST_HINT: &str = "Upload your first lease document to get started";

/// Documents ordered newest first by creation time.
///
/// The sort is stable, so documents with equal timestamps keep the order
/// the API returned them in. The input is never reordered.
pub fn by_recency(documents: &[Document]) -> Vec<&Document> {
    let mut sorted: Vec<&Document> = documents.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Drop the document with `id`. Returns whether anything was removed.
pub fn remove_document(documents: &mut Vec<Document>, id: &str) -> bool {
    let before = documents.len();
    documents.retain(|doc| doc.id != id);
    documents.len() != before
}

/// Monotonic counter the parent bumps to ask the list for a full
/// re-fetch. Only change matters, not the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RefreshTrigger(u64);

impl RefreshTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn value(self) -> u64 {
        self.0
    }
}
