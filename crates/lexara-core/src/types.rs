//! Shared domain types: documents, search modes, and search requests/responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A document as handed to the engine and returned from queries.
///
/// `Document` is serialized as-is into the `documents` namespace, so its
/// field names are part of the on-disk record format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<HashMap<String, String>>,
    /// Stamped by the engine on first insert, never by the caller.
    #[serde(default)]
    pub created_at: i64,
    /// Stamped by the engine on every upsert, never by the caller.
    #[serde(default)]
    pub updated_at: i64,
}

impl Document {
    /// The text that gets tokenized and indexed: `title + " " + content`.
    /// `url` and `metadata` never participate in indexing.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Equality over the fields a caller supplies and reasons about,
    /// ignoring the engine-stamped timestamps.
    pub fn eq_ignoring_timestamps(&self, other: &Document) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.content == other.content
            && self.url == other.url
            && self.metadata == other.metadata
    }
}

/// AND/OR query semantics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    And,
    Or,
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::And
    }
}

/// Options accompanying a `search` call.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub mode: SearchMode,
    pub use_ranking: bool,
    pub limit: usize,
    pub offset: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::And,
            use_ranking: true,
            limit: 10,
            offset: 0,
        }
    }
}

/// Result of a `search` call: the paginated page of documents, the
/// pre-pagination candidate count, and per-document scores when ranked.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub documents: Vec<Document>,
    pub total: usize,
    /// `scores[i]` corresponds to `documents[i]`. `None` when the query was
    /// unranked (or candidates were empty before ranking would apply).
    pub scores: Option<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn searchable_text_joins_title_and_content() {
        let doc = Document {
            id: "1".into(),
            title: "Go".into(),
            content: "is simple".into(),
            url: None,
            metadata: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(doc.searchable_text(), "Go is simple");
    }

    #[test]
    fn eq_ignoring_timestamps_ignores_stamps_only() {
        let mut a = Document {
            id: "1".into(),
            title: "t".into(),
            content: "c".into(),
            url: None,
            metadata: None,
            created_at: 1,
            updated_at: 1,
        };
        let mut b = a.clone();
        b.created_at = 999;
        b.updated_at = 999;
        assert!(a.eq_ignoring_timestamps(&b));

        a.title = "different".into();
        assert!(!a.eq_ignoring_timestamps(&b));
    }

    #[test]
    fn search_mode_default_is_and() {
        assert_eq!(SearchMode::default(), SearchMode::And);
    }
}
