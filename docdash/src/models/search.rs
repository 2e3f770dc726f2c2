use serde::{Deserialize, Serialize};

/// One ranked match from a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    pub document_name: String,
    #[serde(default)]
    pub chunk_index: u64,
    /// Normalized relevance in [0, 1].
    pub similarity: f64,
}

/// A chunk the backend cited while answering a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub document_name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    /// Backend certainty in [0, 1].
    pub confidence: f64,
    #[serde(default)]
    pub sources: Vec<Source>,
}
