//! Request/response bodies exchanged with the backend.
//!
//! Request field names follow the backend's camelCase convention; the
//! entity types themselves live in [`crate::models`].

use serde::{Deserialize, Serialize};

use crate::models::{Document, SearchResult, Stats};

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Body for `POST /api/documents/process`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest<'a> {
    pub file_name: &'a str,
}

/// Body for `POST /api/query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<&'a str>,
}

/// Body for `POST /api/search`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<&'a str>,
    pub limit: u32,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub stats: Stats,
}

/// Returned by both upload and process-by-name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    #[serde(default)]
    pub chunks_processed: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplesResponse {
    #[serde(default)]
    pub few_shot_examples: Option<String>,
}
