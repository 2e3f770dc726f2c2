#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docdash::api::ApiClient;
use docdash::config::{ApiConfig, ViewConfig};
use docdash::dashboard::Dashboard;

/// Client pointing at a mock server
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout_secs: Some(10),
    })
    .expect("mock server uri should be a valid base url")
}

pub fn dashboard_for(server: &MockServer) -> Dashboard {
    Dashboard::new(client_for(server), ViewConfig::default())
}

/// A dashboard whose backend refuses connections.
pub fn unreachable_dashboard() -> Dashboard {
    let client = ApiClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: Some(5),
    })
    .expect("static url should parse");
    Dashboard::new(client, ViewConfig::default())
}

pub fn documents_body(docs: &[(&str, u64)]) -> Value {
    json!({
        "documents": docs
            .iter()
            .map(|(name, chunks)| json!({
                "name": name,
                "created_at": "2024-03-05T10:15:00Z",
                "chunk_count": chunks
            }))
            .collect::<Vec<_>>()
    })
}

pub fn stats_body(documents: u64, chunks: u64) -> Value {
    json!({
        "stats": {
            "totalDocuments": documents,
            "totalChunks": chunks,
            "averageChunkSize": 512,
            "documentsWithExamples": 0
        }
    })
}

pub fn error_body(message: &str) -> Value {
    json!({ "error": message })
}

/// Mount the list and stats endpoints, each expected exactly `times` times.
pub async fn mount_refresh(server: &MockServer, docs: &[(&str, u64)], times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(documents_body(docs)))
        .expect(times)
        .mount(server)
        .await;

    let total_chunks = docs.iter().map(|(_, chunks)| chunks).sum();
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(stats_body(docs.len() as u64, total_chunks)),
        )
        .expect(times)
        .mount(server)
        .await;
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

/// Write a tiny PDF into `dir` and return its path
pub fn write_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"%PDF-1.4\n1 0 obj << >> endobj\ntrailer << >>\n%%EOF\n")
        .unwrap_or_else(|e| panic!("Failed to write PDF fixture '{name}': {e}"));
    path
}
