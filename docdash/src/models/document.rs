use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One ingested source file, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub chunk_count: u64,
}

impl Document {
    /// Calendar date of `created_at`, or the raw value when it is not a
    /// timestamp we recognise.
    pub fn created_date(&self) -> String {
        let raw = self.created_at.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return parsed.date_naive().to_string();
        }

        // SQLite CURRENT_TIMESTAMP style
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
                return parsed.date().to_string();
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.to_string();
        }

        raw.to_string()
    }
}

/// Aggregate counters, fully derived server-side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub total_chunks: u64,
    #[serde(default)]
    pub average_chunk_size: f64,
    #[serde(default)]
    pub documents_with_examples: u64,
}

/// Body of `GET /health`. Anything besides `status` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_deserializes_wire_shape() {
        let doc: Document = serde_json::from_value(json!({
            "name": "policy.pdf",
            "created_at": "2024-03-05T10:15:00Z",
            "chunk_count": 42
        }))
        .unwrap();

        assert_eq!(doc.name, "policy.pdf");
        assert_eq!(doc.chunk_count, 42);
        assert_eq!(doc.created_date(), "2024-03-05");
    }

    #[test]
    fn test_created_date_accepts_sqlite_timestamps() {
        let doc = Document {
            name: "a.pdf".to_string(),
            created_at: "2024-11-30 23:59:01".to_string(),
            chunk_count: 1,
        };
        assert_eq!(doc.created_date(), "2024-11-30");
    }

    #[test]
    fn test_created_date_falls_back_to_raw_value() {
        let doc = Document {
            name: "a.pdf".to_string(),
            created_at: "yesterday".to_string(),
            chunk_count: 0,
        };
        assert_eq!(doc.created_date(), "yesterday");
    }

    #[test]
    fn test_stats_uses_camel_case_fields() {
        let stats: Stats = serde_json::from_value(json!({
            "totalDocuments": 3,
            "totalChunks": 120,
            "averageChunkSize": 512,
            "documentsWithExamples": 2
        }))
        .unwrap();

        assert_eq!(stats.total_documents, 3);
        assert_eq!(stats.total_chunks, 120);
        assert_eq!(stats.average_chunk_size, 512.0);
        assert_eq!(stats.documents_with_examples, 2);
    }

    #[test]
    fn test_health_keeps_extra_fields() {
        let health: HealthStatus = serde_json::from_value(json!({
            "status": "ok",
            "uptime": 12.5
        }))
        .unwrap();

        assert_eq!(health.status, "ok");
        assert_eq!(health.extra.get("uptime"), Some(&json!(12.5)));
    }
}
