//! HTTP client for the document ingestion and retrieval backend.

mod client;
pub mod dto;

pub use client::{ApiClient, ProbeEndpoint, UploadFile};
