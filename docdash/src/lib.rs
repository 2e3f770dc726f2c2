//! Client and terminal dashboard for a PDF ingestion, semantic search and
//! question-answering backend.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod validation;
