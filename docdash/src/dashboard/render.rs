//! Plain-text views of the dashboard state.

use std::fmt::Write;

use super::controller::Dashboard;
use super::state::{ServerStatus, Tone};
use crate::models::{Document, QueryResult, SearchResult, Stats};

pub const NO_DOCUMENTS: &str = "No documents processed yet.";

/// Scores in [0, 1] as a percentage with one decimal, e.g. `0.873` → `87.3%`.
pub fn percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// First `max_chars` characters of `content`, with `...` when cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let mut cut: String = content.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

pub fn status_line(status: ServerStatus) -> String {
    format!("Server Status: {}", status.badge())
}

pub fn message(message: &str) -> String {
    match Tone::of(message) {
        Tone::Success => message.to_string(),
        Tone::Error => format!("! {message}"),
    }
}

pub fn stats(stats: &Stats) -> String {
    let mut out = String::from("Statistics\n");
    let _ = writeln!(out, "  Documents:      {}", stats.total_documents);
    let _ = writeln!(out, "  Chunks:         {}", stats.total_chunks);
    let _ = writeln!(out, "  Avg Chunk Size: {}", stats.average_chunk_size);
    let _ = write!(out, "  With Examples:  {}", stats.documents_with_examples);
    out
}

pub fn documents(documents: &[Document]) -> String {
    let mut out = format!("Processed Documents ({})\n", documents.len());
    if documents.is_empty() {
        out.push_str(NO_DOCUMENTS);
        return out;
    }

    let lines: Vec<String> = documents
        .iter()
        .map(|doc| {
            format!(
                "  {}\n    {} chunks • {}",
                doc.name,
                doc.chunk_count,
                doc.created_date()
            )
        })
        .collect();
    out.push_str(&lines.join("\n"));
    out
}

pub fn query_result(result: &QueryResult) -> String {
    let mut out = String::from("Answer\n");
    let _ = writeln!(out, "  Response: {}", result.answer);
    let _ = write!(
        out,
        "  Confidence: {}    Sources: {}",
        percent(result.confidence),
        result.sources.len()
    );

    for source in &result.sources {
        let _ = write!(out, "\n  - {}\n    {}", source.document_name, source.content);
    }
    out
}

pub fn search_results(results: &[SearchResult], preview_chars: usize) -> String {
    let mut out = format!("Search Results ({})", results.len());
    for result in results {
        let _ = write!(
            out,
            "\n  {}    Similarity: {}\n    {}\n    Chunk #{}",
            result.document_name,
            percent(result.similarity),
            preview(&result.content, preview_chars),
            result.chunk_index
        );
    }
    out
}

pub fn examples(examples: &str) -> String {
    format!(
        "Generated Examples\n{examples}\n\nThese examples are automatically generated from the document content and cached for future use."
    )
}

/// Everything currently worth showing, top to bottom.
pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut sections = vec![status_line(dashboard.server_status())];

    if let Some(text) = dashboard.message() {
        sections.push(message(text));
    }
    if let Some(current) = dashboard.stats() {
        sections.push(stats(current));
    }
    sections.push(documents(dashboard.documents()));
    if let Some(result) = dashboard.query_result() {
        sections.push(query_result(result));
    }
    if !dashboard.search_results().is_empty() {
        sections.push(search_results(
            dashboard.search_results(),
            dashboard.view().preview_chars,
        ));
    }
    if let Some(text) = dashboard.few_shot_examples() {
        sections.push(examples(text));
    }

    sections.join("\n\n")
}
