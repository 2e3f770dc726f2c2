use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Rejected locally, before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl DashboardError {
    /// Inline banner text shown to the user for this failure.
    pub fn banner(&self) -> String {
        match self {
            DashboardError::Validation(msg) => msg.clone(),
            DashboardError::Server { message, .. } => format!("❌ Error: {message}"),
            DashboardError::Http(e) => format!("❌ Network error: {e}"),
            DashboardError::Json(e) => format!("❌ Network error: {e}"),
            DashboardError::Io(e) => format!("❌ Error: {e}"),
            DashboardError::UrlParse(e) => format!("❌ Error: {e}"),
            DashboardError::InvalidBaseUrl(msg) => format!("❌ Error: {msg}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
