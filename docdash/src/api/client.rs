use std::path::Path;
use std::time::Duration;

use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::dto::{
    DocumentsResponse, ExamplesResponse, ProcessRequest, ProcessResponse, QueryRequest,
    SearchRequest, SearchResponse, StatsResponse,
};
use crate::{
    config::ApiConfig,
    error::{DashboardError, Result},
    models::{Document, HealthStatus, QueryResult, SearchResult, Stats},
    validation::{self, optional_filter, require_text},
};

/// Multipart field name the backend reads the PDF from.
const UPLOAD_FIELD: &str = "pdf";

/// A file picked for upload, held in memory until it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document.pdf")
            .to_string();
        Ok(Self::from_bytes(file_name, bytes))
    }
}

/// Raw endpoints that can be inspected without interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEndpoint {
    Health,
    Stats,
    Documents,
}

impl ProbeEndpoint {
    fn segments(self) -> &'static [&'static str] {
        match self {
            ProbeEndpoint::Health => &["health"],
            ProbeEndpoint::Stats => &["api", "stats"],
            ProbeEndpoint::Documents => &["api", "documents"],
        }
    }
}

/// Typed wrapper over the backend's HTTP/JSON API.
///
/// Every method issues exactly one request; nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::InvalidBaseUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["health"])?;
        self.send(self.request(Method::GET, url)).await
    }

    /// `GET /api/documents`
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let url = self.endpoint(&["api", "documents"])?;
        let body: DocumentsResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(body.documents)
    }

    /// `GET /api/stats`
    pub async fn stats(&self) -> Result<Stats> {
        let url = self.endpoint(&["api", "stats"])?;
        let body: StatsResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(body.stats)
    }

    /// Upload a PDF and have it processed; returns the number of chunks created.
    pub async fn upload_document(&self, file: &UploadFile) -> Result<u64> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let url = self.endpoint(&["api", "documents", "upload"])?;
        debug!(file = %file.file_name, size = file.bytes.len(), "Uploading document");
        let body: ProcessResponse = self
            .send(self.request(Method::POST, url).multipart(form))
            .await?;
        Ok(body.chunks_processed)
    }

    /// Process a file that already sits in the backend's storage.
    pub async fn process_document(&self, file_name: &str) -> Result<u64> {
        let file_name = require_text(file_name, validation::MISSING_FILE_NAME)?;
        let url = self.endpoint(&["api", "documents", "process"])?;
        let body: ProcessResponse = self
            .send(
                self.request(Method::POST, url)
                    .json(&ProcessRequest { file_name }),
            )
            .await?;
        Ok(body.chunks_processed)
    }

    /// `DELETE /api/documents/:name`
    pub async fn delete_document(&self, name: &str) -> Result<()> {
        require_text(name, validation::MISSING_DOCUMENT)?;
        let url = self.endpoint(&["api", "documents", name])?;
        let _: Value = self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    pub async fn query(&self, query: &str, document_name: Option<&str>) -> Result<QueryResult> {
        let query = require_text(query, validation::MISSING_QUERY)?;
        let request = QueryRequest {
            query,
            document_name: optional_filter(document_name),
        };
        let url = self.endpoint(&["api", "query"])?;
        self.send(self.request(Method::POST, url).json(&request))
            .await
    }

    pub async fn search(
        &self,
        query: &str,
        document_name: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SearchResult>> {
        let query = require_text(query, validation::MISSING_SEARCH_QUERY)?;
        let request = SearchRequest {
            query,
            document_name: optional_filter(document_name),
            limit,
        };
        let url = self.endpoint(&["api", "search"])?;
        let body: SearchResponse = self
            .send(self.request(Method::POST, url).json(&request))
            .await?;
        Ok(body.results)
    }

    /// Few-shot examples generated for one document; `None` when the
    /// backend has none.
    pub async fn few_shot_examples(&self, document_name: &str) -> Result<Option<String>> {
        let document_name = require_text(document_name, validation::MISSING_DOCUMENT)?;
        let url = self.endpoint(&["api", "documents", document_name, "examples"])?;
        let body: ExamplesResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(body.few_shot_examples.filter(|examples| !examples.is_empty()))
    }

    /// Fetch an endpoint and return whatever JSON it answers with, error
    /// statuses included.
    pub async fn probe(&self, endpoint: ProbeEndpoint) -> Result<Value> {
        let url = self.endpoint(endpoint.segments())?;
        let response = self.request(Method::GET, url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, "Probe response received");
        Ok(serde_json::from_slice(&body)?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Sending request");
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        read_json(response).await
    }
}

/// Decode a response body, turning non-2xx JSON bodies into
/// [`DashboardError::Server`]. Bodies that are not JSON surface as
/// [`DashboardError::Json`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;
    debug!(%status, len = body.len(), "Response received");

    if status.is_success() {
        // `{}` and an empty 204 body mean the same thing for delete
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"{}")?);
        }
        return Ok(serde_json::from_slice(&body)?);
    }

    let value: Value = serde_json::from_slice(&body)?;
    let message = match value.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => format!("HTTP {status}"),
    };

    Err(DashboardError::Server {
        status: status.as_u16(),
        message,
    })
}
