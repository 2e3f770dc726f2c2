use tracing::{error, info, warn};

use super::confirm::{delete_prompt, Confirm};
use super::state::{Action, Outcome, Phase, ServerStatus};
use crate::{
    api::{ApiClient, UploadFile},
    config::ViewConfig,
    error::{DashboardError, Result},
    models::{Document, HealthStatus, QueryResult, SearchResult, Stats},
    validation::{self, optional_filter, require_text},
};

pub const NO_SEARCH_RESULTS: &str = "No similar chunks found";
pub const NO_EXAMPLES: &str = "No examples found";

/// Inputs the user fills in before triggering an action.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub selected_file: Option<UploadFile>,
    pub file_name: String,
    pub query: String,
    /// Document filter for questions; empty means all documents.
    pub query_document: String,
    pub search_query: String,
    /// Document filter for search; empty means all documents.
    pub search_document: String,
    pub examples_document: String,
}

/// View state for one dashboard instance.
///
/// Handlers take `&mut self`, so at most one action is ever in flight.
pub struct Dashboard {
    client: ApiClient,
    view: ViewConfig,
    pub form: FormState,
    documents: Vec<Document>,
    stats: Option<Stats>,
    server_status: ServerStatus,
    query_result: Option<QueryResult>,
    search_results: Vec<SearchResult>,
    few_shot_examples: Option<String>,
    message: Option<String>,
    phase: Phase,
}

impl Dashboard {
    pub fn new(client: ApiClient, view: ViewConfig) -> Self {
        Self {
            client,
            view,
            form: FormState::default(),
            documents: Vec::new(),
            stats: None,
            server_status: ServerStatus::Checking,
            query_result: None,
            search_results: Vec::new(),
            few_shot_examples: None,
            message: None,
            phase: Phase::Idle,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Zero is ignored; the backend always gets at least one result slot.
    pub fn set_search_limit(&mut self, limit: u32) {
        if limit > 0 {
            self.view.search_limit = limit;
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn server_status(&self) -> ServerStatus {
        self.server_status
    }

    pub fn query_result(&self) -> Option<&QueryResult> {
        self.query_result.as_ref()
    }

    pub fn search_results(&self) -> &[SearchResult] {
        &self.search_results
    }

    pub fn few_shot_examples(&self) -> Option<&str> {
        self.few_shot_examples.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::InFlight(_))
    }

    /// Whether the control for `action` is enabled.
    pub fn can_submit(&self, action: Action) -> bool {
        if self.is_loading() {
            return false;
        }

        match action {
            Action::Upload => self.form.selected_file.is_some(),
            Action::ProcessExisting => !self.form.file_name.trim().is_empty(),
            Action::Query => !self.form.query.trim().is_empty(),
            Action::Search => !self.form.search_query.trim().is_empty(),
            Action::LoadExamples => !self.form.examples_document.trim().is_empty(),
            Action::Delete => true,
        }
    }

    /// Initial load: health, documents and stats, in flight together.
    pub async fn initialize(&mut self) {
        let (health, documents, stats) = tokio::join!(
            self.client.health(),
            self.client.list_documents(),
            self.client.stats()
        );

        self.apply_health(health);
        self.apply_documents(documents);
        self.apply_stats(stats);
    }

    pub async fn check_health(&mut self) -> ServerStatus {
        let health = self.client.health().await;
        self.apply_health(health);
        self.server_status
    }

    pub async fn load_documents(&mut self) {
        let documents = self.client.list_documents().await;
        self.apply_documents(documents);
    }

    pub async fn load_stats(&mut self) {
        let stats = self.client.stats().await;
        self.apply_stats(stats);
    }

    pub async fn upload(&mut self) -> Outcome {
        let Some(file) = self.form.selected_file.take() else {
            return self.reject(validation::MISSING_FILE);
        };

        self.begin(Action::Upload);
        let result = self.client.upload_document(&file).await;

        match self.finish(Action::Upload, result) {
            Some(chunks) => {
                info!(file = %file.file_name, chunks, "Document uploaded");
                self.message = Some(processed_message(chunks));
                self.refresh_after_write().await;
                Outcome::Succeeded
            }
            None => {
                // keep the selection so the user can retry
                self.form.selected_file = Some(file);
                Outcome::Failed
            }
        }
    }

    pub async fn process_existing(&mut self) -> Outcome {
        let file_name = match require_text(&self.form.file_name, validation::MISSING_FILE_NAME) {
            Ok(name) => name.to_string(),
            Err(e) => return self.reject_with(e),
        };

        self.begin(Action::ProcessExisting);
        let result = self.client.process_document(&file_name).await;

        match self.finish(Action::ProcessExisting, result) {
            Some(chunks) => {
                info!(file = %file_name, chunks, "Document processed");
                self.message = Some(processed_message(chunks));
                self.form.file_name.clear();
                self.refresh_after_write().await;
                Outcome::Succeeded
            }
            None => Outcome::Failed,
        }
    }

    pub async fn query(&mut self) -> Outcome {
        let query = match require_text(&self.form.query, validation::MISSING_QUERY) {
            Ok(query) => query.to_string(),
            Err(e) => return self.reject_with(e),
        };
        let document =
            optional_filter(Some(self.form.query_document.as_str())).map(str::to_string);

        self.begin(Action::Query);
        self.query_result = None;
        let result = self.client.query(&query, document.as_deref()).await;

        match self.finish(Action::Query, result) {
            Some(answer) => {
                self.query_result = Some(answer);
                Outcome::Succeeded
            }
            None => Outcome::Failed,
        }
    }

    /// Delete a document after `confirm` approves. A declined confirmation
    /// sends nothing and leaves every piece of state untouched.
    pub async fn delete_document(&mut self, name: &str, confirm: &dyn Confirm) -> Outcome {
        if let Err(e) = require_text(name, validation::MISSING_DOCUMENT) {
            return self.reject_with(e);
        }
        if !confirm.confirm(&delete_prompt(name)) {
            return Outcome::Cancelled;
        }

        self.begin(Action::Delete);
        let result = self.client.delete_document(name).await;

        match self.finish(Action::Delete, result) {
            Some(()) => {
                info!(document = %name, "Document deleted");
                self.message = Some(format!("✅ Document \"{name}\" deleted successfully!"));
                self.refresh_after_write().await;
                Outcome::Succeeded
            }
            None => Outcome::Failed,
        }
    }

    pub async fn search(&mut self) -> Outcome {
        let query = match require_text(&self.form.search_query, validation::MISSING_SEARCH_QUERY)
        {
            Ok(query) => query.to_string(),
            Err(e) => return self.reject_with(e),
        };
        let document =
            optional_filter(Some(self.form.search_document.as_str())).map(str::to_string);

        self.begin(Action::Search);
        self.search_results.clear();
        let result = self
            .client
            .search(&query, document.as_deref(), self.view.search_limit)
            .await;

        match self.finish(Action::Search, result) {
            Some(results) => {
                if results.is_empty() {
                    self.message = Some(NO_SEARCH_RESULTS.to_string());
                }
                self.search_results = results;
                Outcome::Succeeded
            }
            None => Outcome::Failed,
        }
    }

    pub async fn load_examples(&mut self) -> Outcome {
        let document =
            match require_text(&self.form.examples_document, validation::MISSING_DOCUMENT) {
                Ok(document) => document.to_string(),
                Err(e) => return self.reject_with(e),
            };

        self.begin(Action::LoadExamples);
        self.few_shot_examples = None;
        let result = self.client.few_shot_examples(&document).await;

        match self.finish(Action::LoadExamples, result) {
            Some(examples) => {
                self.few_shot_examples =
                    Some(examples.unwrap_or_else(|| NO_EXAMPLES.to_string()));
                Outcome::Succeeded
            }
            None => Outcome::Failed,
        }
    }

    async fn refresh_after_write(&mut self) {
        let (documents, stats) =
            tokio::join!(self.client.list_documents(), self.client.stats());
        self.apply_documents(documents);
        self.apply_stats(stats);
    }

    fn apply_health(&mut self, health: Result<HealthStatus>) {
        self.server_status = match health {
            Ok(health) => {
                info!(status = %health.status, "Server is online");
                ServerStatus::Online
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                ServerStatus::Offline
            }
        };
    }

    fn apply_documents(&mut self, documents: Result<Vec<Document>>) {
        match documents {
            Ok(documents) => self.documents = documents,
            Err(e) => {
                error!("Failed to load documents: {}", e);
                self.documents.clear();
            }
        }
    }

    fn apply_stats(&mut self, stats: Result<Stats>) {
        match stats {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => error!("Failed to load stats: {}", e),
        }
    }

    fn begin(&mut self, action: Action) {
        self.phase = Phase::InFlight(action);
        self.message = None;
    }

    fn finish<T>(&mut self, action: Action, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.phase = Phase::Succeeded(action);
                Some(value)
            }
            Err(e) => {
                warn!(?action, "Action failed: {}", e);
                self.message = Some(e.banner());
                self.phase = Phase::Failed(action);
                None
            }
        }
    }

    fn reject(&mut self, message: &str) -> Outcome {
        self.reject_with(DashboardError::Validation(message.to_string()))
    }

    fn reject_with(&mut self, error: DashboardError) -> Outcome {
        self.message = Some(error.banner());
        self.phase = Phase::Idle;
        Outcome::Rejected
    }
}

fn processed_message(chunks: u64) -> String {
    format!("✅ Document processed successfully! {chunks} chunks created.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::dashboard::AssumeYes;

    // Nothing listens on port 9; any request that slips through fails fast
    // and would show up as a network error instead of a validation message.
    fn offline_dashboard() -> Dashboard {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: Some(1),
        })
        .unwrap();
        Dashboard::new(client, ViewConfig::default())
    }

    #[test]
    fn test_new_dashboard_is_idle_and_checking() {
        let dashboard = offline_dashboard();
        assert_eq!(dashboard.server_status(), ServerStatus::Checking);
        assert_eq!(dashboard.phase(), Phase::Idle);
        assert!(dashboard.documents().is_empty());
        assert!(dashboard.message().is_none());
    }

    #[test]
    fn test_can_submit_mirrors_form_preconditions() {
        let mut dashboard = offline_dashboard();
        assert!(!dashboard.can_submit(Action::Upload));
        assert!(!dashboard.can_submit(Action::Query));
        assert!(dashboard.can_submit(Action::Delete));

        dashboard.form.query = "   ".to_string();
        assert!(!dashboard.can_submit(Action::Query));

        dashboard.form.query = "What is the waiting period?".to_string();
        assert!(dashboard.can_submit(Action::Query));

        dashboard.form.examples_document = "   ".to_string();
        assert!(!dashboard.can_submit(Action::LoadExamples));
        dashboard.form.examples_document = "policy.pdf".to_string();
        assert!(dashboard.can_submit(Action::LoadExamples));

        dashboard.phase = Phase::InFlight(Action::Search);
        assert!(!dashboard.can_submit(Action::Query));
        assert!(!dashboard.can_submit(Action::Delete));
    }

    #[test]
    fn test_zero_search_limit_is_ignored() {
        let mut dashboard = offline_dashboard();
        dashboard.set_search_limit(0);
        assert_eq!(dashboard.view().search_limit, 10);

        dashboard.set_search_limit(25);
        assert_eq!(dashboard.view().search_limit, 25);
    }

    #[tokio::test]
    async fn test_blank_inputs_are_rejected_locally() {
        let mut dashboard = offline_dashboard();

        assert_eq!(dashboard.upload().await, Outcome::Rejected);
        assert_eq!(dashboard.message(), Some("Please select a file"));

        dashboard.form.file_name = "  ".to_string();
        assert_eq!(dashboard.process_existing().await, Outcome::Rejected);
        assert_eq!(dashboard.message(), Some("Please enter a file name"));

        dashboard.form.query = "\n\t".to_string();
        assert_eq!(dashboard.query().await, Outcome::Rejected);
        assert_eq!(dashboard.message(), Some("Please enter a query"));

        assert_eq!(dashboard.search().await, Outcome::Rejected);
        assert_eq!(dashboard.message(), Some("Please enter a search query"));

        assert_eq!(dashboard.load_examples().await, Outcome::Rejected);
        assert_eq!(dashboard.message(), Some("Please select a document"));

        dashboard.form.examples_document = " \t ".to_string();
        assert_eq!(dashboard.load_examples().await, Outcome::Rejected);
        assert_eq!(dashboard.message(), Some("Please select a document"));

        assert_eq!(dashboard.delete_document("  ", &AssumeYes).await, Outcome::Rejected);
        assert_eq!(dashboard.message(), Some("Please select a document"));

        assert_eq!(dashboard.phase(), Phase::Idle);
    }

    #[test]
    fn test_processed_message() {
        assert_eq!(
            processed_message(7),
            "✅ Document processed successfully! 7 chunks created."
        );
    }
}
