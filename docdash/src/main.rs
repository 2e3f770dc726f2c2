use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docdash::api::{ApiClient, ProbeEndpoint, UploadFile};
use docdash::config::{self, Config, LogFormat};
use docdash::dashboard::{render, Action, AssumeYes, Confirm, Dashboard, Outcome, ServerStatus};

#[derive(Parser)]
#[command(name = "docdash")]
#[command(about = "Upload, search and question PDF documents on a retrieval backend")]
struct Args {
    /// Backend base URL (overrides DOCDASH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the server, then show statistics and processed documents
    Dashboard,
    /// Check whether the backend is reachable
    Health,
    /// List processed documents
    Documents,
    /// Show aggregate statistics
    Stats,
    /// Upload a PDF and have it processed
    Upload {
        /// PDF file to upload
        path: Option<PathBuf>,
    },
    /// Process a file already stored on the server
    Process {
        /// File name on the server, e.g. bajaj-2.pdf
        file_name: String,
    },
    /// Delete a document and all its data
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Ask a question about the processed documents
    Query {
        question: String,
        /// Restrict the answer to one document
        #[arg(long)]
        document: Option<String>,
    },
    /// Find chunks similar to a query
    Search {
        query: String,
        /// Restrict the search to one document
        #[arg(long)]
        document: Option<String>,
        /// Maximum number of results (defaults to DOCDASH_SEARCH_LIMIT)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },
    /// Show the few-shot examples generated for a document
    Examples { document: String },
    /// Print the raw JSON an endpoint answers with
    Probe {
        #[arg(value_enum)]
        endpoint: ProbeTarget,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProbeTarget {
    Health,
    Stats,
    Documents,
}

impl From<ProbeTarget> for ProbeEndpoint {
    fn from(target: ProbeTarget) -> Self {
        match target {
            ProbeTarget::Health => ProbeEndpoint::Health,
            ProbeTarget::Stats => ProbeEndpoint::Stats,
            ProbeTarget::Documents => ProbeEndpoint::Documents,
        }
    }
}

/// Asks on stderr and reads the answer from stdin.
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    init_tracing(config::log_format());

    let mut config = Config::from_env();
    if let Some(api_url) = args.api_url {
        config = config.with_base_url(api_url);
    }

    let client = ApiClient::new(&config.api)?;
    tracing::debug!("Using backend at {}", client.base_url());

    let mut dashboard = Dashboard::new(client, config.view.clone());
    let success = run(&mut dashboard, args.command).await;

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docdash=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the rendered view
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
    }
}

async fn run(dashboard: &mut Dashboard, command: Command) -> bool {
    match command {
        Command::Dashboard => {
            dashboard.initialize().await;
            println!("{}", render::dashboard(dashboard));
            dashboard.server_status() == ServerStatus::Online
        }
        Command::Health => {
            let status = dashboard.check_health().await;
            println!("{}", render::status_line(status));
            status == ServerStatus::Online
        }
        Command::Documents => {
            dashboard.load_documents().await;
            println!("{}", render::documents(dashboard.documents()));
            true
        }
        Command::Stats => {
            dashboard.load_stats().await;
            match dashboard.stats() {
                Some(stats) => {
                    println!("{}", render::stats(stats));
                    true
                }
                None => false,
            }
        }
        Command::Upload { path } => {
            if let Some(path) = path {
                match UploadFile::from_path(&path).await {
                    Ok(file) => dashboard.form.selected_file = Some(file),
                    Err(e) => {
                        println!("{}", render::message(&e.banner()));
                        return false;
                    }
                }
            }
            announce(Action::Upload);
            let outcome = dashboard.upload().await;
            print_after_write(dashboard, outcome)
        }
        Command::Process { file_name } => {
            dashboard.form.file_name = file_name;
            announce(Action::ProcessExisting);
            let outcome = dashboard.process_existing().await;
            print_after_write(dashboard, outcome)
        }
        Command::Delete { name, yes } => {
            let confirm: &dyn Confirm = if yes { &AssumeYes } else { &PromptConfirm };
            let outcome = dashboard.delete_document(&name, confirm).await;
            if outcome == Outcome::Cancelled {
                println!("Cancelled; nothing was deleted.");
                return true;
            }
            print_after_write(dashboard, outcome)
        }
        Command::Query { question, document } => {
            dashboard.form.query = question;
            dashboard.form.query_document = document.unwrap_or_default();
            announce(Action::Query);
            let outcome = dashboard.query().await;
            print_message(dashboard);
            if let Some(result) = dashboard.query_result() {
                println!("{}", render::query_result(result));
            }
            outcome.is_success()
        }
        Command::Search {
            query,
            document,
            limit,
        } => {
            dashboard.form.search_query = query;
            dashboard.form.search_document = document.unwrap_or_default();
            if let Some(limit) = limit {
                dashboard.set_search_limit(limit);
            }
            announce(Action::Search);
            let outcome = dashboard.search().await;
            print_message(dashboard);
            if !dashboard.search_results().is_empty() {
                println!(
                    "{}",
                    render::search_results(
                        dashboard.search_results(),
                        dashboard.view().preview_chars
                    )
                );
            }
            outcome.is_success()
        }
        Command::Examples { document } => {
            dashboard.form.examples_document = document;
            announce(Action::LoadExamples);
            let outcome = dashboard.load_examples().await;
            print_message(dashboard);
            if let Some(examples) = dashboard.few_shot_examples() {
                println!("{}", render::examples(examples));
            }
            outcome.is_success()
        }
        Command::Probe { endpoint } => match dashboard.client().probe(endpoint.into()).await {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(pretty) => {
                    println!("{pretty}");
                    true
                }
                Err(e) => {
                    println!("Error: {e}");
                    false
                }
            },
            Err(e) => {
                println!("Error: {e}");
                false
            }
        },
    }
}

fn announce(action: Action) {
    tracing::info!("{}", action.busy_label());
}

fn print_message(dashboard: &Dashboard) {
    if let Some(message) = dashboard.message() {
        println!("{}", render::message(message));
    }
}

/// Message, then the refreshed stats and document list.
fn print_after_write(dashboard: &Dashboard, outcome: Outcome) -> bool {
    print_message(dashboard);
    if outcome.is_success() {
        if let Some(stats) = dashboard.stats() {
            println!("\n{}", render::stats(stats));
        }
        println!("\n{}", render::documents(dashboard.documents()));
    }
    outcome.is_success()
}
