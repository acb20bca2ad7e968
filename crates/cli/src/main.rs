//! `legalease` -- terminal client for the LegalEase lease-abstraction API.
//!
//! Signs in, uploads lease documents, lists and deletes them, renders the
//! extracted abstract, sends feedback and saves PDF/Markdown exports.
//!
//! # Environment variables
//!
//! | Variable                         | Default                 | Description                |
//! |----------------------------------|-------------------------|----------------------------|
//! | `LEGALEASE_API_URL`              | `http://localhost:8000` | Backend base URL           |
//! | `LEGALEASE_SESSION_DIR`          | `.legalease`            | Stored session directory   |
//! | `LEGALEASE_REQUEST_TIMEOUT_SECS` | `30`                    | Per-request timeout        |
//! | `LEGALEASE_EXPORT_DIR`           | `.`                     | Default export destination |
//! | `RUST_LOG`                       | `legalease=info,...`    | Log filter (stderr)        |

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use legalease_client::auth::AuthClient;
use legalease_client::detail::{DetailState, DocumentDetail};
use legalease_client::listing::DocumentListing;
use legalease_client::upload::{UploadController, UploadFile, Uploader};
use legalease_client::LegalEaseApi;
use legalease_core::export::ExportFormat;
use legalease_core::feedback::ERROR_REPORT_PROMPT;
use legalease_core::listing::RefreshTrigger;
use legalease_core::session::{FileSessionStore, Guard, Session, SessionProvider};
use legalease_core::user::{LoginRequest, RegistrationRequest};

mod config;
mod render;

use config::ClientConfig;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "legalease=info,legalease_client=info,legalease_core=info";

#[derive(Parser)]
#[command(name = "legalease")]
#[command(about = "LegalEase AI lease abstraction client", long_about = None)]
struct Cli {
    /// Backend base URL (overrides LEGALEASE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "LEGALEASE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "LEGALEASE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user as the backend sees it
    Whoami,
    /// Welcome line plus the document list
    Dashboard,
    /// Upload a PDF or Word lease document
    Upload { path: PathBuf },
    /// List documents, newest first
    List,
    /// Render the lease abstract of one document
    Show { id: String },
    /// Delete a document
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print a temporary download URL for the original file
    Download { id: String },
    /// Save the abstract as PDF or Markdown
    Export {
        id: String,
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        /// Output directory (default: LEGALEASE_EXPORT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Rate the extracted abstract
    Feedback { id: String, vote: Vote },
    /// Report an error in the extracted abstract
    Report {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Vote {
    Up,
    Down,
}

struct App {
    config: ClientConfig,
    api: LegalEaseApi,
    session: SessionProvider,
}

impl App {
    /// Session for commands behind the guard.
    fn require_session(&self) -> Result<Session> {
        match self.session.guard() {
            Guard::Authenticated(session) => Ok(session),
            Guard::RedirectToLogin(route) => {
                tracing::debug!(route, "No valid session");
                bail!("Please sign in first: run `legalease login`")
            }
        }
    }

    fn listing(&self) -> DocumentListing {
        DocumentListing::new(self.api.clone(), self.session.clone())
    }

    fn detail(&self, id: String) -> DocumentDetail {
        DocumentDetail::new(self.api.clone(), self.session.clone(), id)
    }

    fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone(), self.session.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let api = LegalEaseApi::with_timeout(&config.api_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let session = SessionProvider::new(FileSessionStore::new(&config.session_dir));

    tracing::debug!(api_url = %config.api_url, session_dir = %config.session_dir.display(), "Starting legalease");

    let app = App {
        config,
        api,
        session,
    };
    run(&app, cli.command).await
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Health => {
            let health = app.api.health().await?;
            println!("Backend status: {}", health.status);
            if let Some(service) = health.service {
                println!("Service: {service}");
            }
            if let (Some(queued), Some(processing)) = (health.queue_size, health.processing_count) {
                println!("Queue: {queued} waiting, {processing} processing");
            }
        }
        Commands::Login { email, password } => {
            let session = app.auth().login(&LoginRequest { email, password }).await?;
            println!("{}", render::welcome(&session.user));
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let request = RegistrationRequest {
                email,
                password,
                first_name,
                last_name,
            };
            let session = app.auth().register(&request).await?;
            println!("{}", render::welcome(&session.user));
        }
        Commands::Logout => {
            app.auth().logout()?;
            println!("Signed out");
        }
        Commands::Whoami => {
            app.require_session()?;
            let user = app.auth().me().await?;
            println!("{}", render::welcome(&user));
        }
        Commands::Dashboard => {
            let session = app.require_session()?;
            println!("{}", render::welcome(&session.user));
            print_list(app, RefreshTrigger::new()).await?;
        }
        Commands::Upload { path } => {
            app.require_session()?;
            upload(app, path).await?;
        }
        Commands::List => {
            app.require_session()?;
            print_list(app, RefreshTrigger::new()).await?;
        }
        Commands::Show { id } => {
            app.require_session()?;
            let mut detail = app.detail(id);
            detail.load().await;
            match detail.state() {
                DetailState::Loaded(_) => {
                    if let Some(view) = detail.view() {
                        print!("{view}");
                    }
                }
                DetailState::RedirectToLogin(_) => {
                    bail!("Your session has expired. Please sign in again: run `legalease login`")
                }
                DetailState::Unavailable { message } => bail!("Document Not Found: {message}"),
                DetailState::Loading => {}
            }
        }
        Commands::Delete { id, yes } => {
            app.require_session()?;
            let mut listing = app.listing();
            let confirm = |prompt: &str| yes || confirm_on_stdin(prompt);
            if listing.delete(&id, &confirm).await? {
                println!("Deleted {id}");
            } else {
                println!("Delete cancelled");
            }
        }
        Commands::Download { id } => {
            app.require_session()?;
            let url = app.listing().download_link(&id).await?;
            println!("{url}");
        }
        Commands::Export { id, format, out } => {
            app.require_session()?;
            let dir = out.unwrap_or_else(|| app.config.export_dir.clone());
            let mut detail = app.detail(id);
            // The saved name follows the document filename when it loads.
            detail.load().await;
            let path = detail.export(format, &dir).await?;
            println!("Saved {}", path.display());
        }
        Commands::Feedback { id, vote } => {
            app.require_session()?;
            let mut detail = app.detail(id);
            match vote {
                Vote::Up => detail.thumbs_up().await?,
                Vote::Down => detail.thumbs_down().await?,
            }
            print_notice(&detail);
        }
        Commands::Report { id, comment } => {
            app.require_session()?;
            let comment = match comment {
                Some(comment) => Some(comment),
                None => prompt_line(ERROR_REPORT_PROMPT)?,
            };
            let mut detail = app.detail(id);
            if detail.report_error(comment.as_deref()).await? {
                print_notice(&detail);
            } else {
                println!("No report sent");
            }
        }
    }
    Ok(())
}

async fn print_list(app: &App, trigger: RefreshTrigger) -> Result<()> {
    let mut listing = app.listing();
    // Errors are part of the rendered view.
    let _ = listing.sync(trigger).await;
    println!("{}", render::list_view(&listing.view()));
    match listing.error() {
        Some(error) => bail!("{error}"),
        None => Ok(()),
    }
}

async fn upload(app: &App, path: PathBuf) -> Result<()> {
    let file = UploadFile::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let controller = UploadController::new(Uploader::new(app.api.clone(), app.session.clone()));
    let mut updates = controller.subscribe();
    let progress = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.uploading {
                eprintln!("{}", render::upload_state(&state));
            }
        }
    });

    let result = controller.upload(&file).await;
    progress.abort();

    let document = result?;
    println!("Uploaded {} ({})", document.display_name(), document.id);

    // Same as the dashboard: a successful upload bumps the list trigger.
    let mut trigger = RefreshTrigger::new();
    trigger.bump();
    print_list(app, trigger).await
}

fn print_notice(detail: &DocumentDetail) {
    if let Some(notice) = detail.notice() {
        println!("{}", notice.message);
    }
}

fn prompt_line(prompt: &str) -> Result<Option<String>> {
    eprint!("{prompt} ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    Ok((!line.is_empty()).then(|| line.to_string()))
}

fn confirm_on_stdin(prompt: &str) -> bool {
    match prompt_line(&format!("{prompt} [y/N]")) {
        Ok(Some(answer)) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}
