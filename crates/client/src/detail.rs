//! Document detail controller: fetch by id, abstract rendering, feedback
//! and export.

use std::path::{Path, PathBuf};

use legalease_core::abstract_view::AbstractView;
use legalease_core::document::Document;
use legalease_core::export::{ExportFormat, ExportMenu};
use legalease_core::feedback::{FeedbackRequest, FeedbackType, Notice};
use legalease_core::session::{SessionProvider, LOGIN_ROUTE};

use crate::api::{ApiError, LegalEaseApi};

/// Message shown when the document is unavailable and nothing more
/// specific is known.
pub const NOT_FOUND_MESSAGE: &str = "The requested document could not be found.";

const LOAD_FAILED: &str = "Failed to load document";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Box<Document>),
    RedirectToLogin(&'static str),
    Unavailable { message: String },
}

/// Why a feedback or export action failed.
#[derive(Debug, thiserror::Error)]
pub enum ActionFailure {
    #[error("No authentication token found")]
    MissingToken,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed action. `Display` is the alert shown to the user.
#[derive(Debug, thiserror::Error)]
#[error("{alert}")]
pub struct ActionError {
    pub alert: &'static str,
    #[source]
    pub source: ActionFailure,
}

#[derive(Debug)]
pub struct DocumentDetail {
    api: LegalEaseApi,
    session: SessionProvider,
    document_id: String,
    state: DetailState,
    notice: Option<Notice>,
    menu: ExportMenu,
}

impl DocumentDetail {
    pub fn new(api: LegalEaseApi, session: SessionProvider, document_id: impl Into<String>) -> Self {
        Self {
            api,
            session,
            document_id: document_id.into(),
            state: DetailState::Loading,
            notice: None,
            menu: ExportMenu::default(),
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn document(&self) -> Option<&Document> {
        match &self.state {
            DetailState::Loaded(doc) => Some(doc),
            _ => None,
        }
    }

    /// Abstract view of the loaded document.
    pub fn view(&self) -> Option<AbstractView> {
        self.document().map(AbstractView::build)
    }

    /// Fetch the document. A missing credential or a 401 redirects to
    /// login; every other failure leaves the view unavailable.
    pub async fn load(&mut self) -> &DetailState {
        self.state = DetailState::Loading;
        self.state = match self.session.token() {
            None => DetailState::RedirectToLogin(LOGIN_ROUTE),
            Some(token) => match self.api.get_document(&token, &self.document_id).await {
                Ok(document) => DetailState::Loaded(Box::new(document)),
                Err(e) if e.is_unauthorized() => DetailState::RedirectToLogin(LOGIN_ROUTE),
                Err(e) => {
                    tracing::error!(document_id = %self.document_id, error = %e, "Error fetching document");
                    let message = match e {
                        ApiError::Status { status, .. } => {
                            format!("Failed to fetch document: {status}")
                        }
                        ApiError::Request(_) => LOAD_FAILED.to_string(),
                    };
                    DetailState::Unavailable { message }
                }
            },
        };
        &self.state
    }

    // ---- feedback ----

    /// The confirmation notice, while it is still visible.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_visible())
    }

    pub async fn thumbs_up(&mut self) -> Result<(), ActionError> {
        self.send_feedback(FeedbackRequest::thumbs_up()).await
    }

    pub async fn thumbs_down(&mut self) -> Result<(), ActionError> {
        self.send_feedback(FeedbackRequest::thumbs_down()).await
    }

    /// Send an error report. A missing or blank comment drops the action
    /// without a request and returns `Ok(false)`.
    pub async fn report_error(&mut self, comment: Option<&str>) -> Result<bool, ActionError> {
        let Some(request) = comment.and_then(|c| FeedbackRequest::error_report(c).ok()) else {
            return Ok(false);
        };
        self.send_feedback(request).await?;
        Ok(true)
    }

    async fn send_feedback(&mut self, request: FeedbackRequest) -> Result<(), ActionError> {
        let kind: FeedbackType = request.kind;
        let fail = |source: ActionFailure| ActionError {
            alert: kind.failure_alert(),
            source,
        };

        let token = self
            .session
            .token()
            .ok_or_else(|| fail(ActionFailure::MissingToken))?;
        match self
            .api
            .submit_feedback(&token, &self.document_id, &request)
            .await
        {
            Ok(ack) => {
                tracing::info!(document_id = %self.document_id, kind = ?kind, "Feedback submitted");
                self.notice = Some(Notice::new(ack.message));
                Ok(())
            }
            Err(e) => {
                tracing::error!(document_id = %self.document_id, kind = ?kind, error = %e, "Error submitting feedback");
                Err(fail(e.into()))
            }
        }
    }

    // ---- export ----

    pub fn menu(&self) -> ExportMenu {
        self.menu
    }

    pub fn toggle_menu(&mut self) -> ExportMenu {
        self.menu = self.menu.toggle();
        self.menu
    }

    /// Download the exported abstract into `dir` and return the saved
    /// path. The file is written under a temporary name and renamed into
    /// place, so a failed export leaves nothing behind.
    pub async fn export(&mut self, format: ExportFormat, dir: &Path) -> Result<PathBuf, ActionError> {
        self.menu = ExportMenu::Closed;
        let fail = |source: ActionFailure| ActionError {
            alert: format.failure_alert(),
            source,
        };

        let token = self
            .session
            .token()
            .ok_or_else(|| fail(ActionFailure::MissingToken))?;
        let bytes = self
            .api
            .export(&token, &self.document_id, format)
            .await
            .map_err(|e| {
                tracing::error!(document_id = %self.document_id, %format, error = %e, "Error downloading export");
                fail(e.into())
            })?;

        let file_name = format.file_name(self.document().map(|d| d.filename.as_str()));
        let target = dir.join(&file_name);
        write_atomically(&target, &bytes)
            .await
            .map_err(|e| fail(e.into()))?;

        tracing::info!(document_id = %self.document_id, path = %target.display(), "Export saved");
        Ok(target)
    }
}

async fn write_atomically(target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut partial = target.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    if let Err(e) = tokio::fs::write(&partial, bytes).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }
    tokio::fs::rename(&partial, target).await
}
