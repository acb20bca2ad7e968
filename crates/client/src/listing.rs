//! Document list controller: fetch, view, delete and download links.

use legalease_core::document::Document;
use legalease_core::listing::{by_recency, remove_document, RefreshTrigger, DELETE_CONFIRMATION};
use legalease_core::session::SessionProvider;

use crate::api::{ApiError, LegalEaseApi};

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("No authentication token found")]
    MissingToken,

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl ListingError {
    /// `detail` for a refused request, `refused` when there is none, and
    /// `failed` when no response came back at all.
    fn from_api(source: ApiError, refused: &str, failed: &str) -> Self {
        let message = match &source {
            ApiError::Status { .. } => source.user_message(refused),
            ApiError::Request(_) => failed.to_string(),
        };
        Self::Api { message, source }
    }
}

/// What the list renders.
#[derive(Debug, PartialEq)]
pub enum ListView<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Rows(Vec<&'a Document>),
}

#[derive(Debug)]
pub struct DocumentListing {
    api: LegalEaseApi,
    session: SessionProvider,
    documents: Vec<Document>,
    loading: bool,
    error: Option<String>,
    last_trigger: Option<RefreshTrigger>,
}

impl DocumentListing {
    pub fn new(api: LegalEaseApi, session: SessionProvider) -> Self {
        Self {
            api,
            session,
            documents: Vec::new(),
            loading: true,
            error: None,
            last_trigger: None,
        }
    }

    /// Fetch the full list, replacing whatever was held before.
    pub async fn fetch(&mut self) -> Result<(), ListingError> {
        self.loading = true;
        let result = self.load().await;
        self.loading = false;
        match result {
            Ok(documents) => {
                tracing::debug!(count = documents.len(), "Documents fetched");
                self.documents = documents;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch documents");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn load(&self) -> Result<Vec<Document>, ListingError> {
        let token = self.session.token().ok_or(ListingError::MissingToken)?;
        self.api.list_documents(&token).await.map_err(|e| {
            ListingError::from_api(e, "Failed to fetch documents", "Failed to load documents")
        })
    }

    /// Re-fetch when `trigger` differs from the last one seen, or on the
    /// first call. Returns whether a fetch ran.
    pub async fn sync(&mut self, trigger: RefreshTrigger) -> Result<bool, ListingError> {
        if self.last_trigger == Some(trigger) {
            return Ok(false);
        }
        self.last_trigger = Some(trigger);
        self.fetch().await?;
        Ok(true)
    }

    pub fn view(&self) -> ListView<'_> {
        if self.loading {
            ListView::Loading
        } else if let Some(error) = &self.error {
            ListView::Error(error)
        } else if self.documents.is_empty() {
            ListView::Empty
        } else {
            ListView::Rows(by_recency(&self.documents))
        }
    }

    /// Documents newest first.
    pub fn documents(&self) -> Vec<&Document> {
        by_recency(&self.documents)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Delete one document after confirmation. Returns `Ok(false)` when
    /// the user declines; nothing is sent in that case.
    pub async fn delete(
        &mut self,
        id: &str,
        confirm: &impl Confirm,
    ) -> Result<bool, ListingError> {
        if !confirm.confirm(DELETE_CONFIRMATION) {
            return Ok(false);
        }

        let result = match self.session.token() {
            None => Err(ListingError::MissingToken),
            Some(token) => self.api.delete_document(&token, id).await.map_err(|e| {
                ListingError::from_api(e, "Failed to delete document", "Failed to delete document")
            }),
        };

        match result {
            Ok(()) => {
                remove_document(&mut self.documents, id);
                tracing::info!(document_id = %id, "Document deleted");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(document_id = %id, error = %e, "Failed to delete document");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Temporary location of the original file.
    pub async fn download_link(&mut self, id: &str) -> Result<String, ListingError> {
        let result = match self.session.token() {
            None => Err(ListingError::MissingToken),
            Some(token) => self
                .api
                .download_link(&token, id)
                .await
                .map(|link| link.download_url)
                .map_err(|e| {
                    ListingError::from_api(
                        e,
                        "Failed to get download URL",
                        "Failed to download document",
                    )
                }),
        };

        if let Err(e) = &result {
            tracing::warn!(document_id = %id, error = %e, "Failed to get download URL");
            self.error = Some(e.to_string());
        }
        result
    }
}
