//! Two-phase document upload with a local-storage fallback.
//!
//! [`Uploader`] runs one upload end to end: validate, obtain a pre-signed
//! target (or fall back to local storage when the backend refuses), move
//! the bytes, then register the document. [`UploadController`] wraps it
//! with the observable `{ uploading, progress, error }` state the upload
//! widget renders.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;

use legalease_core::document::Document;
use legalease_core::session::SessionProvider;
use legalease_core::upload::{
    local_unique_filename, validate_upload, DocumentRegistration, FileMeta, StorageDescriptor,
    UploadMilestone, UploadRejection,
};

use crate::api::{ApiError, LegalEaseApi};

/// Delay before progress drops back to 0 after an upload settles.
pub const PROGRESS_RESET_DELAY: Duration = Duration::from_millis(2_000);

const REGISTRATION_FAILED: &str = "Failed to create document record";

/// A file selected for upload, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub meta: FileMeta,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let meta = FileMeta {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
        };
        Self { meta, bytes }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let meta = FileMeta::for_path(path, bytes.len() as u64);
        Ok(Self { meta, bytes })
    }
}

/// Upload failures. `Display` is the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    #[error("No authentication token found")]
    MissingToken,

    #[error("Failed to upload file to storage")]
    StorageTransfer(#[source] ApiError),

    #[error("Failed to upload file to local storage")]
    LocalTransfer(#[source] ApiError),

    #[error("{message}")]
    Registration {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("Upload failed")]
    Failed(#[source] ApiError),
}

// ---------------------------------------------------------------------------
// Uploader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Uploader {
    api: LegalEaseApi,
    session: SessionProvider,
}

impl Uploader {
    pub fn new(api: LegalEaseApi, session: SessionProvider) -> Self {
        Self { api, session }
    }

    /// Upload one file. `on_progress` is called at each completed stage.
    ///
    /// Validation runs first and makes no network call on rejection.
    pub async fn upload(
        &self,
        file: &UploadFile,
        mut on_progress: impl FnMut(UploadMilestone),
    ) -> Result<Document, UploadError> {
        validate_upload(&file.meta)?;
        let token = self.session.token().ok_or(UploadError::MissingToken)?;
        let meta = &file.meta;

        on_progress(UploadMilestone::Started);

        let storage = match self
            .api
            .request_upload_target(&token, &meta.name, &meta.mime_type)
            .await
        {
            Ok(target) => {
                on_progress(UploadMilestone::TargetAcquired);
                self.api
                    .put_presigned(&target.upload_url, file.bytes.clone(), &meta.mime_type)
                    .await
                    .map_err(UploadError::StorageTransfer)?;
                StorageDescriptor {
                    filename: target.unique_filename,
                    s3_key: target.s3_key,
                    s3_bucket: target.s3_bucket,
                }
            }
            Err(refused @ ApiError::Status { .. }) => {
                tracing::warn!(
                    filename = %meta.name,
                    error = %refused,
                    "Upload target refused, using local storage"
                );
                let storage = StorageDescriptor::local(local_unique_filename(
                    &meta.name,
                    Utc::now().timestamp_millis(),
                ));
                on_progress(UploadMilestone::TargetAcquired);
                self.api
                    .put_local(&storage.s3_key, &meta.name, &meta.mime_type, file.bytes.clone())
                    .await
                    .map_err(UploadError::LocalTransfer)?;
                storage
            }
            Err(e) => return Err(UploadError::Failed(e)),
        };
        on_progress(UploadMilestone::Transferred);

        let local = storage.is_local();
        let registration = DocumentRegistration::new(meta, storage);
        let document = self
            .api
            .register_document(&token, &registration)
            .await
            .map_err(|source| UploadError::Registration {
                message: source.user_message(REGISTRATION_FAILED),
                source,
            })?;
        on_progress(UploadMilestone::Registered);

        tracing::info!(
            document_id = %document.id,
            filename = %meta.name,
            local,
            "Document uploaded"
        );
        Ok(document)
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// What the upload widget shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub uploading: bool,
    pub progress: u8,
    pub error: Option<String>,
}

/// Owns the upload widget state and publishes every change.
#[derive(Debug)]
pub struct UploadController {
    uploader: Uploader,
    state: Arc<watch::Sender<UploadState>>,
    reset_delay: Duration,
}

impl UploadController {
    pub fn new(uploader: Uploader) -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            uploader,
            state: Arc::new(state),
            reset_delay: PROGRESS_RESET_DELAY,
        }
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Run one upload and publish its progress.
    ///
    /// A rejected file only sets `error`. Otherwise `uploading` is cleared
    /// on any outcome and progress returns to 0 after the reset delay.
    pub async fn upload(&self, file: &UploadFile) -> Result<Document, UploadError> {
        if let Err(rejection) = validate_upload(&file.meta) {
            self.state
                .send_modify(|s| s.error = Some(rejection.to_string()));
            return Err(rejection.into());
        }

        self.state.send_replace(UploadState {
            uploading: true,
            progress: 0,
            error: None,
        });

        let result = self
            .uploader
            .upload(file, |milestone| {
                self.state.send_modify(|s| s.progress = milestone.percent());
            })
            .await;

        self.state.send_modify(|s| {
            s.uploading = false;
            if let Err(e) = &result {
                s.error = Some(e.to_string());
            }
        });
        if let Err(e) = &result {
            tracing::error!(filename = %file.meta.name, error = ?e, "Upload failed");
        }
        self.schedule_reset();

        result
    }

    fn schedule_reset(&self) {
        let state = Arc::clone(&self.state);
        let delay = self.reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_modify(|s| s.progress = 0);
        });
    }
}
