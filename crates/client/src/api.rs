//! REST API client for the LegalEase backend.
//!
//! Wraps the backend HTTP API (auth, upload targets, document CRUD,
//! exports, feedback) using [`reqwest`]. Every call except the auth and
//! byte-transfer endpoints carries the caller's bearer token.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use legalease_core::document::{Acknowledgement, Document, DownloadLink, HealthStatus, UploadTarget};
use legalease_core::export::ExportFormat;
use legalease_core::feedback::FeedbackRequest;
use legalease_core::upload::DocumentRegistration;
use legalease_core::user::{AuthResponse, LoginRequest, RegistrationRequest, User};

/// HTTP client for one LegalEase backend.
#[derive(Debug, Clone)]
pub struct LegalEaseApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("LegalEase API error ({status}): {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the JSON error body, when there was one.
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Server-supplied `detail`, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            Self::Request(_) => None,
        }
    }

    /// Text to show the user: the server `detail` when present, else
    /// `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl LegalEaseApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:8000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    // ---- service ----

    /// `GET /health`. No credential.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self.client.get(self.url("/health")).send().await?;
        Self::parse_response(response).await
    }

    // ---- auth ----

    /// `POST /auth/login` with form fields `email`, `password`.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .form(&[
                ("email", request.email.as_str()),
                ("password", request.password.as_str()),
            ])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `POST /auth/register` with form fields `email`, `password`,
    /// `first_name`, `last_name`.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .form(&[
                ("email", request.email.as_str()),
                ("password", request.password.as_str()),
                ("first_name", request.first_name.as_str()),
                ("last_name", request.last_name.as_str()),
            ])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /auth/me`.
    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- upload ----

    /// `POST /documents/upload-url` (multipart `filename`, `content_type`).
    ///
    /// A refusal comes back as [`ApiError::Status`], which the upload flow
    /// treats differently from a transport failure.
    pub async fn request_upload_target(
        &self,
        token: &str,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadTarget, ApiError> {
        let form = Form::new()
            .text("filename", filename.to_string())
            .text("content_type", content_type.to_string());

        let response = self
            .client
            .post(self.url("/documents/upload-url"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// PUT raw bytes to a pre-signed storage URL. No credential.
    pub async fn put_presigned(
        &self,
        upload_url: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `PUT /documents/local-upload/<key>` with multipart field `file`.
    /// No credential.
    pub async fn put_local(
        &self,
        s3_key: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .put(self.url(&format!("/documents/local-upload/{s3_key}")))
            .multipart(form)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `POST /documents` with the registration fields as multipart text.
    pub async fn register_document(
        &self,
        token: &str,
        registration: &DocumentRegistration,
    ) -> Result<Document, ApiError> {
        let form = registration
            .fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value.to_string()));

        let response = self
            .client
            .post(self.url("/documents"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- documents ----

    /// `GET /documents`.
    pub async fn list_documents(&self, token: &str) -> Result<Vec<Document>, ApiError> {
        let response = self
            .client
            .get(self.url("/documents"))
            .bearer_auth(token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /documents/{id}`.
    pub async fn get_document(&self, token: &str, id: &str) -> Result<Document, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/documents/{id}")))
            .bearer_auth(token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `DELETE /documents/{id}`.
    pub async fn delete_document(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/documents/{id}")))
            .bearer_auth(token)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `GET /documents/{id}/download`: a temporary location for the
    /// original file.
    pub async fn download_link(&self, token: &str, id: &str) -> Result<DownloadLink, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/documents/{id}/download")))
            .bearer_auth(token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /documents/{id}/download/{pdf|markdown}`: the exported
    /// abstract as opaque bytes.
    pub async fn export(
        &self,
        token: &str,
        id: &str,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/documents/{id}/download/{}", format.path_segment())))
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// `POST /documents/{id}/feedback` with a JSON body.
    pub async fn submit_feedback(
        &self,
        token: &str,
        id: &str,
        feedback: &FeedbackRequest,
    ) -> Result<Acknowledgement, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/documents/{id}/feedback")))
            .bearer_auth(token)
            .json(feedback)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`] carrying
    /// the `detail` of the JSON error body on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: extract_detail(&body),
        })
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// `detail` of a `{"detail": ...}` error body. Non-string details (such as
/// validation error arrays) are kept as their JSON text.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
