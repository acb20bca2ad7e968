//! Document records as returned by the `/documents` endpoints.
//!
//! The backend and the older shared type disagree on a few field names and
//! on the status vocabulary; both spellings are accepted on the way in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lease::ExtractedLeaseData;
use crate::types::{timestamp, Timestamp};
use crate::upload::format_file_size;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Processing lifecycle of a document.
///
/// Transitions are driven by the processing backend; the client only
/// observes them by re-fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploaded,
    Processing,
    #[serde(alias = "complete")]
    Completed,
    #[serde(alias = "error")]
    Failed,
}

impl DocumentStatus {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Capitalized label used in the abstract header.
    pub fn label(self) -> &'static str {
        match self {
            Self::Uploaded => "Uploaded",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// True once the backend has stopped working on the document.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// File size
// ---------------------------------------------------------------------------

/// Stored file size. The API stores the human-readable label produced at
/// registration time; a raw byte count is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileSize {
    Bytes(u64),
    Label(String),
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.write_str(&format_file_size(*bytes)),
            Self::Label(label) => f.write_str(label),
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub filename: String,
    #[serde(default, alias = "originalName")]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub file_size: Option<FileSize>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    pub status: DocumentStatus,
    #[serde(alias = "uploadedAt", deserialize_with = "timestamp::deserialize")]
    pub created_at: Timestamp,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub updated_at: Option<Timestamp>,
    #[serde(
        default,
        deserialize_with = "timestamp::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub processed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_lease_data: Option<ExtractedLeaseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
}

impl Document {
    /// Name shown to the user: the original upload name when known,
    /// otherwise the stored filename.
    pub fn display_name(&self) -> &str {
        self.original_filename.as_deref().unwrap_or(&self.filename)
    }

    /// Coarse file kind derived from the MIME type.
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(self.mime_type.as_deref().unwrap_or_default())
    }

    /// Summary text, if the backend produced a non-empty one.
    pub fn summary(&self) -> Option<&str> {
        self.ai_summary.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Coarse file kind used for list icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.contains("pdf") {
            Self::Pdf
        } else if mime.contains("word") || mime.contains("document") {
            Self::Word
        } else {
            Self::Other
        }
    }

    /// Short tag printed next to list rows.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Word => "DOC",
            Self::Other => "FILE",
        }
    }
}

// ---------------------------------------------------------------------------
// Auxiliary responses
// ---------------------------------------------------------------------------

/// Response of `POST /documents/upload-url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub upload_url: String,
    pub s3_key: String,
    pub s3_bucket: String,
    pub unique_filename: String,
}

/// Response of `GET /documents/:id/download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub download_url: String,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub queue_size: Option<u64>,
    #[serde(default)]
    pub processing_count: Option<u64>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn backend_row() -> serde_json::Value {
        json!({
            "id": "doc-1",
            "filename": "1700000000000-abc.pdf",
            "originalFilename": "lease.pdf",
            "fileSize": "1.25 MB",
            "mimeType": "application/pdf",
            "status": "processing",
            "createdAt": "2024-03-01T10:00:00.123456",
            "updatedAt": "2024-03-01T10:05:00.000001"
        })
    }

    #[test]
    fn parses_backend_list_row() {
        let doc: Document = serde_json::from_value(backend_row()).unwrap();
        assert_eq!(doc.id, "doc-1");
        assert_eq!(doc.display_name(), "lease.pdf");
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert_eq!(doc.file_size, Some(FileSize::Label("1.25 MB".into())));
        assert!(doc.updated_at.is_some());
        assert!(doc.extracted_lease_data.is_none());
        assert_eq!(doc.kind(), FileKind::Pdf);
    }

    #[test]
    fn shared_type_spellings_are_accepted() {
        let doc: Document = serde_json::from_value(json!({
            "id": "doc-2",
            "userId": "user-1",
            "filename": "stored.docx",
            "originalName": "Lease Draft.docx",
            "fileSize": 2048,
            "mimeType": "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "s3Key": "documents/user-1/stored.docx",
            "status": "complete",
            "uploadedAt": "2024-03-02T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(doc.status, DocumentStatus::Completed);
        assert_eq!(doc.display_name(), "Lease Draft.docx");
        assert_matches!(doc.file_size, Some(FileSize::Bytes(2048)));
        assert_eq!(doc.kind(), FileKind::Word);
        assert!(doc.updated_at.is_none());
    }

    #[test]
    fn error_status_is_failed() {
        let status: DocumentStatus = serde_json::from_value(json!("error")).unwrap();
        assert_eq!(status, DocumentStatus::Failed);
        assert!(status.is_terminal());
    }

    #[test]
    fn status_serializes_to_backend_vocabulary() {
        assert_eq!(
            serde_json::to_value(DocumentStatus::Completed).unwrap(),
            json!("completed")
        );
        assert_eq!(DocumentStatus::Processing.label(), "Processing");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<DocumentStatus, _> = serde_json::from_value(json!("archived"));
        assert!(result.is_err());
    }

    #[test]
    fn blank_summary_is_treated_as_missing() {
        let mut doc: Document = serde_json::from_value(backend_row()).unwrap();
        doc.ai_summary = Some("   ".into());
        assert!(doc.summary().is_none());
        doc.ai_summary = Some("Five year retail lease.".into());
        assert_eq!(doc.summary(), Some("Five year retail lease."));
    }

    #[test]
    fn byte_count_file_size_displays_as_megabytes() {
        assert_eq!(FileSize::Bytes(1_572_864).to_string(), "1.50 MB");
    }

    #[test]
    fn upload_target_uses_camel_case() {
        let target: UploadTarget = serde_json::from_value(json!({
            "uploadUrl": "https://bucket.example/put",
            "s3Key": "documents/u/x.pdf",
            "s3Bucket": "leases",
            "uniqueFilename": "x.pdf"
        }))
        .unwrap();
        assert_eq!(target.s3_bucket, "leases");
        assert_eq!(target.unique_filename, "x.pdf");
    }
}
