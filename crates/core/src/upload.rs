//! Upload validation, naming and storage descriptors.
//!
//! Everything here runs before or between network calls: the client
//! rejects unsupported files up front, names fallback uploads, and
//! describes where the bytes ended up so a single registration step can
//! serve both the pre-signed and the local-storage path.

use std::path::Path;

use rand::Rng;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &[MIME_PDF, MIME_DOCX, MIME_DOC];

/// Extensions accepted for upload, including the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".doc"];

/// Maximum upload size (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Bucket name recorded for uploads that went through the local fallback.
pub const LOCAL_STORAGE_BUCKET: &str = "local-storage";

/// Key prefix for uploads that went through the local fallback.
pub const LOCAL_KEY_PREFIX: &str = "documents/local";

// ---------------------------------------------------------------------------
// Candidate file
// ---------------------------------------------------------------------------

/// The parts of a selected file that validation and registration look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileMeta {
    /// Build metadata for a file on disk, guessing the MIME type from its
    /// extension.
    pub fn for_path(path: &Path, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = guess_mime_type(&name).to_string();
        Self {
            name,
            mime_type,
            size,
        }
    }
}

/// Reasons a file is refused before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Only PDF and DOCX files are allowed")]
    UnsupportedType,

    #[error("File size must be less than 50MB")]
    TooLarge,
}

/// Check a file against the allow-list and the size ceiling.
///
/// The type check passes when either the MIME type or the extension is
/// allowed; the size check runs only after the type check.
pub fn validate_upload(file: &FileMeta) -> Result<(), UploadRejection> {
    let extension = format!(".{}", file_extension(&file.name).to_lowercase());

    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str())
        && !ALLOWED_EXTENSIONS.contains(&extension.as_str())
    {
        return Err(UploadRejection::UnsupportedType);
    }

    if file.size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Naming helpers
// ---------------------------------------------------------------------------

/// Text after the last `.` of a file name; the whole name when it has no
/// dot, which mirrors how the upload form split names.
pub fn file_extension(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or_default()
}

/// MIME type for a file name, from its extension.
pub fn guess_mime_type(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".pdf") {
        MIME_PDF
    } else if lower.ends_with(".docx") {
        MIME_DOCX
    } else if lower.ends_with(".doc") {
        MIME_DOC
    } else {
        MIME_OCTET_STREAM
    }
}

/// Human-readable size string registered with the document, e.g. `1.50 MB`.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Lowercase base-36 alphabet used for random suffixes.
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix on fallback filenames.
const SUFFIX_LENGTH: usize = 11;

/// Unique filename for a fallback upload: `<epoch-millis>-<suffix>.<ext>`.
pub fn local_unique_filename(original_name: &str, now_millis: i64) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{now_millis}-{suffix}.{}", file_extension(original_name))
}

// ---------------------------------------------------------------------------
// Storage descriptor
// ---------------------------------------------------------------------------

/// Where uploaded bytes were stored. Both transfer paths produce one of
/// these and hand it to the shared registration step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDescriptor {
    pub filename: String,
    pub s3_key: String,
    pub s3_bucket: String,
}

impl StorageDescriptor {
    /// Descriptor for the local-storage fallback, keyed under
    /// [`LOCAL_KEY_PREFIX`].
    pub fn local(unique_filename: String) -> Self {
        let s3_key = format!("{LOCAL_KEY_PREFIX}/{unique_filename}");
        Self {
            filename: unique_filename,
            s3_key,
            s3_bucket: LOCAL_STORAGE_BUCKET.to_string(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.s3_bucket == LOCAL_STORAGE_BUCKET
    }
}

/// Multipart fields of `POST /documents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRegistration {
    pub filename: String,
    pub original_filename: String,
    pub file_size: String,
    pub mime_type: String,
    pub s3_key: String,
    pub s3_bucket: String,
}

impl DocumentRegistration {
    pub fn new(file: &FileMeta, storage: StorageDescriptor) -> Self {
        Self {
            filename: storage.filename,
            original_filename: file.name.clone(),
            file_size: format_file_size(file.size),
            mime_type: file.mime_type.clone(),
            s3_key: storage.s3_key,
            s3_bucket: storage.s3_bucket,
        }
    }

    /// Field name / value pairs in form order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("filename", &self.filename),
            ("original_filename", &self.original_filename),
            ("file_size", &self.file_size),
            ("mime_type", &self.mime_type),
            ("s3_key", &self.s3_key),
            ("s3_bucket", &self.s3_bucket),
        ]
    }
}

// ---------------------------------------------------------------------------
// Progress milestones
// ---------------------------------------------------------------------------

/// Fixed progress milestones. These mark completed stages, not bytes sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UploadMilestone {
    Started,
    TargetAcquired,
    Transferred,
    Registered,
}

impl UploadMilestone {
    pub fn percent(self) -> u8 {
        match self {
            Self::Started => 0,
            Self::TargetAcquired => 25,
            Self::Transferred => 75,
            Self::Registered => 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
