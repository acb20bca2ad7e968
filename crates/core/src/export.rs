//! Abstract export formats and the download menu state.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// File stem used when the document has no filename.
pub const DEFAULT_EXPORT_STEM: &str = "lease-abstract";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Pdf, ExportFormat::Markdown];

    /// Last path segment of `/documents/:id/download/<segment>`.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Markdown => "markdown",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Markdown => "md",
        }
    }

    /// Menu entry label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "Download as PDF",
            Self::Markdown => "Download as Markdown",
        }
    }

    /// Alert shown when the export request fails.
    pub fn failure_alert(self) -> &'static str {
        match self {
            Self::Pdf => "Failed to download PDF. Please try again.",
            Self::Markdown => "Failed to download Markdown. Please try again.",
        }
    }

    /// Name of the saved export: `<filename>.<ext>`, or the default stem.
    ///
    /// The stem is always a single path component, so the result can be
    /// joined onto the export directory as-is.
    pub fn file_name(self, document_filename: Option<&str>) -> String {
        let stem = document_filename
            .map(export_stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| DEFAULT_EXPORT_STEM.to_string());
        format!("{stem}.{}", self.extension())
    }
}

/// Last component of a server-supplied filename with control characters
/// removed and leading dots stripped. Empty when nothing usable is left.
fn export_stem(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .filter_map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => Some('_'),
            '\0'..='\x1f' | '\x7f' => None,
            c => Some(c),
        })
        .collect();
    cleaned.trim().trim_start_matches('.').trim_end().to_string()
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(CoreError::Validation(format!(
                "Unknown export format '{other}'. Must be one of: pdf, markdown"
            ))),
        }
    }
}

/// Open/closed state of the download menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportMenu {
    #[default]
    Closed,
    Open,
}

impl ExportMenu {
    pub fn toggle(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    /// Entries listed while the menu is open.
    pub fn entries(self) -> &'static [ExportFormat] {
        match self {
            Self::Open => &ExportFormat::ALL,
            Self::Closed => &[],
        }
    }
}
