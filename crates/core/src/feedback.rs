//! Feedback payloads for `POST /documents/:id/feedback` and the transient
//! confirmation notice shown after a successful submission.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How long a confirmation notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Alert shown when a thumbs-up or thumbs-down fails.
pub const FEEDBACK_FAILED: &str = "Failed to submit feedback. Please try again.";

/// Alert shown when an error report fails.
pub const ERROR_REPORT_FAILED: &str = "Failed to submit error report. Please try again.";

/// Prompt used to collect an error report comment.
pub const ERROR_REPORT_PROMPT: &str = "Please describe the error or inaccuracy you found:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    ThumbsUp,
    ThumbsDown,
    ErrorReport,
}

impl FeedbackType {
    /// Alert text used when this kind of submission fails.
    pub fn failure_alert(self) -> &'static str {
        match self {
            Self::ThumbsUp | Self::ThumbsDown => FEEDBACK_FAILED,
            Self::ErrorReport => ERROR_REPORT_FAILED,
        }
    }
}

/// JSON body of a feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_positive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FeedbackRequest {
    pub fn thumbs_up() -> Self {
        Self {
            kind: FeedbackType::ThumbsUp,
            is_positive: Some(true),
            comment: None,
        }
    }

    pub fn thumbs_down() -> Self {
        Self {
            kind: FeedbackType::ThumbsDown,
            is_positive: Some(false),
            comment: None,
        }
    }

    /// Error report with a free-text comment. An empty comment means the
    /// user dismissed the prompt, so no request should be made.
    pub fn error_report(comment: &str) -> Result<Self, CoreError> {
        if comment.trim().is_empty() {
            return Err(CoreError::Validation(
                "Error report comment must not be empty".into(),
            ));
        }
        Ok(Self {
            kind: FeedbackType::ErrorReport,
            is_positive: None,
            comment: Some(comment.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Confirmation notice
// ---------------------------------------------------------------------------

/// Confirmation banner that dismisses itself after [`NOTICE_TTL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    posted_at: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self::posted_at(message, Instant::now())
    }

    pub fn posted_at(message: impl Into<String>, posted_at: Instant) -> Self {
        Self {
            message: message.into(),
            posted_at,
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) < NOTICE_TTL
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }
}
