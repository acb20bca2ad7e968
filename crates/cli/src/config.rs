use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a backend running locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL (default: `http://localhost:8000`).
    pub api_url: String,
    /// Directory holding the stored session (default: `.legalease`).
    pub session_dir: PathBuf,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Where exports are saved unless `--out` is given (default: `.`).
    pub export_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                 |
    /// |----------------------------------|-------------------------|
    /// | `LEGALEASE_API_URL`              | `http://localhost:8000` |
    /// | `LEGALEASE_SESSION_DIR`          | `.legalease`            |
    /// | `LEGALEASE_REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `LEGALEASE_EXPORT_DIR`           | `.`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("LEGALEASE_API_URL").unwrap_or_else(|| "http://localhost:8000".into());

        let session_dir = lookup("LEGALEASE_SESSION_DIR")
            .unwrap_or_else(|| ".legalease".into())
            .into();

        let request_timeout_secs = match lookup("LEGALEASE_REQUEST_TIMEOUT_SECS") {
            None => 30,
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "LEGALEASE_REQUEST_TIMEOUT_SECS",
                expected: "number of seconds",
                value,
            })?,
        };

        let export_dir = lookup("LEGALEASE_EXPORT_DIR")
            .unwrap_or_else(|| ".".into())
            .into();

        Ok(Self {
            api_url,
            session_dir,
            request_timeout_secs,
            export_dir,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
