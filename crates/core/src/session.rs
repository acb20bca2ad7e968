//! Session persistence and the authentication guard.
//!
//! A session is two stored values: the bearer token and the serialized user.
//! [`SessionProvider`] is the only place that reads or writes them.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::CoreError;
use crate::user::{AuthResponse, User};

/// Route unauthenticated users are sent to.
pub const LOGIN_ROUTE: &str = "/login";

const TOKEN_FILE: &str = "access_token";
const USER_FILE: &str = "user.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

/// Outcome of guarding a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Authenticated(Session),
    RedirectToLogin(&'static str),
}

impl Guard {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::RedirectToLogin(_) => None,
        }
    }
}

/// Raw storage for the two session values.
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Result<Option<String>, CoreError>;
    fn user_record(&self) -> Result<Option<String>, CoreError>;
    fn save(&self, token: &str, user_record: &str) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// Keeps the token and the user record as two files in one directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str) -> Result<Option<String>, CoreError> {
        match fs::read_to_string(self.dir.join(name)) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value.trim_end().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&self, name: &str) -> Result<(), CoreError> {
        match fs::remove_file(self.dir.join(name)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Result<Option<String>, CoreError> {
        self.read(TOKEN_FILE)
    }

    fn user_record(&self) -> Result<Option<String>, CoreError> {
        self.read(USER_FILE)
    }

    fn save(&self, token: &str, user_record: &str) -> Result<(), CoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(TOKEN_FILE), token)?;
        fs::write(self.dir.join(USER_FILE), user_record)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.remove(TOKEN_FILE)?;
        self.remove(USER_FILE)
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<(Option<String>, Option<String>)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with arbitrary raw values, including malformed ones.
    pub fn with_values(token: Option<&str>, user_record: Option<&str>) -> Self {
        let store = Self::default();
        if let Ok(mut slot) = store.inner.lock() {
            *slot = (token.map(String::from), user_record.map(String::from));
        }
        store
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, (Option<String>, Option<String>)>, CoreError> {
        self.inner
            .lock()
            .map_err(|_| CoreError::Internal("session store lock poisoned".into()))
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Result<Option<String>, CoreError> {
        Ok(self.slot()?.0.clone())
    }

    fn user_record(&self) -> Result<Option<String>, CoreError> {
        Ok(self.slot()?.1.clone())
    }

    fn save(&self, token: &str, user_record: &str) -> Result<(), CoreError> {
        *self.slot()? = (Some(token.to_string()), Some(user_record.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.slot()? = (None, None);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Explicit session context handed to every controller that needs auth.
#[derive(Clone)]
pub struct SessionProvider {
    store: Arc<dyn SessionStore>,
}

impl SessionProvider {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Stored bearer token, if any. Read errors count as "no token".
    pub fn token(&self) -> Option<String> {
        match self.store.token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored access token");
                None
            }
        }
    }

    /// Authenticated when both values are present and the user record
    /// parses. Anything else redirects to login.
    pub fn guard(&self) -> Guard {
        match self.current() {
            Some(session) => Guard::Authenticated(session),
            None => Guard::RedirectToLogin(LOGIN_ROUTE),
        }
    }

    fn current(&self) -> Option<Session> {
        let access_token = self.token()?;
        let record = match self.store.user_record() {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored user");
                return None;
            }
        };
        match serde_json::from_str::<User>(&record) {
            Ok(user) => Some(Session { access_token, user }),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user record is not valid JSON");
                None
            }
        }
    }

    /// Persist a fresh login and return the resulting session.
    pub fn begin(&self, auth: &AuthResponse) -> Result<Session, CoreError> {
        let record = serde_json::to_string(&auth.user)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize user: {e}")))?;
        self.store.save(&auth.access_token, &record)?;
        tracing::info!(user_id = %auth.user.id, "Session started");
        Ok(Session {
            access_token: auth.access_token.clone(),
            user: auth.user.clone(),
        })
    }

    /// Clear both stored values.
    pub fn end(&self) -> Result<(), CoreError> {
        self.store.clear()?;
        tracing::info!("Session ended");
        Ok(())
    }
}

impl std::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProvider").finish_non_exhaustive()
    }
}
