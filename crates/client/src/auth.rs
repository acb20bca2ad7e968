//! Login, registration and logout on top of [`SessionProvider`].

use legalease_core::error::CoreError;
use legalease_core::session::{Guard, Session, SessionProvider};
use legalease_core::user::{LoginRequest, RegistrationRequest, User};

use crate::api::{ApiError, LegalEaseApi};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(CoreError),

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to store session: {0}")]
    Session(#[source] CoreError),

    #[error("Please sign in first")]
    NotSignedIn,
}

impl AuthError {
    fn from_api(source: ApiError, fallback: &str) -> Self {
        Self::Api {
            message: source.user_message(fallback),
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    api: LegalEaseApi,
    session: SessionProvider,
}

impl AuthClient {
    pub fn new(api: LegalEaseApi, session: SessionProvider) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionProvider {
        &self.session
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<Session, AuthError> {
        request.validate().map_err(AuthError::Invalid)?;
        let auth = self
            .api
            .login(request)
            .await
            .map_err(|e| AuthError::from_api(e, "Login failed"))?;
        self.session.begin(&auth).map_err(AuthError::Session)
    }

    pub async fn register(&self, request: &RegistrationRequest) -> Result<Session, AuthError> {
        request.validate().map_err(AuthError::Invalid)?;
        let auth = self
            .api
            .register(request)
            .await
            .map_err(|e| AuthError::from_api(e, "Registration failed"))?;
        self.session.begin(&auth).map_err(AuthError::Session)
    }

    /// Current user as the backend sees it. A rejected token ends the
    /// local session.
    pub async fn me(&self) -> Result<User, AuthError> {
        let Guard::Authenticated(session) = self.session.guard() else {
            return Err(AuthError::NotSignedIn);
        };
        match self.api.me(&session.access_token).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_unauthorized() => {
                tracing::info!(user_id = %session.user.id, "Stored token rejected, ending session");
                self.session.end().map_err(AuthError::Session)?;
                Err(AuthError::NotSignedIn)
            }
            Err(e) => Err(AuthError::from_api(e, "Failed to load user")),
        }
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.end().map_err(AuthError::Session)
    }
}
