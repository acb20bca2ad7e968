use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{timestamp, Timestamp};

/// Account record held for the duration of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: Timestamp,
    #[serde(
        default,
        deserialize_with = "timestamp::option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login_at: Option<Timestamp>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Response of `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Minimum password length accepted before a registration call is made.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Basic client-side shape check for an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{trimmed}' is not a valid email address"
        )))
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(CoreError::Validation("Password must not be empty".into()));
        }
        Ok(())
    }
}

impl RegistrationRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CoreError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "First and last name are required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_login_response() {
        let auth: AuthResponse = serde_json::from_value(json!({
            "user": {
                "id": "u-1",
                "email": "ada@example.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "createdAt": "2024-01-01T09:00:00.5",
                "lastLoginAt": null
            },
            "accessToken": "tok",
            "tokenType": "bearer"
        }))
        .unwrap();

        assert_eq!(auth.user.full_name(), "Ada Lovelace");
        assert!(auth.user.last_login_at.is_none());
        assert_eq!(auth.token_type.as_deref(), Some("bearer"));
        assert!(auth.refresh_token.is_none());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada.example.com").is_err());
    }

    #[test]
    fn registration_requires_names_and_password_length() {
        let mut req = RegistrationRequest {
            email: "ada@example.com".into(),
            password: "short".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        };
        assert!(req.validate().is_err());
        req.password = "long enough".into();
        assert!(req.validate().is_ok());
        req.last_name = " ".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn login_requires_password() {
        let req = LoginRequest {
            email: "ada@example.com".into(),
            password: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
