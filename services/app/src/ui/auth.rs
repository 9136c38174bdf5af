//! services/app/src/ui/auth.rs
//!
//! Credential checks for the login and signup screens.
//!
//! Any email paired with a password of at least six characters is accepted;
//! there is no account lookup and no password storage.

use regex::Regex;
use std::sync::OnceLock;
use ticketflow_core::domain::Session;
use ticketflow_core::ports::PortError;
use uuid::Uuid;

use super::form::{Field, FormErrors};

pub const MIN_PASSWORD_LEN: usize = 6;

pub const LOGIN_FAILED: &str = "Invalid credentials. Password must be at least 6 characters.";
pub const SIGNUP_FAILED: &str = "Invalid input. Please check your details.";

/// Which auth screen submitted the credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    fn failure_message(self) -> &'static str {
        match self {
            Self::Login => LOGIN_FAILED,
            Self::Signup => SIGNUP_FAILED,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidCredentials(&'static str),
    #[error("Failed to store session: {0}")]
    Storage(#[from] PortError),
}

/// The controller-level rule: non-empty email and a long enough password.
///
/// Returns a fresh session with a random token on success.
pub fn authenticate(mode: AuthMode, email: &str, password: &str) -> Result<Session, AuthError> {
    if email.is_empty() || password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidCredentials(mode.failure_message()));
    }
    Ok(Session {
        email: email.to_string(),
        token: Uuid::new_v4().simple().to_string(),
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// The screen-level checks run before `authenticate` is attempted.
pub fn validate_credentials(email: &str, password: &str) -> FormErrors {
    let mut errors = FormErrors::new();
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required".to_string());
    } else if !email_pattern().is_match(email) {
        errors.insert(Field::Email, "Invalid email format".to_string());
    }
    if password.is_empty() {
        errors.insert(Field::Password, "Password is required".to_string());
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            Field::Password,
            "Password must be at least 6 characters".to_string(),
        );
    }
    errors
}
