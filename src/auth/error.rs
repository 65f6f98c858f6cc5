// src/auth/error.rs

use thiserror::Error;

/// Failures from login, registration and session lookup. Only `Store`
/// comes from the database; the rest are verdicts about the request.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User account is disabled")]
    AccountDisabled,

    #[error("{0}")]
    Rejected(&'static str),

    #[error("Error accessing users.")]
    Store(#[source] anyhow::Error),
}

impl From<anyhow::Error> for AuthFailure {
    fn from(err: anyhow::Error) -> Self {
        AuthFailure::Store(err)
    }
}

impl From<sqlx::Error> for AuthFailure {
    fn from(err: sqlx::Error) -> Self {
        AuthFailure::Store(err.into())
    }
}

pub type AuthResult<T> = Result<T, AuthFailure>;
