// src/api/error.rs
// Centralized error handling for HTTP API responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use crate::auth::AuthFailure;
use crate::project::ProjectError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: Option<String>,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            error_code: Some("INTERNAL_ERROR".to_string()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
            error_code: Some("BAD_REQUEST".to_string()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
            error_code: Some("NOT_FOUND".to_string()),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::UNAUTHORIZED,
            error_code: Some("UNAUTHORIZED".to_string()),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::FORBIDDEN,
            error_code: Some("FORBIDDEN".to_string()),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response_json = json!({
            "error": true,
            "message": self.message,
            "status": self.status_code.as_u16()
        });

        if let Some(error_code) = self.error_code {
            response_json["error_code"] = json!(error_code);
        }

        (self.status_code, Json(response_json)).into_response()
    }
}

/// Every project failure is a client error; only a missing project gets
/// its own status.
impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match &err {
            ProjectError::NotFound(_) => {
                warn!("{}", err);
                ApiError::not_found(err.to_string())
            }
            ProjectError::UnsupportedOperation => {
                warn!("{}", err);
                ApiError::bad_request(err.to_string())
            }
            _ => {
                error!("{}: {:?}", err, anyhow_source(&err));
                ApiError::bad_request(err.to_string())
            }
        }
    }
}

fn anyhow_source(err: &ProjectError) -> Option<&anyhow::Error> {
    match err {
        ProjectError::Lookup { source, .. }
        | ProjectError::Creation(source)
        | ProjectError::OwnerAssociation(source)
        | ProjectError::Like(source) => Some(source),
        ProjectError::NotFound(_) | ProjectError::UnsupportedOperation => None,
    }
}

/// Rejected credentials are 403 so clients can tell them from a broken
/// user store, which is a 400 lookup error.
impl From<AuthFailure> for ApiError {
    fn from(err: AuthFailure) -> Self {
        match &err {
            AuthFailure::InvalidCredentials | AuthFailure::AccountDisabled => {
                warn!("Login rejected: {}", err);
                ApiError::forbidden(err.to_string())
            }
            AuthFailure::Rejected(_) => {
                warn!("Registration rejected: {}", err);
                ApiError::bad_request(err.to_string())
            }
            AuthFailure::Store(source) => {
                error!("{}: {:?}", err, source);
                ApiError::bad_request(err.to_string())
            }
        }
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
