//! Error types and HTTP response conversion
//!
//! Every error leaves the service as an [`ApiResponse`] envelope with a fixed
//! status code. Internal failures are logged and reported with a generic
//! message so no details reach the client.

use axum::{
    extract::rejection::{BytesRejection, FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coursenew_shared::types::{ApiResponse, UserValidationError};
use thiserror::Error;

use crate::repository::{RepositoryError, RepositoryErrorKind};

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

const INTERNAL_ERROR: &str = "Internal server error";
const INTERNAL_MESSAGE: &str = "An error occurred while processing your request";

/// Main error type for the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad request (400)
    #[error("Bad request: {error}")]
    BadRequest { error: String, message: String },

    /// Resource not found (404)
    #[error("Not found: {error}")]
    NotFound { error: String, message: String },

    /// Resource conflict (409)
    #[error("Conflict: {error}")]
    Conflict { error: String, message: String },

    /// Request body over the configured limit (413)
    #[error("Payload too large: {error}")]
    PayloadTooLarge { error: String, message: String },

    /// Request exceeded the configured timeout (408)
    #[error("Request timeout: {error}")]
    RequestTimeout { error: String, message: String },

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Lookup by id missed
    pub fn user_not_found() -> Self {
        Self::NotFound {
            error: "User not found".to_string(),
            message: "No user found with the specified ID".to_string(),
        }
    }

    /// Email already taken by another user
    pub fn user_already_exists() -> Self {
        Self::Conflict {
            error: "User already exists".to_string(),
            message: "A user with this email already exists".to_string(),
        }
    }

    /// No route matched the request
    pub fn route_not_found() -> Self {
        Self::NotFound {
            error: "Route not found".to_string(),
            message: "The requested route does not exist".to_string(),
        }
    }

    /// Request body could not be read or parsed
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::BadRequest {
            error: "Invalid request body".to_string(),
            message: message.into(),
        }
    }

    /// Request body over the size limit
    pub fn payload_too_large() -> Self {
        Self::PayloadTooLarge {
            error: "Payload too large".to_string(),
            message: "The request body exceeds the maximum allowed size".to_string(),
        }
    }

    /// Request did not complete in time
    pub fn request_timeout() -> Self {
        Self::RequestTimeout {
            error: "Request timeout".to_string(),
            message: "The request took too long to process".to_string(),
        }
    }

    fn from_rejection(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::payload_too_large()
        } else {
            Self::invalid_body(body_text)
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RequestTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope sent to the client
    pub fn to_envelope(&self) -> ApiResponse {
        match self {
            Self::BadRequest { error, message }
            | Self::NotFound { error, message }
            | Self::Conflict { error, message }
            | Self::PayloadTooLarge { error, message }
            | Self::RequestTimeout { error, message } => ApiResponse::failure(error, message),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                ApiResponse::failure(INTERNAL_ERROR, INTERNAL_MESSAGE)
            }
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<UserValidationError> for Error {
    fn from(err: UserValidationError) -> Self {
        Self::BadRequest {
            error: err.label().to_string(),
            message: err.message().to_string(),
        }
    }
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err.kind {
            RepositoryErrorKind::NotFound => Self::user_not_found(),
            RepositoryErrorKind::AlreadyExists => Self::user_already_exists(),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for Error {
    fn from(rejection: FormRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for Error {
    fn from(rejection: BytesRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
            }
            _ => {
                tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
            }
        }

        (status, Json(self.to_envelope())).into_response()
    }
}
