//! Success responses wrapped in the [`ApiResponse`] envelope
//!
//! Failures go through [`crate::error::Error`]; these builders cover the two
//! success statuses the API uses.
//!
//! ```rust,ignore
//! async fn create_user() -> Result<Created<User>> {
//!     let user = store.create(new_user).await?;
//!     Ok(Created::new(user).with_location(format!("/api/users/{}", user.id)))
//! }
//! ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use coursenew_shared::types::ApiResponse;
use serde::Serialize;

/// HTTP 200 OK with `success: true`
#[derive(Debug)]
pub struct Success<T> {
    data: T,
    message: Option<String>,
}

impl<T> Success<T> {
    /// Wrap `data` in a successful envelope
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        let body = ApiResponse::success(self.data, self.message.as_deref());
        (StatusCode::OK, Json(body)).into_response()
    }
}

/// HTTP 201 Created with `success: true`
///
/// Optionally includes a `Location` header pointing to the new resource.
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    message: Option<String>,
    location: Option<String>,
}

impl<T> Created<T> {
    /// Create a new 201 Created response
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
            location: None,
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add a Location header pointing to the created resource
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let body = ApiResponse::success(self.data, self.message.as_deref());
        let mut response = (StatusCode::CREATED, Json(body)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}
