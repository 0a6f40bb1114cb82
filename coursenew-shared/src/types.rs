//! Wire types shared between the API and its clients
//!
//! All JSON field names are camelCase. Timestamps are ISO-8601 UTC strings
//! with millisecond precision (`2024-01-01T00:00:00.000Z`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::is_valid_email;

/// A registered person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier, assigned by the store
    pub id: String,
    /// Unique, validated email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Set once at creation
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Uniform response envelope
///
/// Optional fields are omitted from the JSON entirely when absent.
///
/// # Example
///
/// ```rust
/// use coursenew_shared::types::ApiResponse;
///
/// let response = ApiResponse::success("payload", Some("Done"));
/// assert!(response.success);
/// assert_eq!(response.data, Some("payload"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = ()> {
    /// Whether the operation succeeded
    pub success: bool,

    /// Payload, present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Short machine-oriented failure label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`
    pub fn success(data: T, message: Option<&str>) -> Self {
        crate::utils::create_api_response(true, Some(data), None, message)
    }

    /// Failed envelope carrying an error label and description
    pub fn failure(error: &str, message: &str) -> Self {
        crate::utils::create_api_response(false, None, Some(error), Some(message))
    }
}

/// Payload returned by a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUser {
    /// The removed record
    pub deleted_user: User,
    /// Long-form date of the deletion
    pub deleted_at: String,
}

/// Reasons a create or update request is rejected before touching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum UserValidationError {
    /// Email or name missing (or empty) on create
    #[error("Missing required fields")]
    MissingRequiredFields,

    /// Email supplied but not a valid address
    #[error("Invalid email format")]
    InvalidEmailFormat,
}

impl UserValidationError {
    /// Short error label carried in the envelope's `error` field
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingRequiredFields => "Missing required fields",
            Self::InvalidEmailFormat => "Invalid email format",
        }
    }

    /// Human-readable description carried in the envelope's `message` field
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MissingRequiredFields => "Email and name are required",
            Self::InvalidEmailFormat => "Please provide a valid email address",
        }
    }
}

/// Body of `POST /api/users`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CreateUserRequest {
    /// Validate the request, checking presence before format
    pub fn validate(self) -> Result<NewUser, UserValidationError> {
        let (Some(email), Some(name)) = (supplied(self.email), supplied(self.name)) else {
            return Err(UserValidationError::MissingRequiredFields);
        };

        if !is_valid_email(&email) {
            return Err(UserValidationError::InvalidEmailFormat);
        }

        Ok(NewUser { email, name })
    }
}

/// Body of `PUT /api/users/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateUserRequest {
    /// Validate the request
    ///
    /// Empty strings count as "not supplied" and leave the stored value alone.
    pub fn validate(self) -> Result<UserChanges, UserValidationError> {
        let email = supplied(self.email);
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(UserValidationError::InvalidEmailFormat);
            }
        }

        Ok(UserChanges {
            email,
            name: supplied(self.name),
        })
    }
}

/// A validated create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

/// A validated update; `None` fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UserChanges {
    /// Check if the update carries any field changes
    #[must_use]
    pub fn has_updates(&self) -> bool {
        self.email.is_some() || self.name.is_some()
    }
}

fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Millisecond-precision RFC 3339 timestamps
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
