//! Envelope construction, email validation and date formatting

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::types::ApiResponse;

/// One `@`, no whitespace, and at least one dot after the `@`.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Build a response envelope
///
/// `data`, `error` and `message` are only carried when supplied. Empty strings
/// for `error` and `message` are treated as not supplied so that they never
/// reach the wire as `""`.
///
/// # Example
///
/// ```rust
/// use coursenew_shared::utils::create_api_response;
///
/// let response = create_api_response(true, Some(vec![1, 2, 3]), None, Some("Listed"));
/// assert!(response.success);
/// assert_eq!(response.data, Some(vec![1, 2, 3]));
/// assert!(response.error.is_none());
/// ```
pub fn create_api_response<T>(
    success: bool,
    data: Option<T>,
    error: Option<&str>,
    message: Option<&str>,
) -> ApiResponse<T> {
    ApiResponse {
        success,
        data,
        error: non_empty(error),
        message: non_empty(message),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Check whether a string looks like an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Format a timestamp as a long US date, e.g. `January 15, 2024`
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%B %-d, %Y").to_string()
}
