//! Request identifiers
//!
//! Request IDs are a `req_` prefix followed by a UUIDv7 in simple (hyphenless)
//! form, so they sort by creation time in logs:
//!
//! ```rust
//! use coursenew_api::ids::RequestId;
//!
//! let request_id = RequestId::new();
//! assert!(request_id.as_str().starts_with("req_"));
//! ```

use std::fmt;

use http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};
use uuid::Uuid;

/// A time-sortable request identifier for log correlation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new request ID with a UUIDv7
    #[must_use]
    pub fn new() -> Self {
        Self(format!("{}_{}", Self::PREFIX, Uuid::now_v7().simple()))
    }

    /// Returns the request ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates a [`RequestId`] for every request missing an `x-request-id` header
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        HeaderValue::from_str(id.as_str())
            .ok()
            .map(TowerRequestId::new)
    }
}
