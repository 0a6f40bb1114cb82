//! Service-level endpoints: liveness, API root and the 404 fallback

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{error::Error, repository::UserRepository, responses::Success, state::AppState};

const WELCOME: &str = "Welcome to the Full-Stack TypeScript Monorepo API";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Payload of `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
    pub version: String,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health<R: UserRepository>(State(state): State<AppState<R>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// API root greeting
pub async fn root() -> Success<Welcome> {
    Success::new(Welcome {
        message: WELCOME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
    .with_message("API is running")
}

/// Fallback for unmatched routes
pub async fn route_not_found() -> Error {
    Error::route_not_found()
}
