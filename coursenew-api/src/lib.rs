//! # coursenew-api
//!
//! JSON-over-HTTP users service. Every response, success or failure, is an
//! [`ApiResponse`](coursenew_shared::types::ApiResponse) envelope.
//!
//! ## Features
//!
//! - **Users resource**: list, get, create, update and delete under `/api/users`
//! - **Middleware stack**: request tracking, panic recovery, body size limits, CORS, security headers
//! - **Configuration**: layered TOML files and environment variables
//! - **Graceful shutdown**: SIGTERM and SIGINT handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use coursenew_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::from_config(config.clone());
//!     let app = build_router(state);
//!
//!     Server::new(config).serve(app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod responses;
pub mod routes;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::handlers::ApiBody;
    pub use crate::health::{health, HealthResponse};
    pub use crate::ids::{MakeTypedRequestId, RequestId};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        MemoryUserRepository, RepositoryError, RepositoryErrorKind, UserRepository,
    };
    pub use crate::responses::{Created, Success};
    pub use crate::routes::build_router;
    pub use crate::server::Server;
    pub use crate::state::AppState;

    pub use coursenew_shared::prelude::*;
}
