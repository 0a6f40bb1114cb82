//! Router assembly

use axum::{routing::get, Router};

use crate::{
    handlers::users,
    health::{health, root, route_not_found},
    repository::UserRepository,
    state::AppState,
};

/// Mount point of the users resource
pub const USERS_PATH: &str = "/api/users";

/// Build the application router without server middleware
///
/// Wrap the result with [`crate::server::Server::with_middleware`] to get the
/// stack the server runs.
pub fn build_router<R: UserRepository>(state: AppState<R>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health::<R>))
        .nest(USERS_PATH, users::router::<R>())
        .fallback(route_not_found)
        .with_state(state)
}
