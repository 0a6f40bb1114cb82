//! `/api/users` CRUD handlers
//!
//! Request validation happens in the shared request types; the store enforces
//! uniqueness and applies each mutation atomically.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use chrono::Utc;
use coursenew_shared::{
    types::{CreateUserRequest, DeletedUser, UpdateUserRequest, User},
    utils::format_date,
};

use super::extract::ApiBody;
use crate::{
    error::{Error, Result},
    repository::UserRepository,
    responses::{Created, Success},
    state::AppState,
};

/// Routes relative to the users mount point
pub fn router<R: UserRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/", get(list_users::<R>).post(create_user::<R>))
        .route(
            "/{id}",
            get(get_user::<R>).put(update_user::<R>).delete(delete_user::<R>),
        )
}

/// `GET /api/users`
#[tracing::instrument(skip(state))]
pub async fn list_users<R: UserRepository>(
    State(state): State<AppState<R>>,
) -> Result<Success<Vec<User>>> {
    let users = state.users().list().await?;
    tracing::debug!(count = users.len(), "Listed users");
    Ok(Success::new(users).with_message("Users retrieved successfully"))
}

/// `GET /api/users/{id}`
#[tracing::instrument(skip(state))]
pub async fn get_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Success<User>> {
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(Error::user_not_found)?;

    Ok(Success::new(user).with_message("User retrieved successfully"))
}

/// `POST /api/users`
#[tracing::instrument(skip(state, request))]
pub async fn create_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    ApiBody(request): ApiBody<CreateUserRequest>,
) -> Result<Created<User>> {
    let new_user = request.validate()?;
    let user = state.users().create(new_user).await?;

    tracing::info!(user_id = %user.id, "User created");

    let location = format!("/api/users/{}", user.id);
    Ok(Created::new(user)
        .with_message("User created successfully")
        .with_location(location))
}

/// `PUT /api/users/{id}`
///
/// An unknown id is reported before the body is validated.
#[tracing::instrument(skip(state, request))]
pub async fn update_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    ApiBody(request): ApiBody<UpdateUserRequest>,
) -> Result<Success<User>> {
    if state.users().find_by_id(&id).await?.is_none() {
        return Err(Error::user_not_found());
    }

    let changes = request.validate()?;
    let user = state.users().update(&id, changes).await?;

    tracing::info!(user_id = %user.id, "User updated");
    Ok(Success::new(user).with_message("User updated successfully"))
}

/// `DELETE /api/users/{id}`
#[tracing::instrument(skip(state))]
pub async fn delete_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Success<DeletedUser>> {
    let deleted_user = state.users().delete(&id).await?;

    tracing::info!(user_id = %deleted_user.id, "User deleted");
    Ok(Success::new(DeletedUser {
        deleted_user,
        deleted_at: format_date(Utc::now()),
    })
    .with_message("User deleted successfully"))
}
