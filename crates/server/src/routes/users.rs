//! User directory handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use chargeboard_core::{ChargerPreference, UserId, UserName};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::state::AppState;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", axum::routing::delete(delete_user))
}

/// Request body for user creation.
///
/// Raw strings are validated here, before any database interaction;
/// an absent preference defaults to `both`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub pref: Option<String>,
}

/// List all users.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Create a user.
///
/// # Errors
///
/// Returns `400` for an empty name or unknown preference and `409` when the
/// name is already taken.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let name = UserName::parse(&body.name)
        .map_err(|e| AppError::Validation(format!("invalid name: {e}")))?;
    let pref = match body.pref.as_deref() {
        None => ChargerPreference::default(),
        Some(raw) => raw
            .parse::<ChargerPreference>()
            .map_err(AppError::Validation)?,
    };

    let user = UserRepository::new(state.pool()).create(&name, pref).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Delete a user, cascading removal from the queue and spot assignments.
///
/// # Errors
///
/// Returns `404` if no such user exists.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    UserRepository::new(state.pool())
        .delete(UserId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
