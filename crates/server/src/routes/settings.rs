//! Settings handlers: the daily reset time.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};

use chargeboard_core::ResetTime;

use crate::db::SettingsRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(read_settings).put(update_settings))
}

/// Response body for settings reads and writes.
#[derive(Debug, Serialize)]
pub struct SettingsBody {
    #[serde(rename = "resetTime")]
    pub reset_time: ResetTime,
}

/// Request body for settings updates.
///
/// The raw string is validated here, before any database interaction.
#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    #[serde(rename = "resetTime")]
    pub reset_time: String,
}

/// Read the configured reset time.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn read_settings(State(state): State<AppState>) -> Result<Json<SettingsBody>> {
    let reset_time = SettingsRepository::new(state.pool()).reset_time().await?;
    Ok(Json(SettingsBody { reset_time }))
}

/// Update the reset time.
///
/// # Errors
///
/// Returns `400` for a value that is not a valid `HH:MM` time of day.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<SettingsUpdate>,
) -> Result<Json<SettingsBody>> {
    let reset_time = ResetTime::parse(&body.reset_time)
        .map_err(|e| AppError::Validation(format!("invalid resetTime: {e}")))?;

    SettingsRepository::new(state.pool())
        .set_reset_time(reset_time)
        .await?;

    Ok(Json(SettingsBody { reset_time }))
}
