//! Reset trigger handler.
//!
//! The external scheduler hits this endpoint every few minutes; the
//! coordinator decides whether the daily boundary has been crossed and
//! performs the reset at most once per day.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;

use crate::db::{ResetCoordinator, ResetOutcome};
use crate::error::Result;
use crate::state::AppState;

/// Response for a trigger invocation.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    /// Whether this invocation actually performed the reset.
    pub performed: bool,
}

/// Run the reset coordinator against the current time.
///
/// # Errors
///
/// Returns an error if the database operation fails; the transaction is
/// rolled back, so the trigger is safe to retry.
pub async fn trigger(State(state): State<AppState>) -> Result<Json<ResetResponse>> {
    let outcome = ResetCoordinator::new(state.pool()).run(Utc::now()).await?;
    Ok(Json(ResetResponse {
        performed: outcome == ResetOutcome::Performed,
    }))
}
