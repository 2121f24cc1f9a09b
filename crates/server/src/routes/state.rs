//! Shared-state read/replace handlers.
//!
//! The state version travels as an entity tag: `GET` returns it in `ETag`,
//! `PUT` takes it back in `If-Match` as the write precondition. A stale tag
//! yields `412 Precondition Failed` with no mutation; a request without
//! `If-Match` carries no precondition and always applies.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use chargeboard_core::StateVersion;

use crate::db::StateStore;
use crate::error::{AppError, Result};
use crate::models::{DesiredState, QueueEntry, Spot, StateSnapshot};
use crate::state::AppState;

/// Build the state router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(read_state).put(replace_state))
}

/// Response body for both read and replace.
#[derive(Debug, Serialize)]
pub struct StateBody {
    pub queue: Vec<QueueEntry>,
    pub spots: Vec<Spot>,
    #[serde(rename = "lastReset")]
    pub last_reset: Option<DateTime<Utc>>,
}

/// Read the current state.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn read_state(State(state): State<AppState>) -> Result<Response> {
    let snapshot = StateStore::new(state.pool()).read().await?;
    Ok(snapshot_response(snapshot))
}

/// Replace the queue and spot assignments, conditionally on `If-Match`.
///
/// # Errors
///
/// Returns `400` for a malformed `If-Match` tag (before any database
/// interaction), `412` when the tag is stale, `409` when the desired state
/// violates a storage constraint.
pub async fn replace_state(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(desired): Json<DesiredState>,
) -> Result<Response> {
    let precondition = parse_if_match(&headers)?;
    let snapshot = StateStore::new(state.pool())
        .replace(&desired, precondition)
        .await?;
    Ok(snapshot_response(snapshot))
}

/// Render a snapshot as the JSON body plus the version entity tag.
fn snapshot_response(snapshot: StateSnapshot) -> Response {
    let etag = snapshot.version.to_string();
    let body = StateBody {
        queue: snapshot.queue,
        spots: snapshot.spots,
        last_reset: snapshot.last_reset,
    };
    ([(header::ETAG, etag)], Json(body)).into_response()
}

/// Extract the precondition version from `If-Match`, if present.
///
/// The tag is the decimal version number, with or without surrounding
/// quotes. Anything else is rejected as a validation error rather than
/// silently treated as "no precondition".
fn parse_if_match(headers: &HeaderMap) -> std::result::Result<Option<StateVersion>, AppError> {
    let Some(value) = headers.get(header::IF_MATCH) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| AppError::Validation("If-Match must be a printable string".to_string()))?;
    let tag = raw.trim().trim_matches('"');
    tag.parse::<StateVersion>().map(Some).map_err(|_| {
        AppError::Validation(format!("If-Match is not a state version: {raw:?}"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(tag: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_MATCH, HeaderValue::from_str(tag).unwrap());
        headers
    }

    #[test]
    fn test_absent_if_match_is_no_precondition() {
        assert_eq!(parse_if_match(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_bare_and_quoted_tags_parse() {
        assert_eq!(
            parse_if_match(&headers_with("7")).unwrap(),
            Some(StateVersion::new(7))
        );
        assert_eq!(
            parse_if_match(&headers_with("\"7\"")).unwrap(),
            Some(StateVersion::new(7))
        );
    }

    #[test]
    fn test_malformed_tag_is_validation_error() {
        let err = parse_if_match(&headers_with("not-a-version")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
