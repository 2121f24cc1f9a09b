//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (probes the database)
//!
//! # Shared state
//! GET  /api/state              - Read queue + spots + lastReset, ETag = version
//! PUT  /api/state              - Replace queue + spot assignments (If-Match)
//!
//! # Reset trigger (external scheduler)
//! POST /api/reset-timer        - Perform the daily reset if due
//!
//! # Settings
//! GET  /api/settings           - Read the daily reset time
//! PUT  /api/settings           - Update the daily reset time
//!
//! # Users
//! GET    /api/users            - List users
//! POST   /api/users            - Create a user
//! DELETE /api/users/{id}       - Delete a user (cascades queue/spot refs)
//! ```

pub mod reset;
pub mod settings;
pub mod state;
pub mod users;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/state", state::router())
        .nest("/api/settings", settings::router())
        .nest("/api/users", users::router())
        .route("/api/reset-timer", post(reset::trigger))
}
