//! Database operations for the Chargeboard `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `users` - Registered users and their charger preference
//! - `spots` - The fixed pool of physical charging spots
//! - `queue` - The waiting queue (position-keyed, wholesale-replaced)
//! - `state_meta` - Singleton row: state version + last reset timestamp
//! - `settings` - Singleton row: daily reset time
//!
//! The `state_meta` singleton is the sole serialization point: every writer
//! (client replace, reset trigger, user-deletion cleanup) locks it with
//! `SELECT ... FOR UPDATE` before touching `queue` or `spots`, so all
//! mutations are totally ordered by the version counter.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p chargeboard-cli -- migrate
//! ```

pub mod reset;
pub mod settings;
pub mod state_store;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use chargeboard_core::StateVersion;

pub use reset::{ResetCoordinator, ResetOutcome};
pub use settings::SettingsRepository;
pub use state_store::StateStore;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx. The enclosing transaction has been rolled
    /// back, so the whole operation is safe to retry.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate name, duplicate queue position,
    /// dangling user reference).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A write precondition did not match the current state version.
    /// No mutation occurred; the caller must re-read and retry.
    #[error("version conflict: expected {expected}, current {current}")]
    VersionConflict {
        /// The version the caller last read.
        expected: StateVersion,
        /// The version the store holds now.
        current: StateVersion,
    },
}

impl RepositoryError {
    /// Map a sqlx error to `Conflict` when it is a unique or foreign-key
    /// violation, keeping it a plain `Database` error otherwise.
    fn from_write_error(e: sqlx::Error, context: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return Self::Conflict(format!("{context}: duplicate key"));
            }
            if db_err.is_foreign_key_violation() {
                return Self::Conflict(format!("{context}: dangling reference"));
            }
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
