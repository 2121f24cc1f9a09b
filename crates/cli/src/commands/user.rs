//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! cb-cli user create -n "Ada Lovelace" -p tesla
//! ```
//!
//! # Environment Variables
//!
//! - `CHARGEBOARD_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

use chargeboard_core::{ChargerPreference, UserName};
use chargeboard_server::db::{RepositoryError, UserRepository};

/// Errors that can occur during user commands.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid name.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Invalid preference.
    #[error("Invalid preference: {0}. Valid values: both, tesla, chargepoint")]
    InvalidPreference(String),

    /// Repository error (e.g., the name is already taken).
    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

/// Create a new user.
///
/// # Arguments
///
/// * `name` - Display name, unique across users
/// * `pref` - Charger preference (`both`, `tesla`, `chargepoint`)
///
/// # Errors
///
/// Returns `UserError` if validation fails, the database is unreachable,
/// or the name is already taken.
pub async fn create(name: &str, pref: &str) -> Result<(), UserError> {
    dotenvy::dotenv().ok();

    let name = UserName::parse(name).map_err(|e| UserError::InvalidName(e.to_string()))?;
    let pref: ChargerPreference = pref
        .parse()
        .map_err(|_| UserError::InvalidPreference(pref.to_owned()))?;

    let database_url = std::env::var("CHARGEBOARD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| UserError::MissingEnvVar("CHARGEBOARD_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let user = UserRepository::new(&pool).create(&name, pref).await?;

    tracing::info!(
        "User created successfully! ID: {}, Name: {}, Preference: {}",
        user.id,
        user.name,
        user.pref
    );

    Ok(())
}
