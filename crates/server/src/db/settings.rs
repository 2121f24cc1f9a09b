//! Settings repository: the singleton daily reset time.

use sqlx::PgPool;

use chargeboard_core::ResetTime;

use super::RepositoryError;

/// Repository for the settings singleton.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the configured daily reset time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored value does
    /// not parse or the singleton row is missing.
    pub async fn reset_time(&self) -> Result<ResetTime, RepositoryError> {
        let stored: String = sqlx::query_scalar("SELECT reset_time FROM settings WHERE id = TRUE")
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption("settings singleton row is missing".into())
            })?;

        ResetTime::parse(&stored).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid reset time in database: {e}"))
        })
    }

    /// Set the daily reset time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_reset_time(&self, reset_time: ResetTime) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE settings SET reset_time = $1 WHERE id = TRUE")
            .bind(reset_time.to_string())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
