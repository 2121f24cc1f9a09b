//! User directory repository.
//!
//! Users are referenced by the queue and by spot assignments, so deletion
//! cleans both up in the same transaction as the user row itself — and
//! because that cleanup mutates the shared state, it takes the `state_meta`
//! writer lock and bumps the version like any other writer.

use sqlx::PgPool;

use chargeboard_core::{ChargerPreference, UserId, UserName};

use super::{RepositoryError, state_store};
use crate::models::User;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    pref: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let name = UserName::parse(&self.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid user name in database: {e}"))
        })?;
        let pref: ChargerPreference = self.pref.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid preference in database: {e}"))
        })?;

        Ok(User {
            id: self.id,
            name,
            pref,
        })
    }
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all users, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, name, pref FROM users ORDER BY name")
            .fetch_all(self.pool)
            .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(row.into_user()?);
        }

        Ok(users)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &UserName,
        pref: ChargerPreference,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, pref) VALUES ($1, $2) RETURNING id, name, pref",
        )
        .bind(name.as_str())
        .bind(pref.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("user name already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Delete a user, removing their queue entries and spot assignments.
    ///
    /// The cleanup and the user-row deletion commit together or not at all.
    /// If the cleanup actually changed shared state, the state version
    /// advances so concurrent readers observe the change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Writer lock: the cleanup below mutates queue/spots.
        state_store::lock_version(&mut tx).await?;

        let queue_removed = sqlx::query("DELETE FROM queue WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let spots_cleared = sqlx::query("UPDATE spots SET user_id = NULL WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            // Dropping the transaction rolls back the cleanup.
            return Err(RepositoryError::NotFound);
        }

        if queue_removed + spots_cleared > 0 {
            sqlx::query("UPDATE state_meta SET version = version + 1 WHERE id = TRUE")
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(user = %id, queue_removed, spots_cleared, "user deleted");
        Ok(())
    }
}
