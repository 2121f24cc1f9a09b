//! The versioned store for the shared queue+spot state.
//!
//! All reads come from a single consistent snapshot; all writes are
//! compare-and-swap against the `state_meta` version under a row lock, so
//! two concurrent replacements cannot both pass the precondition check
//! before either commits.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use chargeboard_core::{SpotType, StateVersion, UserId};

use super::RepositoryError;
use crate::models::{DesiredState, QueueEntry, Spot, StateSnapshot};

/// Repository for the shared queue/spot/version state.
pub struct StateStore<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct SpotRow {
    id: String,
    #[sqlx(rename = "type")]
    spot_type: String,
    label: String,
    user_id: Option<UserId>,
}

impl SpotRow {
    fn into_spot(self) -> Result<Spot, RepositoryError> {
        let spot_type: SpotType = self.spot_type.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid spot type in database: {e}"))
        })?;

        Ok(Spot {
            id: self.id,
            spot_type,
            label: self.label,
            user_id: self.user_id,
        })
    }
}

impl<'a> StateStore<'a> {
    /// Create a new state store over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Read the current state and its version from one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails and
    /// `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn read(&self) -> Result<StateSnapshot, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let snapshot = snapshot_in_tx(&mut tx).await?;
        tx.commit().await?;
        Ok(snapshot)
    }

    /// Replace the full queue and spot assignments, compare-and-swap style.
    ///
    /// If `precondition` is supplied and does not equal the current version,
    /// nothing changes and `VersionConflict` is returned. Otherwise the
    /// queue is wholesale-replaced, every spot assignment is cleared and
    /// re-applied, and the version advances by exactly one — all in a single
    /// transaction holding the `state_meta` row lock.
    ///
    /// Returns the refreshed snapshot at the new version (read-your-writes).
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` on a stale precondition, `Conflict` when a
    /// uniqueness or referential constraint rejects the desired state
    /// (duplicate queue position, unknown user or spot reference), and
    /// `Database` for other failures. In every error case the transaction
    /// is dropped without committing.
    pub async fn replace(
        &self,
        desired: &DesiredState,
        precondition: Option<StateVersion>,
    ) -> Result<StateSnapshot, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock the singleton first: the version check and the mutation must
        // be one atomic decision.
        let current = lock_version(&mut tx).await?;

        if let Some(expected) = precondition
            && expected != current
        {
            return Err(RepositoryError::VersionConflict { expected, current });
        }

        // Full replace, not diff/patch: row counts are small and bounded,
        // and stale rows can never accumulate.
        sqlx::query("DELETE FROM queue").execute(&mut *tx).await?;
        for entry in &desired.queue {
            sqlx::query("INSERT INTO queue (position, user_id) VALUES ($1, $2)")
                .bind(entry.position)
                .bind(entry.user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::from_write_error(e, "queue"))?;
        }

        sqlx::query("UPDATE spots SET user_id = NULL")
            .execute(&mut *tx)
            .await?;
        for assignment in &desired.spots {
            sqlx::query("UPDATE spots SET user_id = $2 WHERE id = $1")
                .bind(&assignment.id)
                .bind(assignment.user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::from_write_error(e, "spots"))?;
        }

        sqlx::query("UPDATE state_meta SET version = version + 1 WHERE id = TRUE")
            .execute(&mut *tx)
            .await?;

        let snapshot = snapshot_in_tx(&mut tx).await?;
        tx.commit().await?;

        tracing::debug!(version = %snapshot.version, "state replaced");
        Ok(snapshot)
    }
}

/// Acquire the exclusive row lock on the `state_meta` singleton and return
/// the current version. Every writer to `queue`/`spots` goes through this.
pub(crate) async fn lock_version(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<StateVersion, RepositoryError> {
    sqlx::query_scalar::<_, StateVersion>(
        "SELECT version FROM state_meta WHERE id = TRUE FOR UPDATE",
    )
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| RepositoryError::DataCorruption("state_meta singleton row is missing".into()))
}

/// Read queue, spots, and meta inside an open transaction.
pub(crate) async fn snapshot_in_tx(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<StateSnapshot, RepositoryError> {
    let (version, last_reset) = sqlx::query_as::<_, (StateVersion, Option<DateTime<Utc>>)>(
        "SELECT version, last_reset FROM state_meta WHERE id = TRUE",
    )
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| {
        RepositoryError::DataCorruption("state_meta singleton row is missing".into())
    })?;

    let queue = sqlx::query_as::<_, (i32, UserId)>(
        "SELECT position, user_id FROM queue ORDER BY position",
    )
    .fetch_all(&mut **tx)
    .await?
    .into_iter()
    .map(|(position, user_id)| QueueEntry { position, user_id })
    .collect();

    let rows = sqlx::query_as::<_, SpotRow>(
        "SELECT id, type, label, user_id FROM spots ORDER BY id",
    )
    .fetch_all(&mut **tx)
    .await?;

    let mut spots = Vec::with_capacity(rows.len());
    for row in rows {
        spots.push(row.into_spot()?);
    }

    Ok(StateSnapshot {
        queue,
        spots,
        last_reset,
        version,
    })
}
