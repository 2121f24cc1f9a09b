//! The daily reset coordinator.
//!
//! An external scheduler hits the reset trigger at a frequency finer than
//! once per day, possibly concurrently with itself and with client
//! replacements. The coordinator decides, under the `state_meta` row lock,
//! whether the configured boundary has been crossed since the last recorded
//! reset — and performs the reset exactly once per boundary.

use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;

use chargeboard_core::ResetTime;

use super::RepositoryError;

/// Whether a trigger invocation performed the reset or found it already done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The boundary had been crossed and this invocation cleared the state.
    Performed,
    /// Nothing to do: the boundary is still ahead, or an earlier invocation
    /// already reset past it.
    Skipped,
}

/// Coordinates the scheduled reset of the shared state.
pub struct ResetCoordinator<'a> {
    pool: &'a PgPool,
}

impl<'a> ResetCoordinator<'a> {
    /// Create a new coordinator over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Evaluate the reset condition at `now` and, if due, clear the queue
    /// and all spot assignments exactly once.
    ///
    /// Safe to call arbitrarily often: concurrent invocations serialize on
    /// the `state_meta` row lock, and once `last_reset >= target` every
    /// later invocation within the same day skips.
    ///
    /// The reset is itself a writer under the optimistic-concurrency
    /// contract, so it advances the state version like any client write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails and
    /// `DataCorruption` if the stored reset time or the `state_meta`
    /// singleton is invalid. Failures drop the transaction: no partial
    /// reset is ever visible.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ResetOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let stored: String = sqlx::query_scalar("SELECT reset_time FROM settings WHERE id = TRUE")
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption("settings singleton row is missing".into())
            })?;
        let reset_time = ResetTime::parse(&stored).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid reset time in database: {e}"))
        })?;
        let target = target_for(now, reset_time);

        // Lock before reading last_reset: steps check-then-reset must be one
        // atomic decision across overlapping trigger invocations.
        let last: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT last_reset FROM state_meta WHERE id = TRUE FOR UPDATE",
        )
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            RepositoryError::DataCorruption("state_meta singleton row is missing".into())
        })?;

        if !should_reset(now, target, last) {
            // No writes happened; dropping the transaction rolls it back.
            tracing::debug!(%target, last = ?last, "reset not due");
            return Ok(ResetOutcome::Skipped);
        }

        sqlx::query("DELETE FROM queue").execute(&mut *tx).await?;
        sqlx::query("UPDATE spots SET user_id = NULL")
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE state_meta SET last_reset = $1, version = version + 1 WHERE id = TRUE")
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(%target, "daily reset performed");
        Ok(ResetOutcome::Performed)
    }
}

/// Today's reset boundary: `now`'s UTC date at the configured time of day.
fn target_for(now: DateTime<Utc>, reset_time: ResetTime) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(
        u32::from(reset_time.hour()),
        u32::from(reset_time.minute()),
        0,
    )
    .unwrap_or(NaiveTime::MIN);
    now.date_naive().and_time(time).and_utc()
}

/// The idempotency guard: due once `now` passes the boundary, and only if no
/// reset has been recorded at or after it.
fn should_reset(
    now: DateTime<Utc>,
    target: DateTime<Utc>,
    last: Option<DateTime<Utc>>,
) -> bool {
    if now < target {
        return false;
    }
    match last {
        None => true,
        Some(last) => last < target,
    }
}
