//! Append-only persistence of submitted runs.
//!
//! Runs are never updated or deleted. Duplicate player names are expected:
//! the tables have no uniqueness on `player_name`, and deduplication only
//! happens in the ranking queries.

use leaderboard_core::Board;
use leaderboard_core::board::REYNOLDS_CHALLENGE;
use leaderboard_types::{ChallengeRunRecord, RunRecord};
use sqlx::PgPool;

use crate::error::DbError;

/// Inserts into the run tables.
pub struct RunStore<'a> {
    pool: &'a PgPool,
}

impl<'a> RunStore<'a> {
    /// Create a new run store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a timed run into `board`'s table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::WrongBoard`] for a non-timed board and
    /// [`DbError::Postgres`] if the insert fails.
    pub async fn append_run(&self, board: &'static Board, run: &RunRecord) -> Result<(), DbError> {
        if !board.is_timed() {
            return Err(DbError::WrongBoard(board.table));
        }

        let sql = format!(
            "INSERT INTO {} (id, player_name, completion_time_ms, language, submitted_at)
             VALUES ($1, $2, $3, $4, $5)",
            board.table
        );
        sqlx::query(&sql)
            .bind(run.id.into_inner())
            .bind(&run.player_name)
            .bind(run.completion_time_ms)
            .bind(run.language.as_deref())
            .bind(run.submitted_at)
            .execute(self.pool)
            .await?;

        tracing::debug!(
            table = board.table,
            run_id = %run.id,
            player = %run.player_name,
            completion_time_ms = run.completion_time_ms,
            "Appended run"
        );
        Ok(())
    }

    /// Insert a Reynolds challenge run.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn append_challenge_run(&self, run: &ChallengeRunRecord) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO reynolds_challenge (id, player_name, completion_time_ms, peak_velocity, flow_ratio_avg, flow_ratio_3, flow_ratio_4, flow_ratio_5, language, submitted_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(run.id.into_inner())
        .bind(&run.player_name)
        .bind(run.completion_time_ms)
        .bind(run.peak_velocity)
        .bind(run.flow_ratio_avg)
        .bind(run.flow_ratio_3)
        .bind(run.flow_ratio_4)
        .bind(run.flow_ratio_5)
        .bind(run.language.as_deref())
        .bind(run.submitted_at)
        .execute(self.pool)
        .await?;

        tracing::debug!(
            table = REYNOLDS_CHALLENGE.table,
            run_id = %run.id,
            player = %run.player_name,
            flow_ratio_avg = run.flow_ratio_avg,
            "Appended challenge run"
        );
        Ok(())
    }
}
