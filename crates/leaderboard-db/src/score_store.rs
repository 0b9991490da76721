//! River Guardian high scores.
//!
//! The table keeps exactly one row per player and a score that never
//! decreases. Upsert-if-better is one statement: the conflict path takes a
//! row lock, so concurrent submissions for the same player serialize in
//! the database and the highest score always wins.

use chrono::{DateTime, Utc};
use leaderboard_types::{BestScoreRecord, UpsertOutcome};
use sqlx::PgPool;

use crate::error::DbError;

/// Operations on the `river_guardian_scores` table.
pub struct ScoreStore<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreStore<'a> {
    /// Create a new score store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store `score` for `player_name` if it beats the stored score.
    ///
    /// `RETURNING` yields no row when the `WHERE` on the conflict path
    /// rejects the update. Otherwise `xmax = 0` tells a fresh insert apart
    /// from an update of an existing row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the statement fails.
    pub async fn upsert_if_better(
        &self,
        player_name: &str,
        score: i64,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, DbError> {
        let inserted: Option<bool> = sqlx::query_scalar(
            r"INSERT INTO river_guardian_scores (player_name, score, last_updated)
              VALUES ($1, $2, $3)
              ON CONFLICT (player_name) DO UPDATE
                  SET score = EXCLUDED.score, last_updated = EXCLUDED.last_updated
                  WHERE river_guardian_scores.score < EXCLUDED.score
              RETURNING (xmax = 0) AS inserted",
        )
        .bind(player_name)
        .bind(score)
        .bind(now)
        .fetch_optional(self.pool)
        .await?;

        let outcome = match inserted {
            Some(true) => UpsertOutcome::Created,
            Some(false) => UpsertOutcome::Updated,
            None => UpsertOutcome::Unchanged,
        };

        tracing::debug!(player = player_name, score, ?outcome, "Upserted high score");
        Ok(outcome)
    }

    /// Fetch a player's high-score row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&self, player_name: &str) -> Result<Option<BestScoreRecord>, DbError> {
        let row = sqlx::query_as::<_, BestScoreRow>(
            r"SELECT player_name, score, last_updated
              FROM river_guardian_scores
              WHERE player_name = $1",
        )
        .bind(player_name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}

/// A row from the `river_guardian_scores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BestScoreRow {
    /// Player name (primary key).
    pub player_name: String,
    /// Highest score so far.
    pub score: i64,
    /// When the score last changed.
    pub last_updated: DateTime<Utc>,
}

impl From<BestScoreRow> for BestScoreRecord {
    fn from(row: BestScoreRow) -> Self {
        Self {
            player_name: row.player_name,
            score: row.score,
            last_updated: row.last_updated,
        }
    }
}
