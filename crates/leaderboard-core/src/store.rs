//! The result store contract.
//!
//! The ranking engine never talks to a database directly. It consumes a
//! [`ResultStore`], which persists runs and answers the three aggregate
//! queries the leaderboard needs. `leaderboard-db` provides the
//! `PostgreSQL` implementation; [`MemoryStore`](crate::MemoryStore) keeps
//! everything in process.

use std::future::Future;

use chrono::{DateTime, Utc};
use leaderboard_types::{
    BestScoreRecord, ChallengeRunRecord, MetricValue, RunRecord, Standing, UpsertOutcome,
};

use crate::board::Board;

/// Errors surfaced by a result store.
///
/// The message is the backend's own text; the HTTP layer decides whether
/// to show it to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("{0}")]
    Backend(String),

    /// The operation did not complete within the backend's timeout.
    #[error("store operation timed out: {0}")]
    Timeout(String),

    /// A board was routed to an operation it does not support.
    #[error("board {table} does not accept this operation")]
    WrongBoard {
        /// Table of the offending board.
        table: &'static str,
    },
}

/// Persistence and aggregate queries for every game.
///
/// Implementations must make [`upsert_best_score`] atomic per player: two
/// concurrent calls for the same player must never both observe the old
/// score and both write.
///
/// [`upsert_best_score`]: ResultStore::upsert_best_score
pub trait ResultStore: Send + Sync + 'static {
    /// Append an immutable run to a timed board's table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WrongBoard`] if `board` is not timed, or a
    /// backend error if the write fails.
    fn append_run(
        &self,
        board: &'static Board,
        run: &RunRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Append an immutable Reynolds challenge run.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the write fails.
    fn append_challenge_run(
        &self,
        run: &ChallengeRunRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Best value per distinct player, favorable first, at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the query fails.
    fn top_players(
        &self,
        board: &'static Board,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Standing>, StoreError>> + Send;

    /// A player's best value, or `None` if they have no runs on the board.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the query fails.
    fn player_best(
        &self,
        board: &'static Board,
        player_name: &str,
    ) -> impl Future<Output = Result<Option<MetricValue>, StoreError>> + Send;

    /// Number of distinct players whose best value strictly beats `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WrongBoard`] if `value` is not of the board's
    /// metric kind, or a backend error if the query fails.
    fn count_players_better(
        &self,
        board: &'static Board,
        value: MetricValue,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Record a River Guardian score if it beats the player's stored one.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the write fails. No partial update is
    /// ever left behind.
    fn upsert_best_score(
        &self,
        player_name: &str,
        score: i64,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<UpsertOutcome, StoreError>> + Send;

    /// Read a player's River Guardian record.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the query fails.
    fn best_score(
        &self,
        player_name: &str,
    ) -> impl Future<Output = Result<Option<BestScoreRecord>, StoreError>> + Send;
}
