//! [`ResultStore`] implementation over the `PostgreSQL` pool.
//!
//! Thin delegation to the table-specific stores; [`DbError`]s are
//! flattened into [`StoreError`] at this boundary.
//!
//! [`DbError`]: crate::DbError

use chrono::{DateTime, Utc};
use leaderboard_core::{Board, ResultStore, StoreError};
use leaderboard_types::{
    BestScoreRecord, ChallengeRunRecord, MetricValue, RunRecord, Standing, UpsertOutcome,
};

use crate::board_queries::BoardQueries;
use crate::postgres::PostgresPool;
use crate::run_store::RunStore;
use crate::score_store::ScoreStore;

impl ResultStore for PostgresPool {
    async fn append_run(&self, board: &'static Board, run: &RunRecord) -> Result<(), StoreError> {
        Ok(RunStore::new(self.pool()).append_run(board, run).await?)
    }

    async fn append_challenge_run(&self, run: &ChallengeRunRecord) -> Result<(), StoreError> {
        Ok(RunStore::new(self.pool()).append_challenge_run(run).await?)
    }

    async fn top_players(
        &self,
        board: &'static Board,
        limit: usize,
    ) -> Result<Vec<Standing>, StoreError> {
        Ok(BoardQueries::new(self.pool(), board).top_players(limit).await?)
    }

    async fn player_best(
        &self,
        board: &'static Board,
        player_name: &str,
    ) -> Result<Option<MetricValue>, StoreError> {
        Ok(BoardQueries::new(self.pool(), board)
            .player_best(player_name)
            .await?)
    }

    async fn count_players_better(
        &self,
        board: &'static Board,
        value: MetricValue,
    ) -> Result<u64, StoreError> {
        Ok(BoardQueries::new(self.pool(), board)
            .count_players_better(value)
            .await?)
    }

    async fn upsert_best_score(
        &self,
        player_name: &str,
        score: i64,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        Ok(ScoreStore::new(self.pool())
            .upsert_if_better(player_name, score, now)
            .await?)
    }

    async fn best_score(&self, player_name: &str) -> Result<Option<BestScoreRecord>, StoreError> {
        Ok(ScoreStore::new(self.pool()).get(player_name).await?)
    }
}
