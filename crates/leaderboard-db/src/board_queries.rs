//! Per-board aggregate queries.
//!
//! One set of SQL templates serves every ranked game. The board supplies
//! the table, the metric column and the direction; the direction picks the
//! aggregate (`MIN`/`MAX`), the sort order and the "beats" comparison.

use leaderboard_core::{Board, Direction, MetricKind};
use leaderboard_types::{MetricValue, Standing};
use sqlx::PgPool;

use crate::error::DbError;

/// Aggregate picking a player's best value.
const fn aggregate(direction: Direction) -> &'static str {
    match direction {
        Direction::LowerIsBetter => "MIN",
        Direction::HigherIsBetter => "MAX",
    }
}

/// Sort order putting the best values first.
const fn order(direction: Direction) -> &'static str {
    match direction {
        Direction::LowerIsBetter => "ASC",
        Direction::HigherIsBetter => "DESC",
    }
}

/// Comparison `best <op> $1` meaning "strictly beats".
const fn beats(direction: Direction) -> &'static str {
    match direction {
        Direction::LowerIsBetter => "<",
        Direction::HigherIsBetter => ">",
    }
}

/// Ranking reads against one board's table.
pub struct BoardQueries<'a> {
    pool: &'a PgPool,
    board: &'static Board,
}

impl<'a> BoardQueries<'a> {
    /// Create a query set for `board`.
    pub const fn new(pool: &'a PgPool, board: &'static Board) -> Self {
        Self { pool, board }
    }

    /// SQL for the best value per player, favorable first.
    fn top_sql(board: &Board) -> String {
        format!(
            "SELECT player_name, {agg}({col}) AS best_value
             FROM {table}
             GROUP BY player_name
             ORDER BY best_value {ord}, player_name ASC
             LIMIT $1",
            agg = aggregate(board.direction),
            col = board.metric_column,
            table = board.table,
            ord = order(board.direction),
        )
    }

    /// SQL for one player's best value. `NULL` when they have no runs.
    fn player_best_sql(board: &Board) -> String {
        format!(
            "SELECT {agg}({col}) FROM {table} WHERE player_name = $1",
            agg = aggregate(board.direction),
            col = board.metric_column,
            table = board.table,
        )
    }

    /// SQL counting distinct players whose best value beats `$1`.
    fn count_better_sql(board: &Board) -> String {
        format!(
            "SELECT COUNT(*) FROM (
                 SELECT {agg}({col}) AS best_value FROM {table} GROUP BY player_name
             ) AS per_player
             WHERE best_value {op} $1",
            agg = aggregate(board.direction),
            col = board.metric_column,
            table = board.table,
            op = beats(board.direction),
        )
    }

    /// Top `limit` players by best value.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn top_players(&self, limit: usize) -> Result<Vec<Standing>, DbError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sql = Self::top_sql(self.board);

        let standings = match self.board.kind {
            MetricKind::Millis => sqlx::query_as::<_, (String, i64)>(&sql)
                .bind(limit)
                .fetch_all(self.pool)
                .await?
                .into_iter()
                .map(|(player_name, ms)| Standing {
                    player_name,
                    best_value: MetricValue::Millis(ms),
                })
                .collect(),
            MetricKind::Ratio => sqlx::query_as::<_, (String, f64)>(&sql)
                .bind(limit)
                .fetch_all(self.pool)
                .await?
                .into_iter()
                .map(|(player_name, ratio)| Standing {
                    player_name,
                    best_value: MetricValue::Ratio(ratio),
                })
                .collect(),
        };

        Ok(standings)
    }

    /// A player's best value, or `None` if they have no runs.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn player_best(&self, player_name: &str) -> Result<Option<MetricValue>, DbError> {
        let sql = Self::player_best_sql(self.board);

        let best = match self.board.kind {
            MetricKind::Millis => sqlx::query_scalar::<_, Option<i64>>(&sql)
                .bind(player_name)
                .fetch_one(self.pool)
                .await?
                .map(MetricValue::Millis),
            MetricKind::Ratio => sqlx::query_scalar::<_, Option<f64>>(&sql)
                .bind(player_name)
                .fetch_one(self.pool)
                .await?
                .map(MetricValue::Ratio),
        };

        Ok(best)
    }

    /// Number of distinct players whose best value strictly beats `value`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::WrongBoard`] if `value` is not of the board's
    /// metric kind, and [`DbError::Postgres`] if the query fails.
    pub async fn count_players_better(&self, value: MetricValue) -> Result<u64, DbError> {
        let sql = Self::count_better_sql(self.board);
        let query = sqlx::query_scalar::<_, i64>(&sql);

        // Bind in the column's own type.
        let query = match (self.board.kind, value) {
            (MetricKind::Millis, MetricValue::Millis(ms)) => query.bind(ms),
            (MetricKind::Ratio, MetricValue::Ratio(ratio)) => query.bind(ratio),
            _ => return Err(DbError::WrongBoard(self.board.table)),
        };

        let count = query.fetch_one(self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
