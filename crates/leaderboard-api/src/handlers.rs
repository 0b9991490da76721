//! REST endpoint handlers.
//!
//! All handlers are generic over the [`ResultStore`] held in [`AppState`].
//! Submission bodies arrive as raw bytes and go through
//! [`submission::parse`], so a malformed body always yields the same 400
//! regardless of content type or which field was wrong.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/{game}` | Top 10 plus optional `userRank` (`?playerName=`) |
//! | `POST` | `/api/{game}` | Append a run (timed games, Reynolds challenge) |
//! | `POST` | `/api/river-guardian` | Upsert a high score if it is better |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use leaderboard_core::submission::{
    self, ChallengeSubmission, RunSubmission, ScoreSubmission, Validate,
};
use leaderboard_core::board::{REYNOLDS_CHALLENGE, RIVER_GUARDIAN_TABLE};
use leaderboard_core::{Board, ResultStore, SubmissionError, ranking};
use leaderboard_types::{Leaderboard, UpsertOutcome};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// Acknowledgement for a stored run or a first high score.
pub const SCORE_ADDED: &str = "Score added";

/// Acknowledgement for a high score that replaced the stored one.
pub const SCORE_UPDATED: &str = "Score updated";

/// Acknowledgement for a high score that did not beat the stored one.
pub const SCORE_NOT_UPDATED: &str = "Score not updated: existing score is higher or equal";

/// Query parameter naming the player whose rank is requested.
pub const PLAYER_NAME_PARAM: &str = "playerName";

/// Query parameters for the ranking endpoints.
///
/// Built from the raw key/value pairs: a repeated `playerName` keeps its
/// first value and unknown keys are ignored, so no query string can fail a
/// ranking request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingQuery {
    /// Player whose rank should be included.
    pub player_name: Option<String>,
}

impl RankingQuery {
    /// Pick the first `playerName` out of decoded query pairs.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let player_name = pairs
            .into_iter()
            .find(|(key, _)| key == PLAYER_NAME_PARAM)
            .map(|(_, value)| value);
        Self { player_name }
    }
}

// ---------------------------------------------------------------------------
// GET /api/{game}
// ---------------------------------------------------------------------------

/// Serve the leaderboard for `board`.
pub async fn get_ranking<S: ResultStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(pairs): Query<Vec<(String, String)>>,
    board: &'static Board,
) -> Result<Json<Value>, ApiError> {
    let query = RankingQuery::from_pairs(pairs);
    let leaderboard = ranking::leaderboard(&state.store, board, query.player_name.as_deref())
        .await
        .map_err(|e| state.store_failure(&e))?;

    Ok(Json(render_leaderboard(board, &leaderboard)))
}

/// Render a leaderboard in the shape the game front-ends read.
///
/// Field names depend on the board: timed games use `best_time`/`time`,
/// the flow challenge `best_score`/`score`.
pub fn render_leaderboard(board: &Board, leaderboard: &Leaderboard) -> Value {
    let top10: Vec<Value> = leaderboard
        .top
        .iter()
        .map(|standing| {
            let mut row = Map::new();
            row.insert(
                String::from("player_name"),
                Value::String(standing.player_name.clone()),
            );
            row.insert(board.best_label.to_owned(), metric_json(standing.best_value));
            Value::Object(row)
        })
        .collect();

    let user_rank = leaderboard.player_rank.map_or(Value::Null, |player_rank| {
        let mut row = Map::new();
        row.insert(String::from("rank"), Value::from(player_rank.rank));
        row.insert(board.rank_label.to_owned(), metric_json(player_rank.best_value));
        Value::Object(row)
    });

    let mut body = Map::new();
    body.insert(String::from("top10"), Value::Array(top10));
    body.insert(String::from("userRank"), user_rank);
    Value::Object(body)
}

fn metric_json(value: leaderboard_types::MetricValue) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ---------------------------------------------------------------------------
// POST /api/{game}
// ---------------------------------------------------------------------------

/// Append a timed run to `board`.
pub async fn post_run<S: ResultStore>(
    State(state): State<Arc<AppState<S>>>,
    board: &'static Board,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let submission: RunSubmission = parse_submission(board.table, &body)?;
    let record = submission.into_record(Utc::now());

    state
        .store
        .append_run(board, &record)
        .await
        .map_err(|e| state.store_failure(&e))?;

    tracing::debug!(table = board.table, run_id = %record.id, "Run accepted");
    Ok((StatusCode::CREATED, SCORE_ADDED))
}

/// Append a Reynolds challenge run.
pub async fn post_challenge_run<S: ResultStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let submission: ChallengeSubmission = parse_submission(REYNOLDS_CHALLENGE.table, &body)?;
    let record = submission.into_record(Utc::now());

    state
        .store
        .append_challenge_run(&record)
        .await
        .map_err(|e| state.store_failure(&e))?;

    tracing::debug!(run_id = %record.id, "Challenge run accepted");
    Ok((StatusCode::CREATED, SCORE_ADDED))
}

// ---------------------------------------------------------------------------
// POST /api/river-guardian
// ---------------------------------------------------------------------------

/// Record a River Guardian score if it beats the player's best.
///
/// `201` on first score, `200` with distinct bodies for updated and
/// not-updated.
pub async fn post_best_score<S: ResultStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let submission: ScoreSubmission = parse_submission(RIVER_GUARDIAN_TABLE, &body)?;

    let outcome = state
        .store
        .upsert_best_score(&submission.player_name, submission.score, Utc::now())
        .await
        .map_err(|e| state.store_failure(&e))?;

    Ok(match outcome {
        UpsertOutcome::Created => (StatusCode::CREATED, SCORE_ADDED),
        UpsertOutcome::Updated => (StatusCode::OK, SCORE_UPDATED),
        UpsertOutcome::Unchanged => (StatusCode::OK, SCORE_NOT_UPDATED),
    })
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// Answer unmatched paths and methods.
#[allow(clippy::unused_async)]
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn parse_submission<T>(table: &'static str, body: &[u8]) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned + Validate,
{
    submission::parse(body).map_err(|e: SubmissionError| {
        tracing::debug!(table, error = %e, "Rejected submission");
        ApiError::InvalidData
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn first_player_name_wins() {
        let query = RankingQuery::from_pairs(pairs(&[
            ("playerName", "ann"),
            ("playerName", "bob"),
        ]));
        assert_eq!(query.player_name.as_deref(), Some("ann"));
    }

    #[test]
    fn other_keys_are_ignored() {
        let query = RankingQuery::from_pairs(pairs(&[("player_name", "ann"), ("x", "1")]));
        assert_eq!(query, RankingQuery::default());
    }
}
