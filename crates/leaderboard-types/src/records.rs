//! Persisted records, one family per game variant.
//!
//! Run and challenge run records are immutable once written: the stores
//! only ever append them. A [`BestScoreRecord`] is the one mutable entity,
//! replaced in place when a player beats their own high score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::RunId;

/// A completed run of a timed game (duck race, vortex, generic scores).
///
/// Players may submit any number of runs; names are deduplicated only when
/// the leaderboard is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RunRecord {
    /// Record identifier.
    pub id: RunId,
    /// Free-text player name as submitted.
    pub player_name: String,
    /// Time taken to finish the run, in milliseconds.
    #[ts(type = "number")]
    pub completion_time_ms: i64,
    /// UI language the run was played in, if the client reported one.
    pub language: Option<String>,
    /// When the run was accepted.
    pub submitted_at: DateTime<Utc>,
}

/// A completed run of the Reynolds flow challenge.
///
/// Ranked by [`flow_ratio_avg`](Self::flow_ratio_avg), higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChallengeRunRecord {
    /// Record identifier.
    pub id: RunId,
    /// Free-text player name as submitted.
    pub player_name: String,
    /// Time taken to finish the run, in milliseconds.
    #[ts(type = "number")]
    pub completion_time_ms: i64,
    /// Highest flow velocity reached during the run.
    pub peak_velocity: f64,
    /// Average flow ratio across all stages.
    pub flow_ratio_avg: f64,
    /// Flow ratio measured at stage 3.
    pub flow_ratio_3: f64,
    /// Flow ratio measured at stage 4.
    pub flow_ratio_4: f64,
    /// Flow ratio measured at stage 5.
    pub flow_ratio_5: f64,
    /// UI language the run was played in, if the client reported one.
    pub language: Option<String>,
    /// When the run was accepted.
    pub submitted_at: DateTime<Utc>,
}

/// The single high-score row kept per player in River Guardian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BestScoreRecord {
    /// Player name, unique within the table.
    pub player_name: String,
    /// Highest score the player has submitted so far.
    #[ts(type = "number")]
    pub score: i64,
    /// When `score` last changed.
    pub last_updated: DateTime<Utc>,
}
