//! Ranking results and write outcomes.
//!
//! A leaderboard is always computed over the best value per player, so
//! every row here refers to a distinct player name.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A metric value as stored in a ranked table.
///
/// Timed games rank by integer milliseconds, the flow challenge by a
/// floating-point ratio. Serializes as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Completion time in milliseconds.
    Millis(i64),
    /// Dimensionless ratio (e.g. average flow ratio).
    Ratio(f64),
}

impl MetricValue {
    /// The value widened to `f64`.
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Millis(ms) => ms as f64,
            Self::Ratio(r) => r,
        }
    }

    /// Total ordering of two values, ascending.
    ///
    /// Values of the same kind compare exactly. Stores reject a value of
    /// the wrong kind for a board, so mixed kinds only meet outside a
    /// board; they compare by their `f64` widening to keep the order total.
    pub fn total_cmp(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Millis(a), Self::Millis(b)) => a.cmp(&b),
            (Self::Ratio(a), Self::Ratio(b)) => a.total_cmp(&b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl core::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{ms}ms"),
            Self::Ratio(r) => write!(f, "{r}"),
        }
    }
}

/// One leaderboard row: a player and their best value.
///
/// Internal to the ranking pipeline. The HTTP layer renders it with
/// board-specific field names (`best_time`, `best_score`), so it has no
/// `TypeScript` binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Player name.
    pub player_name: String,
    /// Most favorable value across all of the player's runs.
    pub best_value: MetricValue,
}

/// Position of one player in the full deduplicated ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerRank {
    /// 1-based rank; players with equal best values share a rank.
    pub rank: u64,
    /// The player's best value.
    pub best_value: MetricValue,
}

/// The result of a ranking request for one board.
///
/// Rendered on the wire as `{top10, userRank}` by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Top players, favorable first, one row per player.
    pub top: Vec<Standing>,
    /// Rank of the requesting player, when one was named and has runs.
    pub player_rank: Option<PlayerRank>,
}

/// Outcome of an upsert-if-better write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum UpsertOutcome {
    /// No record existed; one was inserted.
    Created,
    /// The new score beat the stored one and replaced it.
    Updated,
    /// The new score did not beat the stored one; nothing changed.
    Unchanged,
}
