//! Shared type definitions for the minigames leaderboard.
//!
//! Every crate in the workspace speaks in these types: the store layer
//! persists them, the ranking engine produces them and the HTTP layer
//! renders them. Types flow downstream to `TypeScript` via `ts-rs` so the
//! game front-ends can consume the same shapes.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for record identifiers
//! - [`records`] -- Persisted run and best-score records
//! - [`standings`] -- Metric values, leaderboard rows and upsert outcomes

pub mod ids;
pub mod records;
pub mod standings;

// Re-export all public types at crate root for convenience.
pub use ids::RunId;
pub use records::{BestScoreRecord, ChallengeRunRecord, RunRecord};
pub use standings::{Leaderboard, MetricValue, PlayerRank, Standing, UpsertOutcome};
