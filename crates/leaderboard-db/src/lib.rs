//! `PostgreSQL` result store for the minigames leaderboard.
//!
//! Each game owns one table. Timed and challenge runs are appended and
//! never touched again; ranking queries aggregate them per player on read.
//! River Guardian keeps a single row per player, replaced only by a
//! strictly higher score through one conditional statement.
//!
//! ```text
//! Ranking engine (leaderboard-core)
//!     |
//!     +-- ResultStore ---------> PostgresPool
//!         |-- RunStore         (append timed + challenge runs)
//!         |-- BoardQueries     (top-N, player best, players ahead)
//!         +-- ScoreStore       (upsert-if-better high scores)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration and migrations
//! - [`run_store`] -- Append-only run inserts
//! - [`board_queries`] -- Per-board aggregate queries
//! - [`score_store`] -- River Guardian high scores
//! - [`result_store`] -- [`ResultStore`](leaderboard_core::ResultStore) for [`PostgresPool`]
//! - [`error`] -- Shared error types

pub mod board_queries;
pub mod error;
pub mod postgres;
pub mod result_store;
pub mod run_store;
pub mod score_store;

// Re-export primary types for convenience.
pub use board_queries::BoardQueries;
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use run_store::RunStore;
pub use score_store::ScoreStore;
