//! Ranking engine and game rules for the minigames leaderboard.
//!
//! This crate owns everything with actual semantics: which table and metric
//! each game ranks by, how a player's best value is derived, how top-N and
//! rank-of-player are computed over the deduplicated population, what a
//! valid submission looks like, and the contract a result store must meet.
//!
//! # Modules
//!
//! - [`board`] -- Per-game board descriptors and metric direction
//! - [`ranking`] -- Best-per-player aggregation, top-N and rank queries
//! - [`submission`] -- Request body parsing and validation
//! - [`store`] -- The [`ResultStore`] trait and [`StoreError`]
//! - [`memory`] -- In-process [`MemoryStore`]
//! - [`config`] -- YAML configuration loading

pub mod board;
pub mod config;
pub mod memory;
pub mod ranking;
pub mod store;
pub mod submission;

pub use board::{Board, Direction, Game, MetricKind};
pub use memory::MemoryStore;
pub use store::{ResultStore, StoreError};
pub use submission::SubmissionError;
