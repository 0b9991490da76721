//! HTTP API for the minigames leaderboard.
//!
//! This crate provides an Axum server that exposes, per game:
//!
//! - **`GET`** ranking endpoints returning the top 10 players and,
//!   optionally, the requesting player's rank
//! - **`POST`** submission endpoints that validate a run and append it
//!   (or, for River Guardian, upsert the player's high score)
//!
//! Every response carries permissive CORS headers so the browser games
//! can call the API from any origin.
//!
//! # Architecture
//!
//! Handlers are generic over a [`ResultStore`](leaderboard_core::ResultStore).
//! The router holds nothing but the store handle; each request is an
//! independent unit of work against it.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
