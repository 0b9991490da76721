//! Shared application state for the API server.
//!
//! [`AppState`] holds the store handle and nothing else that changes.
//! All leaderboard data lives in the store.

use leaderboard_core::StoreError;

use crate::error::ApiError;

/// Message shown instead of store errors when they are not exposed.
const OPAQUE_STORE_ERROR: &str = "internal error";

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug, Clone)]
pub struct AppState<S> {
    /// The result store every handler reads from and writes to.
    pub store: S,
    /// Whether 500 responses carry the store's own error text.
    pub expose_store_errors: bool,
}

impl<S> AppState<S> {
    /// Create state around a store. Store errors are exposed to callers.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            expose_store_errors: true,
        }
    }

    /// Set whether store error text reaches callers.
    #[must_use]
    pub const fn with_exposed_store_errors(mut self, expose: bool) -> Self {
        self.expose_store_errors = expose;
        self
    }

    /// Log a store failure and turn it into the response error.
    pub fn store_failure(&self, err: &StoreError) -> ApiError {
        tracing::error!(error = %err, "Result store operation failed");
        if self.expose_store_errors {
            ApiError::Store(err.to_string())
        } else {
            ApiError::Store(OPAQUE_STORE_ERROR.to_owned())
        }
    }
}
