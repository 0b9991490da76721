//! Axum router construction for the leaderboard API.
//!
//! Routing is a static table: each timed game gets `GET` + `POST` on its
//! path, the Reynolds challenge gets its own `POST`, and River Guardian only
//! accepts `POST`. Anything else, including a known path with the wrong
//! method, is answered with 404.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, header};
use axum::routing::{MethodRouter, get, post};
use leaderboard_core::board::{REYNOLDS_CHALLENGE, TIMED_BOARDS};
use leaderboard_core::{Board, Game, ResultStore};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the leaderboard server.
///
/// The router includes:
/// - `GET|POST /api/duck-race`
/// - `GET|POST /api/vortex-game`
/// - `GET|POST /api/scores`
/// - `GET|POST /api/reynolds-challenge`
/// - `POST /api/river-guardian`
///
/// CORS allows any origin with `GET`, `POST` and `OPTIONS`. The CORS
/// layer answers every `OPTIONS` request itself, preflight or not, with an
/// empty 200, so no route needs an `OPTIONS` handler.
pub fn build_router<S: ResultStore>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut router = Router::new();
    for board in TIMED_BOARDS {
        router = router.route(
            board.game.path(),
            ranking_route::<S>(board).post(move |state: State<Arc<AppState<S>>>, body: Bytes| {
                handlers::post_run(state, board, body)
            }),
        );
    }

    router
        .route(
            REYNOLDS_CHALLENGE.game.path(),
            ranking_route::<S>(&REYNOLDS_CHALLENGE).post(handlers::post_challenge_run::<S>),
        )
        .route(
            Game::RiverGuardian.path(),
            post(handlers::post_best_score::<S>),
        )
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET` handler serving the leaderboard of `board`.
fn ranking_route<S: ResultStore>(board: &'static Board) -> MethodRouter<Arc<AppState<S>>> {
    get(
        move |state: State<Arc<AppState<S>>>, query: Query<Vec<(String, String)>>| {
            handlers::get_ranking(state, query, board)
        },
    )
}
