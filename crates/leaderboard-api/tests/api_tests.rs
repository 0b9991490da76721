//! Integration tests for the leaderboard API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` against
//! an in-memory store, without starting a TCP server.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, Utc};
use leaderboard_api::router::build_router;
use leaderboard_api::state::AppState;
use leaderboard_core::board::{DUCK_RACE, SCORES, VORTEX_GAME};
use leaderboard_core::{Board, MemoryStore, ResultStore, StoreError};
use leaderboard_types::{
    BestScoreRecord, ChallengeRunRecord, MetricValue, RunRecord, Standing, UpsertOutcome,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn make_app() -> (MemoryStore, Router) {
    let store = MemoryStore::new();
    let router = build_router(Arc::new(AppState::new(store.clone())));
    (store, router)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, String::from_utf8(bytes).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn submit_time(app: &Router, path: &str, player: &str, ms: i64) {
    let (status, body) = post_json(
        app,
        path,
        json!({ "player_name": player, "completion_time_ms": ms }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "Score added");
}

fn challenge(player: &str, flow: f64) -> Value {
    json!({
        "player_name": player,
        "completion_time_ms": 90_000,
        "peak_velocity": 3.2,
        "flow_ratio_avg": flow,
        "flow_ratio_3": 0.4,
        "flow_ratio_4": 0.5,
        "flow_ratio_5": 0.6,
        "language": "en"
    })
}

// =========================================================================
// Timed games
// =========================================================================

#[tokio::test]
async fn duck_race_best_time_per_player() {
    let (_store, app) = make_app();
    submit_time(&app, "/api/duck-race", "Ann", 1500).await;
    submit_time(&app, "/api/duck-race", "Ann", 1200).await;

    let request = Request::builder()
        .uri("/api/duck-race?playerName=Ann")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let (status, body) = get_json(&app, "/api/duck-race?playerName=Ann").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "top10": [{ "player_name": "Ann", "best_time": 1200 }],
            "userRank": { "rank": 1, "time": 1200 }
        })
    );
}

#[tokio::test]
async fn ranking_counts_distinct_better_players() {
    let (_store, app) = make_app();
    submit_time(&app, "/api/vortex-game", "Ann", 3000).await;
    submit_time(&app, "/api/vortex-game", "Bob", 1000).await;
    submit_time(&app, "/api/vortex-game", "Bob", 1100).await;
    submit_time(&app, "/api/vortex-game", "Cyd", 2000).await;

    let (_, body) = get_json(&app, "/api/vortex-game?playerName=Ann").await;
    let names: Vec<&str> = body["top10"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["player_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Bob", "Cyd", "Ann"]);
    assert_eq!(body["userRank"], json!({ "rank": 3, "time": 3000 }));
}

#[tokio::test]
async fn top10_is_capped() {
    let (_store, app) = make_app();
    for i in 0..12 {
        submit_time(&app, "/api/scores", &format!("p{i:02}"), 1000 + i).await;
    }

    let (_, body) = get_json(&app, "/api/scores?playerName=p11").await;
    assert_eq!(body["top10"].as_array().unwrap().len(), 10);
    assert_eq!(body["userRank"], json!({ "rank": 12, "time": 1011 }));
}

#[tokio::test]
async fn user_rank_is_null_without_a_known_player() {
    let (_store, app) = make_app();
    submit_time(&app, "/api/duck-race", "Ann", 1200).await;

    for uri in [
        "/api/duck-race",
        "/api/duck-race?playerName=",
        "/api/duck-race?playerName=Nobody",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userRank"], Value::Null, "{uri}");
        assert_eq!(body["top10"].as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn repeated_player_name_uses_the_first() {
    let (_store, app) = make_app();
    submit_time(&app, "/api/duck-race", "a", 1500).await;
    submit_time(&app, "/api/duck-race", "b", 1000).await;

    let (status, body) = get_json(&app, "/api/duck-race?playerName=a&playerName=b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userRank"], json!({ "rank": 2, "time": 1500 }));
}

#[tokio::test]
async fn unrelated_query_keys_are_ignored() {
    let (_store, app) = make_app();
    submit_time(&app, "/api/duck-race", "a", 1500).await;

    let (status, body) = get_json(&app, "/api/duck-race?player=a&playerName=a&x=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userRank"], json!({ "rank": 1, "time": 1500 }));
}

#[tokio::test]
async fn zero_time_is_ranked() {
    let (_store, app) = make_app();
    submit_time(&app, "/api/duck-race", "Ann", 0).await;

    let (_, body) = get_json(&app, "/api/duck-race?playerName=Ann").await;
    assert_eq!(body["userRank"], json!({ "rank": 1, "time": 0 }));
}

#[tokio::test]
async fn empty_board_has_empty_top10() {
    let (_store, app) = make_app();
    let (status, body) = get_json(&app, "/api/vortex-game").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "top10": [], "userRank": null }));
}

#[tokio::test]
async fn timed_boards_are_isolated() {
    let (store, app) = make_app();
    submit_time(&app, "/api/duck-race", "Ann", 1200).await;

    assert_eq!(store.runs(&DUCK_RACE).await.len(), 1);
    assert!(store.runs(&VORTEX_GAME).await.is_empty());
    assert!(store.runs(&SCORES).await.is_empty());
}

#[tokio::test]
async fn invalid_runs_are_rejected_and_not_stored() {
    let (store, app) = make_app();
    let bad = [
        json!({ "completion_time_ms": 1200 }),
        json!({ "player_name": "", "completion_time_ms": 1200 }),
        json!({ "player_name": "Ann", "completion_time_ms": -5 }),
        json!({ "player_name": "Ann", "completion_time_ms": "fast" }),
        json!({ "player_name": "Ann" }),
    ];
    for body in bad {
        let (status, text) = post_json(&app, "/api/duck-race", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Invalid data");
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/duck-race")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(store.runs(&DUCK_RACE).await.is_empty());
}

#[tokio::test]
async fn language_is_optional_and_stored() {
    let (store, app) = make_app();
    let (status, _) = post_json(
        &app,
        "/api/duck-race",
        json!({ "player_name": "Ann", "completion_time_ms": 1200, "language": "fr" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let runs = store.runs(&DUCK_RACE).await;
    assert_eq!(runs[0].language.as_deref(), Some("fr"));
}

// =========================================================================
// Reynolds challenge
// =========================================================================

#[tokio::test]
async fn reynolds_ranks_by_highest_flow_ratio() {
    let (_store, app) = make_app();
    for (player, flow) in [("Ann", 0.5), ("Ann", 0.8), ("Bob", 0.9)] {
        let (status, _) = post_json(&app, "/api/reynolds-challenge", challenge(player, flow)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get_json(&app, "/api/reynolds-challenge?playerName=Ann").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "top10": [
                { "player_name": "Bob", "best_score": 0.9 },
                { "player_name": "Ann", "best_score": 0.8 }
            ],
            "userRank": { "rank": 2, "score": 0.8 }
        })
    );
}

#[tokio::test]
async fn reynolds_rejects_non_numeric_ratio() {
    let (store, app) = make_app();
    let mut body = challenge("Ann", 0.5);
    body["flow_ratio_avg"] = json!("0.5");

    let (status, text) = post_json(&app, "/api/reynolds-challenge", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "Invalid data");
    assert!(store.challenge_runs().await.is_empty());
}

#[tokio::test]
async fn reynolds_requires_every_ratio() {
    let (store, app) = make_app();
    let mut body = challenge("Ann", 0.5);
    body.as_object_mut().unwrap().remove("flow_ratio_4");

    let (status, _) = post_json(&app, "/api/reynolds-challenge", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.challenge_runs().await.is_empty());
}

// =========================================================================
// River Guardian
// =========================================================================

#[tokio::test]
async fn river_guardian_keeps_the_higher_score() {
    let (store, app) = make_app();

    let (status, text) = post_json(
        &app,
        "/api/river-guardian",
        json!({ "player_name": "Bob", "score": 50 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(text, "Score added");

    let (status, text) = post_json(
        &app,
        "/api/river-guardian",
        json!({ "player_name": "Bob", "score": 30 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Score not updated: existing score is higher or equal");

    let (status, text) = post_json(
        &app,
        "/api/river-guardian",
        json!({ "player_name": "Bob", "score": 50 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Score not updated: existing score is higher or equal");

    assert_eq!(store.best_score("Bob").await.unwrap().unwrap().score, 50);

    let (status, text) = post_json(
        &app,
        "/api/river-guardian",
        json!({ "player_name": "Bob", "score": 75 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Score updated");
    assert_eq!(store.best_score("Bob").await.unwrap().unwrap().score, 75);
}

#[tokio::test]
async fn river_guardian_rejects_invalid_scores() {
    let (store, app) = make_app();
    for body in [
        json!({ "player_name": "Bob" }),
        json!({ "player_name": "", "score": 10 }),
        json!({ "player_name": "Bob", "score": "ten" }),
    ] {
        let (status, text) = post_json(&app, "/api/river-guardian", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Invalid data");
    }
    assert!(store.best_score("Bob").await.unwrap().is_none());
}

// =========================================================================
// Routing and CORS
// =========================================================================

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let (_store, app) = make_app();
    for (method, uri) in [
        (Method::GET, "/api/unknown"),
        (Method::GET, "/api/river-guardian"),
        (Method::POST, "/"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, b"Not Found.");
    }
}

#[tokio::test]
async fn options_is_answered_on_any_path() {
    let (_store, app) = make_app();
    for uri in ["/api/duck-race", "/api/unknown"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let (_store, app) = make_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/river-guardian")
        .header(header::ORIGIN, "https://games.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn errors_carry_cors_headers() {
    let (_store, app) = make_app();
    let request = Request::builder()
        .uri("/api/unknown")
        .header(header::ORIGIN, "https://games.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

// =========================================================================
// Store failures
// =========================================================================

/// A store whose every operation fails.
struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Backend(String::from("connection refused"))
}

impl ResultStore for BrokenStore {
    async fn append_run(&self, _board: &'static Board, _run: &RunRecord) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn append_challenge_run(&self, _run: &ChallengeRunRecord) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn top_players(
        &self,
        _board: &'static Board,
        _limit: usize,
    ) -> Result<Vec<Standing>, StoreError> {
        Err(broken())
    }

    async fn player_best(
        &self,
        _board: &'static Board,
        _player_name: &str,
    ) -> Result<Option<MetricValue>, StoreError> {
        Err(broken())
    }

    async fn count_players_better(
        &self,
        _board: &'static Board,
        _value: MetricValue,
    ) -> Result<u64, StoreError> {
        Err(broken())
    }

    async fn upsert_best_score(
        &self,
        _player_name: &str,
        _score: i64,
        _now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        Err(broken())
    }

    async fn best_score(&self, _player_name: &str) -> Result<Option<BestScoreRecord>, StoreError> {
        Err(broken())
    }
}

#[tokio::test]
async fn store_failure_is_a_json_500() {
    let app = build_router(Arc::new(AppState::new(BrokenStore)));

    let request = Request::builder()
        .uri("/api/duck-race")
        .header(header::ORIGIN, "https://games.example")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "connection refused" }));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/river-guardian")
        .body(Body::from(r#"{"player_name":"Bob","score":5}"#))
        .unwrap();
    let (status, bytes) = send(&app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "connection refused");
}

#[tokio::test]
async fn hidden_store_failure_is_opaque() {
    let state = AppState::new(BrokenStore).with_exposed_store_errors(false);
    let app = build_router(Arc::new(state));

    let (status, body) = get_json(&app, "/api/reynolds-challenge").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal error" }));
}

#[tokio::test]
async fn invalid_data_wins_over_store_failure() {
    let app = build_router(Arc::new(AppState::new(BrokenStore)));
    let (status, text) = post_json(&app, "/api/scores", json!({ "player_name": "Ann" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "Invalid data");
}
