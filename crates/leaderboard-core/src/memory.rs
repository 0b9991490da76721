//! In-process result store.
//!
//! [`MemoryStore`] keeps every table in memory behind a single
//! [`RwLock`]. Reads share the lock; appends and upserts take it
//! exclusively, which makes the read-compare-write of
//! [`upsert_best_score`](ResultStore::upsert_best_score) atomic. Used by
//! tests and for running the server without `PostgreSQL`.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use leaderboard_types::{
    BestScoreRecord, ChallengeRunRecord, MetricValue, RunRecord, Standing, UpsertOutcome,
};
use tokio::sync::RwLock;

use crate::board::Board;
use crate::ranking;
use crate::store::{ResultStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    /// Timed runs keyed by table name.
    runs: HashMap<&'static str, Vec<RunRecord>>,
    challenge_runs: Vec<ChallengeRunRecord>,
    best_scores: BTreeMap<String, BestScoreRecord>,
}

impl Tables {
    /// Raw `(player, metric)` samples for a board.
    fn samples(&self, board: &Board) -> Vec<(&str, MetricValue)> {
        if board.is_timed() {
            self.runs
                .get(board.table)
                .map(|runs| {
                    runs.iter()
                        .map(|r| (r.player_name.as_str(), MetricValue::Millis(r.completion_time_ms)))
                        .collect()
                })
                .unwrap_or_default()
        } else {
            self.challenge_runs
                .iter()
                .map(|r| (r.player_name.as_str(), MetricValue::Ratio(r.flow_ratio_avg)))
                .collect()
        }
    }

    fn standings(&self, board: &Board) -> Vec<Standing> {
        ranking::best_per_player(self.samples(board), board.direction)
    }
}

/// A [`ResultStore`] held entirely in memory.
///
/// Cloning is cheap and every clone shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All runs stored on a timed board, in insertion order.
    pub async fn runs(&self, board: &Board) -> Vec<RunRecord> {
        self.tables
            .read()
            .await
            .runs
            .get(board.table)
            .cloned()
            .unwrap_or_default()
    }

    /// All stored Reynolds challenge runs, in insertion order.
    pub async fn challenge_runs(&self) -> Vec<ChallengeRunRecord> {
        self.tables.read().await.challenge_runs.clone()
    }
}

impl ResultStore for MemoryStore {
    async fn append_run(&self, board: &'static Board, run: &RunRecord) -> Result<(), StoreError> {
        if !board.is_timed() {
            return Err(StoreError::WrongBoard { table: board.table });
        }
        self.tables
            .write()
            .await
            .runs
            .entry(board.table)
            .or_default()
            .push(run.clone());
        Ok(())
    }

    async fn append_challenge_run(&self, run: &ChallengeRunRecord) -> Result<(), StoreError> {
        self.tables.write().await.challenge_runs.push(run.clone());
        Ok(())
    }

    async fn top_players(
        &self,
        board: &'static Board,
        limit: usize,
    ) -> Result<Vec<Standing>, StoreError> {
        let tables = self.tables.read().await;
        Ok(ranking::top_n(&tables.standings(board), limit))
    }

    async fn player_best(
        &self,
        board: &'static Board,
        player_name: &str,
    ) -> Result<Option<MetricValue>, StoreError> {
        let tables = self.tables.read().await;
        let best = tables
            .samples(board)
            .into_iter()
            .filter(|(player, _)| *player == player_name)
            .map(|(_, value)| value)
            .reduce(|a, b| board.direction.best(a, b));
        Ok(best)
    }

    async fn count_players_better(
        &self,
        board: &'static Board,
        value: MetricValue,
    ) -> Result<u64, StoreError> {
        if !board.kind.accepts(value) {
            return Err(StoreError::WrongBoard { table: board.table });
        }
        let tables = self.tables.read().await;
        Ok(ranking::count_better(
            &tables.standings(board),
            board.direction,
            value,
        ))
    }

    async fn upsert_best_score(
        &self,
        player_name: &str,
        score: i64,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut tables = self.tables.write().await;
        let outcome = match tables.best_scores.entry(player_name.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(BestScoreRecord {
                    player_name: player_name.to_owned(),
                    score,
                    last_updated: now,
                });
                UpsertOutcome::Created
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if score > existing.score {
                    existing.score = score;
                    existing.last_updated = now;
                    UpsertOutcome::Updated
                } else {
                    UpsertOutcome::Unchanged
                }
            }
        };
        Ok(outcome)
    }

    async fn best_score(&self, player_name: &str) -> Result<Option<BestScoreRecord>, StoreError> {
        Ok(self.tables.read().await.best_scores.get(player_name).cloned())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use chrono::Duration;
    use leaderboard_types::RunId;

    use super::*;
    use crate::board::{DUCK_RACE, REYNOLDS_CHALLENGE, VORTEX_GAME};

    fn run(player: &str, ms: i64) -> RunRecord {
        RunRecord {
            id: RunId::new(),
            player_name: player.to_owned(),
            completion_time_ms: ms,
            language: None,
            submitted_at: Utc::now(),
        }
    }

    fn challenge(player: &str, avg: f64) -> ChallengeRunRecord {
        ChallengeRunRecord {
            id: RunId::new(),
            player_name: player.to_owned(),
            completion_time_ms: 30_000,
            peak_velocity: 3.2,
            flow_ratio_avg: avg,
            flow_ratio_3: avg,
            flow_ratio_4: avg,
            flow_ratio_5: avg,
            language: Some(String::from("en")),
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn appends_never_touch_earlier_runs() {
        let store = MemoryStore::new();
        let first = run("ann", 1500);
        store.append_run(&DUCK_RACE, &first).await.unwrap();
        let before = store.runs(&DUCK_RACE).await;

        store.append_run(&DUCK_RACE, &run("ann", 900)).await.unwrap();
        store.append_run(&DUCK_RACE, &run("bob", 700)).await.unwrap();

        let after = store.runs(&DUCK_RACE).await;
        assert_eq!(after.len(), 3);
        assert_eq!(after[..before.len()], before[..]);
        assert_eq!(after[0], first);
    }

    #[tokio::test]
    async fn boards_do_not_share_tables() {
        let store = MemoryStore::new();
        store.append_run(&DUCK_RACE, &run("ann", 1500)).await.unwrap();
        let vortex = store.top_players(&VORTEX_GAME, 10).await.unwrap();
        assert!(vortex.is_empty());
    }

    #[tokio::test]
    async fn challenge_runs_rejected_on_timed_path() {
        let store = MemoryStore::new();
        let result = store.append_run(&REYNOLDS_CHALLENGE, &run("ann", 1)).await;
        assert!(matches!(result, Err(StoreError::WrongBoard { .. })));
    }

    #[tokio::test]
    async fn count_rejects_value_of_the_wrong_kind() {
        let store = MemoryStore::new();
        store.append_run(&DUCK_RACE, &run("ann", 1500)).await.unwrap();
        let result = store
            .count_players_better(&DUCK_RACE, MetricValue::Ratio(12.9))
            .await;
        assert!(matches!(result, Err(StoreError::WrongBoard { table: "duck_race" })));
    }

    #[tokio::test]
    async fn flow_board_ranks_highest_average_first() {
        let store = MemoryStore::new();
        store.append_challenge_run(&challenge("ann", 0.6)).await.unwrap();
        store.append_challenge_run(&challenge("bob", 0.9)).await.unwrap();
        store.append_challenge_run(&challenge("ann", 0.95)).await.unwrap();

        let top = store.top_players(&REYNOLDS_CHALLENGE, 10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player_name, "ann");

        let best = store.player_best(&REYNOLDS_CHALLENGE, "bob").await.unwrap();
        assert_eq!(best, Some(MetricValue::Ratio(0.9)));
        let ahead = store
            .count_players_better(&REYNOLDS_CHALLENGE, MetricValue::Ratio(0.9))
            .await
            .unwrap();
        assert_eq!(ahead, 1);
    }

    #[tokio::test]
    async fn upsert_keeps_the_maximum() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        let t1 = t0 + Duration::seconds(1);
        let t2 = t0 + Duration::seconds(2);

        assert_eq!(
            store.upsert_best_score("bob", 50, t0).await.unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            store.upsert_best_score("bob", 30, t1).await.unwrap(),
            UpsertOutcome::Unchanged
        );
        assert_eq!(
            store.upsert_best_score("bob", 50, t1).await.unwrap(),
            UpsertOutcome::Unchanged
        );

        let stored = store.best_score("bob").await.unwrap().unwrap();
        assert_eq!(stored.score, 50);
        assert_eq!(stored.last_updated, t0);

        assert_eq!(
            store.upsert_best_score("bob", 80, t2).await.unwrap(),
            UpsertOutcome::Updated
        );
        let stored = store.best_score("bob").await.unwrap().unwrap();
        assert_eq!(stored.score, 80);
        assert_eq!(stored.last_updated, t2);
    }

    #[tokio::test]
    async fn concurrent_upserts_converge_to_maximum() {
        for _ in 0..50 {
            let store = MemoryStore::new();
            let handles: Vec<_> = [10, 20, 15]
                .into_iter()
                .map(|score| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        store.upsert_best_score("kim", score, Utc::now()).await
                    })
                })
                .collect();

            let mut created = 0;
            for handle in handles {
                if handle.await.unwrap().unwrap() == UpsertOutcome::Created {
                    created += 1;
                }
            }

            assert_eq!(created, 1);
            let stored = store.best_score("kim").await.unwrap().unwrap();
            assert_eq!(stored.score, 20);
        }
    }
}
