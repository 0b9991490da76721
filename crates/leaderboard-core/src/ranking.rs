//! The ranking engine.
//!
//! All three leaderboard queries are defined over the same population: one
//! best value per distinct player. A player with 500 runs counts once, both
//! in the top-N list and when computing someone's rank.
//!
//! The pure functions here operate on raw `(player, value)` samples and
//! back the in-memory store. [`leaderboard`] is the store-agnostic entry
//! point the HTTP layer calls.

use std::collections::BTreeMap;

use leaderboard_types::{Leaderboard, MetricValue, PlayerRank, Standing};

use crate::board::{Board, Direction};
use crate::store::{ResultStore, StoreError};

/// Number of rows in a leaderboard response.
pub const TOP_N: usize = 10;

/// Collapse raw samples into one best value per player.
///
/// The result is sorted favorable first. Ties keep player names in
/// ascending order.
pub fn best_per_player<'a, I>(samples: I, direction: Direction) -> Vec<Standing>
where
    I: IntoIterator<Item = (&'a str, MetricValue)>,
{
    let mut best: BTreeMap<&'a str, MetricValue> = BTreeMap::new();
    for (player, value) in samples {
        best.entry(player)
            .and_modify(|current| *current = direction.best(*current, value))
            .or_insert(value);
    }

    let mut standings: Vec<Standing> = best
        .into_iter()
        .map(|(player_name, best_value)| Standing {
            player_name: player_name.to_owned(),
            best_value,
        })
        .collect();
    // Stable sort keeps the name order from the BTreeMap among ties.
    standings.sort_by(|a, b| direction.favorable_cmp(a.best_value, b.best_value));
    standings
}

/// The first `n` rows of an already sorted standings list.
pub fn top_n(standings: &[Standing], n: usize) -> Vec<Standing> {
    standings.iter().take(n).cloned().collect()
}

/// Number of players whose best value strictly beats `value`.
pub fn count_better(standings: &[Standing], direction: Direction, value: MetricValue) -> u64 {
    let count = standings
        .iter()
        .filter(|s| direction.beats(s.best_value, value))
        .count();
    u64::try_from(count).unwrap_or(u64::MAX)
}

/// Rank of `player_name` within `standings`, or `None` if absent.
pub fn rank_of(standings: &[Standing], direction: Direction, player_name: &str) -> Option<PlayerRank> {
    let own = standings.iter().find(|s| s.player_name == player_name)?;
    Some(PlayerRank {
        rank: rank_from_better_count(count_better(standings, direction, own.best_value)),
        best_value: own.best_value,
    })
}

/// A 1-based rank from the number of players ahead.
pub const fn rank_from_better_count(better: u64) -> u64 {
    better.saturating_add(1)
}

/// Compute the leaderboard for `board`, and the named player's rank.
///
/// An empty `player_name` is treated as no player. A player without any
/// runs gets no rank; a best value of zero is still a rank.
///
/// # Errors
///
/// Propagates any [`StoreError`] from the underlying queries.
pub async fn leaderboard<S>(
    store: &S,
    board: &'static Board,
    player_name: Option<&str>,
) -> Result<Leaderboard, StoreError>
where
    S: ResultStore + ?Sized,
{
    let top = store.top_players(board, TOP_N).await?;

    let player_rank = match player_name.filter(|name| !name.is_empty()) {
        Some(name) => match store.player_best(board, name).await? {
            Some(best_value) => {
                let better = store.count_players_better(board, best_value).await?;
                Some(PlayerRank {
                    rank: rank_from_better_count(better),
                    best_value,
                })
            }
            None => None,
        },
        None => None,
    };

    tracing::debug!(
        table = board.table,
        rows = top.len(),
        ranked = player_rank.is_some(),
        "Computed leaderboard"
    );

    Ok(Leaderboard { top, player_rank })
}
