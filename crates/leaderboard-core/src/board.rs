//! Board descriptors: which table, metric and direction each game ranks by.
//!
//! The four rankable games share one ranking algorithm. A [`Board`] is the
//! parameter set that instantiates it: the table holding the runs, the
//! metric column, whether lower or higher values win, and the JSON labels
//! the front-end expects. River Guardian keeps one high score per player
//! and has no board.

use core::cmp::Ordering;

use leaderboard_types::MetricValue;

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Smaller values rank first (completion times).
    LowerIsBetter,
    /// Larger values rank first (flow ratios, scores).
    HigherIsBetter,
}

impl Direction {
    /// Compare two values by favorability.
    ///
    /// Returns [`Ordering::Less`] when `a` ranks ahead of `b`.
    pub fn favorable_cmp(self, a: MetricValue, b: MetricValue) -> Ordering {
        match self {
            Self::LowerIsBetter => a.total_cmp(b),
            Self::HigherIsBetter => b.total_cmp(a),
        }
    }

    /// Whether `a` is strictly more favorable than `b`.
    pub fn beats(self, a: MetricValue, b: MetricValue) -> bool {
        self.favorable_cmp(a, b) == Ordering::Less
    }

    /// The more favorable of two values.
    pub fn best(self, a: MetricValue, b: MetricValue) -> MetricValue {
        if self.beats(b, a) { b } else { a }
    }
}

/// Storage type of a board's metric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// `BIGINT` milliseconds.
    Millis,
    /// `DOUBLE PRECISION` ratio.
    Ratio,
}

impl MetricKind {
    /// Whether `value` is stored in a column of this kind.
    pub const fn accepts(self, value: MetricValue) -> bool {
        matches!(
            (self, value),
            (Self::Millis, MetricValue::Millis(_)) | (Self::Ratio, MetricValue::Ratio(_))
        )
    }
}

/// The minigames served by the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    /// Duck race, a timed course.
    DuckRace,
    /// Vortex, a timed course.
    VortexGame,
    /// Generic timed game without its own table.
    Scores,
    /// Reynolds flow challenge, ranked by average flow ratio.
    ReynoldsChallenge,
    /// River Guardian, one high score per player.
    RiverGuardian,
}

impl Game {
    /// Every game, in route order.
    pub const ALL: [Self; 5] = [
        Self::DuckRace,
        Self::VortexGame,
        Self::Scores,
        Self::ReynoldsChallenge,
        Self::RiverGuardian,
    ];

    /// HTTP path the game is served on.
    pub const fn path(self) -> &'static str {
        match self {
            Self::DuckRace => "/api/duck-race",
            Self::VortexGame => "/api/vortex-game",
            Self::Scores => "/api/scores",
            Self::ReynoldsChallenge => "/api/reynolds-challenge",
            Self::RiverGuardian => "/api/river-guardian",
        }
    }

    /// The game's ranking board, if it has a leaderboard.
    pub const fn board(self) -> Option<&'static Board> {
        match self {
            Self::DuckRace => Some(&DUCK_RACE),
            Self::VortexGame => Some(&VORTEX_GAME),
            Self::Scores => Some(&SCORES),
            Self::ReynoldsChallenge => Some(&REYNOLDS_CHALLENGE),
            Self::RiverGuardian => None,
        }
    }
}

/// Parameters for one instance of the ranking algorithm.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Board {
    /// The game this board ranks.
    pub game: Game,
    /// Table holding the game's runs.
    pub table: &'static str,
    /// Column the runs are ranked by.
    pub metric_column: &'static str,
    /// Storage type of [`metric_column`](Self::metric_column).
    pub kind: MetricKind,
    /// Which way the metric improves.
    pub direction: Direction,
    /// JSON key of the best value in a `top10` row.
    pub best_label: &'static str,
    /// JSON key of the best value in `userRank`.
    pub rank_label: &'static str,
}

impl Board {
    /// Whether the board ranks plain timed runs (as opposed to challenge runs).
    pub const fn is_timed(&self) -> bool {
        matches!(self.kind, MetricKind::Millis)
    }
}

/// Duck race: fastest completion time wins.
pub static DUCK_RACE: Board = Board {
    game: Game::DuckRace,
    table: "duck_race",
    metric_column: "completion_time_ms",
    kind: MetricKind::Millis,
    direction: Direction::LowerIsBetter,
    best_label: "best_time",
    rank_label: "time",
};

/// Vortex: fastest completion time wins.
pub static VORTEX_GAME: Board = Board {
    game: Game::VortexGame,
    table: "vortex_game",
    metric_column: "completion_time_ms",
    kind: MetricKind::Millis,
    direction: Direction::LowerIsBetter,
    best_label: "best_time",
    rank_label: "time",
};

/// Generic timed game: fastest completion time wins.
pub static SCORES: Board = Board {
    game: Game::Scores,
    table: "scores",
    metric_column: "completion_time_ms",
    kind: MetricKind::Millis,
    direction: Direction::LowerIsBetter,
    best_label: "best_time",
    rank_label: "time",
};

/// Reynolds challenge: highest average flow ratio wins.
pub static REYNOLDS_CHALLENGE: Board = Board {
    game: Game::ReynoldsChallenge,
    table: "reynolds_challenge",
    metric_column: "flow_ratio_avg",
    kind: MetricKind::Ratio,
    direction: Direction::HigherIsBetter,
    best_label: "best_score",
    rank_label: "score",
};

/// Timed boards, which all accept plain run submissions.
pub static TIMED_BOARDS: [&Board; 3] = [&DUCK_RACE, &VORTEX_GAME, &SCORES];

/// Table holding River Guardian high scores.
pub const RIVER_GUARDIAN_TABLE: &str = "river_guardian_scores";
