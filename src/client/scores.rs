use async_trait::async_trait;
use std::fmt;

use crate::core::modes::{Completion, Mode, Variant, USER_PUBLIC_PRIVILEGE};
use crate::core::score::ScoreRow;
use crate::error::LbResult;

const SELECTED_COLUMNS: [&str; 15] = [
    "s.id AS score_id",
    "s.score",
    "s.pp",
    "s.max_combo",
    "s.50_count AS count_50",
    "s.100_count AS count_100",
    "s.300_count AS count_300",
    "s.misses_count AS misses",
    "s.katus_count AS count_katu",
    "s.gekis_count AS count_geki",
    "s.full_combo",
    "s.mods",
    "s.time AS timestamp",
    "a.username",
    "a.id AS user_id",
];

/// Parameters of the ranked best-scores query for one leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreQuery {
    pub map_md5: String,
    pub mode: Mode,
    pub variant: Variant,
}

impl ScoreQuery {
    pub fn new(map_md5: &str, mode: Mode, variant: Variant) -> Self {
        Self {
            map_md5: map_md5.to_string(),
            mode,
            variant,
        }
    }

    /// Query text with a single positional parameter for the map hash.
    /// Not limited: every qualifying score is returned so placements beyond
    /// the cached top can be answered.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }

    pub fn bind_args(&self) -> [&str; 1] {
        [self.map_md5.as_str()]
    }
}

impl fmt::Display for ScoreQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let conditions = [
            format!("a.privileges & {}", USER_PUBLIC_PRIVILEGE),
            "s.beatmap_md5 = %s".to_string(),
            format!("s.completed = {}", Completion::Best.as_id()),
            format!("s.play_mode = {}", self.mode.as_id()),
        ];
        write!(
            f,
            "SELECT {} FROM {} s INNER JOIN users a ON s.userid = a.id WHERE {} ORDER BY s.{} DESC",
            SELECTED_COLUMNS.join(", "),
            self.variant.db_table(),
            conditions.join(" AND "),
            self.variant.scoring_column(),
        )
    }
}

/// Executes the ranked score query against the backing database.
///
/// Rows must come back ordered descending by the variant's scoring column,
/// one best score per publicly visible user. Failures are reported as
/// `LeaderboardError::StoreUnavailable`.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn query_best_scores(&self, query: &ScoreQuery) -> LbResult<Vec<ScoreRow>>;
}
