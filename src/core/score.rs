use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::modes::Variant;

/// Hit counts and play details carried alongside a score. Never interpreted
/// by the leaderboard itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub max_combo: u32,
    pub count_300: u32,
    pub count_100: u32,
    pub count_50: u32,
    #[serde(default)]
    pub count_geki: u32,
    #[serde(default)]
    pub count_katu: u32,
    pub misses: u32,
    pub full_combo: bool,
    pub mods: u32,
    pub timestamp: DateTime<Utc>,
}

/// One row as returned by a `ScoreStore`, mapped by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub score_id: u64,
    pub user_id: u64,
    pub username: String,
    pub score: u64,
    pub pp: f32,
    #[serde(flatten)]
    pub statistics: ScoreStatistics,
}

/// Snapshot of the ranking relevant fields of one submitted score.
/// Replaced, never mutated, when the user submits a better one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub score_id: u64,
    pub user_id: u64,
    pub username: String,
    pub score: u64,
    pub pp: f32,
    pub statistics: ScoreStatistics,
}

impl ScoreRecord {
    /// Value the leaderboard is ordered by under the given variant.
    pub fn ranking_value(&self, variant: Variant) -> f64 {
        if variant.uses_ppboard() {
            f64::from(self.pp)
        } else {
            self.score as f64
        }
    }
}

impl From<ScoreRow> for ScoreRecord {
    fn from(row: ScoreRow) -> Self {
        ScoreRecord {
            score_id: row.score_id,
            user_id: row.user_id,
            username: row.username,
            score: row.score,
            pp: row.pp,
            statistics: row.statistics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_deserializes_with_flattened_statistics() {
        let json = r#"{
            "score_id": 7,
            "user_id": 1000,
            "username": "cookiezi",
            "score": 12345678,
            "pp": 727.5,
            "max_combo": 1200,
            "count_300": 900,
            "count_100": 12,
            "count_50": 0,
            "misses": 1,
            "full_combo": false,
            "mods": 8,
            "timestamp": "2023-01-01T00:00:00Z"
        }"#;
        let row: ScoreRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.statistics.count_geki, 0);

        let record = ScoreRecord::from(row);
        assert_eq!(record.ranking_value(Variant::Vanilla), 12345678.0);
        assert_eq!(record.ranking_value(Variant::Relax), 727.5);
    }
}
