use async_trait::async_trait;
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::client::metadata::{MapMetadata, MapSource};
use crate::client::scores::{ScoreQuery, ScoreStore};
use crate::core::modes::{Mode, Variant};
use crate::core::score::ScoreRow;
use crate::error::LbResult;

// Layout of the JSON dump read by `FileBackend`.
#[derive(Debug, Deserialize)]
struct Dump {
    maps: Vec<MapMetadata>,
    #[serde(default)]
    scores: Vec<DumpedScore>,
}

#[derive(Debug, Deserialize)]
struct DumpedScore {
    map_md5: String,
    mode: Mode,
    variant: Variant,
    /// Hidden accounts are left out of every leaderboard.
    #[serde(default = "default_public")]
    public: bool,
    #[serde(flatten)]
    row: ScoreRow,
}

fn default_public() -> bool {
    true
}

/// Map metadata and scores read from a JSON dump, serving as the database
/// tier of the `lbcache` tool.
#[derive(Debug)]
pub struct FileBackend {
    maps: HashMap<String, MapMetadata>,
    scores: Vec<DumpedScore>,
}

impl FileBackend {
    pub fn open(path: impl AsRef<Path>) -> LbResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let backend = Self::from_json(&raw)?;
        info!(
            "Loaded {} maps and {} scores from {}",
            backend.maps.len(),
            backend.scores.len(),
            path.as_ref().display()
        );
        Ok(backend)
    }

    pub fn from_json(raw: &str) -> LbResult<Self> {
        let dump: Dump = serde_json::from_str(raw)?;
        Ok(Self {
            maps: dump
                .maps
                .into_iter()
                .map(|m| (m.md5.clone(), m))
                .collect(),
            scores: dump.scores,
        })
    }
}

#[async_trait]
impl MapSource for FileBackend {
    async fn fetch(&self, md5: &str) -> LbResult<Option<MapMetadata>> {
        Ok(self.maps.get(md5).cloned())
    }
}

#[async_trait]
impl ScoreStore for FileBackend {
    async fn query_best_scores(&self, query: &ScoreQuery) -> LbResult<Vec<ScoreRow>> {
        let value = |s: &DumpedScore| {
            if query.variant.uses_ppboard() {
                f64::from(s.row.pp)
            } else {
                s.row.score as f64
            }
        };

        let rows = self
            .scores
            .iter()
            .filter(|s| {
                s.public
                    && s.map_md5 == query.map_md5
                    && s.mode == query.mode
                    && s.variant == query.variant
            })
            .sorted_by(|a, b| value(b).total_cmp(&value(a)))
            // Best score per user only.
            .unique_by(|s| s.row.user_id)
            .map(|s| s.row.clone())
            .collect();
        Ok(rows)
    }
}
