use indexmap::IndexMap;
use tracing::{debug, info};

use crate::client::metadata::MapMetadata;
use crate::client::scores::{ScoreQuery, ScoreStore};
use crate::core::modes::{FetchStatus, Mode, Variant};
use crate::core::score::{ScoreRecord, ScoreRow};
use crate::error::{LbResult, LeaderboardError};
use crate::storage::LeaderboardKey;

/// Maximum number of scores held in memory per leaderboard.
pub const SIZE_LIMIT: usize = 150;

/// Outcome of inserting a score into a live leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The score entered the cached top at this 1-based placement.
    Ranked(usize),
    /// The score did not make the cut. Holds the global 1-based placement.
    BelowCut(usize),
}

impl Insertion {
    pub fn placement(&self) -> usize {
        match self {
            Insertion::Ranked(p) | Insertion::BelowCut(p) => *p,
        }
    }
}

/// Ranked leaderboard of a single map for one (mode, variant) pair.
///
/// `scores` holds the best `size_limit` scores in rank order. `participants`
/// holds every user with a qualifying score, in the same order, along with
/// the value they are ranked by. The first `scores.len()` participants are
/// always the keys of `scores`, in order.
#[derive(Debug)]
pub struct RankedLeaderboard {
    mode: Mode,
    variant: Variant,
    map: MapMetadata,
    scores: IndexMap<u64, ScoreRecord>,
    participants: IndexMap<u64, f64>,
    size_limit: usize,
    map_fetch: FetchStatus,
    score_fetch: FetchStatus,
}

impl RankedLeaderboard {
    pub fn new(map: MapMetadata, mode: Mode, variant: Variant, map_fetch: FetchStatus) -> Self {
        Self {
            mode,
            variant,
            map,
            scores: IndexMap::new(),
            participants: IndexMap::new(),
            size_limit: SIZE_LIMIT,
            map_fetch,
            score_fetch: FetchStatus::None,
        }
    }

    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }

    pub fn key(&self) -> LeaderboardKey {
        LeaderboardKey::new(&self.map.md5, self.variant, self.mode)
    }

    pub fn query(&self) -> ScoreQuery {
        ScoreQuery::new(&self.map.md5, self.mode, self.variant)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn map(&self) -> &MapMetadata {
        &self.map
    }

    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    pub fn map_fetch(&self) -> FetchStatus {
        self.map_fetch
    }

    pub fn score_fetch(&self) -> FetchStatus {
        self.score_fetch
    }

    pub(crate) fn mark_cached(&mut self) {
        self.map_fetch = FetchStatus::Cache;
        self.score_fetch = FetchStatus::Cache;
    }

    /// Cached top scores, best first.
    pub fn scores(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.scores.values()
    }

    /// Every participant's user id, best first.
    pub fn participants(&self) -> impl Iterator<Item = u64> + '_ {
        self.participants.keys().copied()
    }

    pub fn has_scores(&self) -> bool {
        !self.participants.is_empty()
    }

    pub fn total_participants(&self) -> usize {
        self.participants.len()
    }

    pub fn in_top(&self, user_id: u64) -> bool {
        self.scores.contains_key(&user_id)
    }

    pub fn has_any_score(&self, user_id: u64) -> bool {
        self.participants.contains_key(&user_id)
    }

    /// Fails with `NotFound` if the user is not in the cached top. Guard
    /// with `in_top`.
    pub fn get_top_score(&self, user_id: u64) -> LbResult<&ScoreRecord> {
        self.scores.get(&user_id).ok_or_else(|| {
            LeaderboardError::NotFound(format!(
                "user {} has no top {} score on {}",
                user_id, self.size_limit, self.map.md5
            ))
        })
    }

    /// 1-based global placement. Fails with `NotFound` if the user has no
    /// qualifying score. Guard with `has_any_score`.
    pub fn get_placement(&self, user_id: u64) -> LbResult<usize> {
        self.participants
            .get_index_of(&user_id)
            .map(|idx| idx + 1)
            .ok_or_else(|| {
                LeaderboardError::NotFound(format!(
                    "user {} has no score on {}",
                    user_id, self.map.md5
                ))
            })
    }

    /// Reloads every qualifying score from the store.
    pub async fn refresh(&mut self, store: &dyn ScoreStore) -> LbResult<()> {
        if !self.map.has_leaderboard() {
            return Ok(());
        }
        let rows = store.query_best_scores(&self.query()).await?;
        self.load(rows);
        Ok(())
    }

    /// Replaces the leaderboard contents with `rows`, which must already be
    /// ordered best first.
    pub fn load(&mut self, rows: Vec<ScoreRow>) {
        self.scores.clear();
        self.participants.clear();

        for (idx, row) in rows.into_iter().enumerate() {
            let record = ScoreRecord::from(row);
            self.participants
                .insert(record.user_id, record.ranking_value(self.variant));
            if idx < self.size_limit {
                self.scores.insert(record.user_id, record);
            }
        }

        self.score_fetch = FetchStatus::Database;
        info!(
            "Loaded {} scores ({} cached) for {} [{} {}]",
            self.participants.len(),
            self.scores.len(),
            self.map.md5,
            self.mode,
            self.variant
        );
    }

    /// Removes a user's top score. No-op if the user is not in the top.
    pub fn remove(&mut self, user_id: u64) {
        if self.scores.shift_remove(&user_id).is_some() {
            self.participants.shift_remove(&user_id);
        }
    }

    /// Places a user's new best score. Any previous entry of the user is
    /// dropped first. Ties keep the earlier arrival ahead.
    pub fn insert(&mut self, record: ScoreRecord) -> Insertion {
        let user_id = record.user_id;
        self.remove(user_id);
        self.participants.shift_remove(&user_id);

        let value = record.ranking_value(self.variant);
        let idx = self
            .participants
            .values()
            .position(|v| *v < value)
            .unwrap_or(self.participants.len());
        self.participants.shift_insert(idx, user_id, value);

        // The cached top must stay a prefix of the participants.
        if idx >= self.size_limit || idx > self.scores.len() {
            return Insertion::BelowCut(idx + 1);
        }

        debug!(
            "Inserted score by {} ({}) on {} into the cached leaderboards!",
            record.username, user_id, self.map.song_name
        );
        self.scores.shift_insert(idx, user_id, record);
        if self.scores.len() > self.size_limit {
            self.scores.pop();
        }
        Insertion::Ranked(idx + 1)
    }
}
