use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::leaderboard::RankedLeaderboard;
use crate::core::modes::{Mode, Variant};

/// A cached leaderboard. All mutations of one instance go through its lock;
/// the guard must never be held across an `.await`.
pub type SharedLeaderboard = Arc<RwLock<RankedLeaderboard>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaderboardKey {
    pub map_md5: String,
    pub variant: Variant,
    pub mode: Mode,
}

impl LeaderboardKey {
    pub fn new(map_md5: &str, variant: Variant, mode: Mode) -> Self {
        Self {
            map_md5: map_md5.to_string(),
            variant,
            mode,
        }
    }
}

/// Process wide keyed store of live leaderboards. Slots are filled on first
/// acquisition and overwritten by later puts; nothing expires on its own.
pub trait LeaderboardCache: Send + Sync {
    fn get(&self, key: &LeaderboardKey) -> Option<SharedLeaderboard>;

    /// Stores `leaderboard` under `key`, replacing any previous instance.
    fn put(&self, key: LeaderboardKey, leaderboard: RankedLeaderboard) -> SharedLeaderboard;

    /// Stores `leaderboard` only if the slot is empty. Returns the instance
    /// that owns the slot afterwards; a late `leaderboard` is dropped.
    fn get_or_insert(
        &self,
        key: LeaderboardKey,
        leaderboard: RankedLeaderboard,
    ) -> SharedLeaderboard;

    fn invalidate(&self, key: &LeaderboardKey) -> Option<SharedLeaderboard>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Default)]
pub struct MemoryCache {
    data: Arc<RwLock<HashMap<LeaderboardKey, SharedLeaderboard>>>,
}

impl MemoryCache {
    pub fn new() -> MemoryCache {
        MemoryCache::default()
    }
}

impl LeaderboardCache for MemoryCache {
    fn get(&self, key: &LeaderboardKey) -> Option<SharedLeaderboard> {
        self.data.read().get(key).cloned()
    }

    fn put(&self, key: LeaderboardKey, leaderboard: RankedLeaderboard) -> SharedLeaderboard {
        let shared = Arc::new(RwLock::new(leaderboard));
        self.data.write().insert(key, shared.clone());
        shared
    }

    fn get_or_insert(
        &self,
        key: LeaderboardKey,
        leaderboard: RankedLeaderboard,
    ) -> SharedLeaderboard {
        self.data
            .write()
            .entry(key)
            .or_insert_with(|| Arc::new(RwLock::new(leaderboard)))
            .clone()
    }

    fn invalidate(&self, key: &LeaderboardKey) -> Option<SharedLeaderboard> {
        self.data.write().remove(key)
    }

    fn len(&self) -> usize {
        self.data.read().len()
    }
}
