use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::metadata::{MapMetadata, MetadataResolver};
use crate::client::scores::ScoreStore;
use crate::core::leaderboard::{Insertion, RankedLeaderboard, SIZE_LIMIT};
use crate::core::modes::{Mode, Variant};
use crate::core::score::ScoreRecord;
use crate::error::{LbResult, LeaderboardError};
use crate::storage::{LeaderboardCache, LeaderboardKey, SharedLeaderboard};

/// Hands out live leaderboards, from the cache when possible and rebuilt
/// from the database otherwise.
#[derive(Clone)]
pub struct Leaderboards {
    resolver: Arc<dyn MetadataResolver>,
    store: Arc<dyn ScoreStore>,
    cache: Arc<dyn LeaderboardCache>,
    size_limit: usize,
}

impl Leaderboards {
    pub fn new(
        resolver: Arc<dyn MetadataResolver>,
        store: Arc<dyn ScoreStore>,
        cache: Arc<dyn LeaderboardCache>,
    ) -> Self {
        Self {
            resolver,
            store,
            cache,
            size_limit: SIZE_LIMIT,
        }
    }

    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }

    pub fn cache(&self) -> &Arc<dyn LeaderboardCache> {
        &self.cache
    }

    /// Looks the leaderboard up in the cache, then falls back to building
    /// it from the database and caching the result.
    ///
    /// Fails with `NotFound` if the map cannot be resolved. Returns `None`
    /// if the map has no leaderboard.
    pub async fn acquire(
        &self,
        map_md5: &str,
        variant: Variant,
        mode: Mode,
    ) -> LbResult<Option<SharedLeaderboard>> {
        let key = LeaderboardKey::new(map_md5, variant, mode);
        if let Some(shared) = self.from_cache(&key) {
            return Ok(Some(shared));
        }
        self.from_database(key, true).await
    }

    /// Same as `acquire`, but a freshly built leaderboard is not cached.
    pub async fn acquire_uncached(
        &self,
        map_md5: &str,
        variant: Variant,
        mode: Mode,
    ) -> LbResult<Option<SharedLeaderboard>> {
        let key = LeaderboardKey::new(map_md5, variant, mode);
        if let Some(shared) = self.from_cache(&key) {
            return Ok(Some(shared));
        }
        self.from_database(key, false).await
    }

    pub fn from_cache(&self, key: &LeaderboardKey) -> Option<SharedLeaderboard> {
        let shared = self.cache.get(key)?;
        shared.write().mark_cached();
        Some(shared)
    }

    /// Builds the leaderboard from the database. When caching, a slot that
    /// was filled while this build was in flight wins and is returned.
    pub async fn from_database(
        &self,
        key: LeaderboardKey,
        cache: bool,
    ) -> LbResult<Option<SharedLeaderboard>> {
        let Some(leaderboard) = self.build(&key).await? else {
            return Ok(None);
        };
        if cache {
            Ok(Some(self.cache.get_or_insert(leaderboard.key(), leaderboard)))
        } else {
            Ok(Some(Arc::new(parking_lot::RwLock::new(leaderboard))))
        }
    }

    async fn build(&self, key: &LeaderboardKey) -> LbResult<Option<RankedLeaderboard>> {
        let (map_fetch, map) = self.resolver.resolve(&key.map_md5).await?;
        let map = map.ok_or_else(|| {
            LeaderboardError::NotFound(format!("map {} could not be resolved", key.map_md5))
        })?;

        if self.resolver.needs_update(&map) {
            self.spawn_update(map.clone());
        }

        if !map.has_leaderboard() {
            debug!("Map {} ({}) has no leaderboard", map.song_name, map.status);
            return Ok(None);
        }

        let mut leaderboard = RankedLeaderboard::new(map, key.mode, key.variant, map_fetch)
            .with_size_limit(self.size_limit);
        leaderboard.refresh(self.store.as_ref()).await?;
        Ok(Some(leaderboard))
    }

    // Leaderboard construction never waits on the metadata update.
    fn spawn_update(&self, map: MapMetadata) {
        let resolver = self.resolver.clone();
        tokio::spawn(async move {
            let md5 = map.md5.clone();
            if let Err(e) = resolver.update(map).await {
                warn!("Could not update metadata of map {md5}. {e}");
            }
        });
    }

    /// Reloads a cached leaderboard from the database in place. Returns
    /// `false` if nothing is cached under `key`.
    pub async fn refresh(&self, key: &LeaderboardKey) -> LbResult<bool> {
        let Some(shared) = self.cache.get(key) else {
            return Ok(false);
        };

        // Scoped so the guard is released before the store is queried.
        let (query, enabled) = {
            let leaderboard = shared.read();
            (leaderboard.query(), leaderboard.map().has_leaderboard())
        };
        if enabled {
            let rows = self.store.query_best_scores(&query).await?;
            shared.write().load(rows);
        }
        Ok(true)
    }

    /// Inserts a new best score into the live leaderboard for `key`, if one
    /// is cached. Uncached leaderboards pick the score up on their next
    /// load from the database.
    pub fn submit(&self, key: &LeaderboardKey, record: ScoreRecord) -> Option<Insertion> {
        let shared = self.cache.get(key)?;
        let outcome = shared.write().insert(record);
        Some(outcome)
    }
}
