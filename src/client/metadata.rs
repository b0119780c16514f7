use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::modes::FetchStatus;
use crate::error::{LbResult, LeaderboardError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MapStatus {
    Graveyard,
    Pending,
    Ranked,
    Approved,
    Qualified,
    Loved,
}

impl MapStatus {
    pub fn has_leaderboard(&self) -> bool {
        matches!(
            self,
            MapStatus::Ranked | MapStatus::Approved | MapStatus::Qualified | MapStatus::Loved
        )
    }

    /// Ranked and approved maps do not change upstream anymore.
    pub fn is_frozen(&self) -> bool {
        matches!(self, MapStatus::Ranked | MapStatus::Approved)
    }
}

/// Resolved map metadata, keyed by the md5 hash of the map file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMetadata {
    pub md5: String,
    pub map_id: u64,
    pub set_id: u64,
    pub song_name: String,
    pub status: MapStatus,
    pub last_update: DateTime<Utc>,
}

impl MapMetadata {
    pub fn has_leaderboard(&self) -> bool {
        self.status.has_leaderboard()
    }

    pub fn needs_update(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        !self.status.is_frozen() && now - self.last_update > interval
    }
}

/// Resolves map metadata by hash, reporting which tier answered.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, md5: &str) -> LbResult<(FetchStatus, Option<MapMetadata>)>;

    fn needs_update(&self, map: &MapMetadata) -> bool;

    /// Refreshes the stored metadata of `map` from upstream.
    async fn update(&self, map: MapMetadata) -> LbResult<()>;
}

/// A single tier of map metadata storage.
#[async_trait]
pub trait MapSource: Send + Sync {
    async fn fetch(&self, md5: &str) -> LbResult<Option<MapMetadata>>;

    /// Read-only tiers keep this default and ignore saves.
    async fn save(&self, map: &MapMetadata) -> LbResult<()> {
        debug!("Read-only map tier ignored save of {}", map.md5);
        Ok(())
    }
}

/// Cache -> database -> external API fallback chain. Maps found in a slower
/// tier are written back to the cache tier.
pub struct TieredResolver {
    cache: Arc<dyn MapSource>,
    database: Arc<dyn MapSource>,
    api: Option<Arc<dyn MapSource>>,
    update_interval: Duration,
}

impl TieredResolver {
    pub fn new(cache: Arc<dyn MapSource>, database: Arc<dyn MapSource>) -> Self {
        Self {
            cache,
            database,
            api: None,
            update_interval: Duration::hours(24),
        }
    }

    pub fn with_api(mut self, api: Arc<dyn MapSource>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_update_interval(mut self, update_interval: Duration) -> Self {
        self.update_interval = update_interval;
        self
    }
}

#[async_trait]
impl MetadataResolver for TieredResolver {
    async fn resolve(&self, md5: &str) -> LbResult<(FetchStatus, Option<MapMetadata>)> {
        if let Some(map) = self.cache.fetch(md5).await? {
            return Ok((FetchStatus::Cache, Some(map)));
        }

        if let Some(map) = self.database.fetch(md5).await? {
            self.cache.save(&map).await?;
            return Ok((FetchStatus::Database, Some(map)));
        }

        if let Some(api) = &self.api {
            if let Some(map) = api.fetch(md5).await? {
                self.cache.save(&map).await?;
                return Ok((FetchStatus::Api, Some(map)));
            }
        }

        Ok((FetchStatus::None, None))
    }

    fn needs_update(&self, map: &MapMetadata) -> bool {
        map.needs_update(Utc::now(), self.update_interval)
    }

    async fn update(&self, map: MapMetadata) -> LbResult<()> {
        let Some(api) = &self.api else {
            debug!("No API tier configured, skipping update of {}", map.md5);
            return Ok(());
        };

        match api.fetch(&map.md5).await? {
            Some(fresh) if fresh.md5 != map.md5 => {
                return Err(LeaderboardError::Metadata(format!(
                    "upstream answered {} for map {}",
                    fresh.md5, map.md5
                )));
            }
            Some(mut fresh) => {
                fresh.last_update = Utc::now();
                self.database.save(&fresh).await?;
                self.cache.save(&fresh).await?;
                debug!("Updated metadata of {} ({})", fresh.song_name, fresh.md5);
            }
            None => warn!("Map {} ({}) is no longer known upstream", map.song_name, map.md5),
        }
        Ok(())
    }
}

/// In-process map metadata tier.
#[derive(Debug, Default)]
pub struct MemoryMapSource {
    maps: RwLock<HashMap<String, MapMetadata>>,
}

impl MemoryMapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.maps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.read().is_empty()
    }
}

#[async_trait]
impl MapSource for MemoryMapSource {
    async fn fetch(&self, md5: &str) -> LbResult<Option<MapMetadata>> {
        Ok(self.maps.read().get(md5).cloned())
    }

    async fn save(&self, map: &MapMetadata) -> LbResult<()> {
        self.maps.write().insert(map.md5.clone(), map.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(md5: &str, status: MapStatus) -> MapMetadata {
        MapMetadata {
            md5: md5.to_string(),
            map_id: 1,
            set_id: 1,
            song_name: "Artist - Title [Insane]".to_string(),
            status,
            last_update: Utc::now() - Duration::days(3),
        }
    }

    async fn seeded(maps: &[MapMetadata]) -> Arc<MemoryMapSource> {
        let source = Arc::new(MemoryMapSource::new());
        for m in maps {
            source.save(m).await.unwrap();
        }
        source
    }

    #[tokio::test]
    async fn resolve_prefers_cache_then_database_then_api() {
        let cache = seeded(&[map("a", MapStatus::Ranked)]).await;
        let database = seeded(&[map("b", MapStatus::Ranked)]).await;
        let api = seeded(&[map("c", MapStatus::Loved)]).await;
        let resolver = TieredResolver::new(cache.clone(), database).with_api(api);

        assert_eq!(resolver.resolve("a").await.unwrap().0, FetchStatus::Cache);
        assert_eq!(resolver.resolve("b").await.unwrap().0, FetchStatus::Database);
        assert_eq!(resolver.resolve("c").await.unwrap().0, FetchStatus::Api);
        assert_eq!(resolver.resolve("d").await.unwrap(), (FetchStatus::None, None));

        // Database and API hits were written back to the cache tier.
        assert_eq!(cache.len(), 3);
        assert_eq!(resolver.resolve("c").await.unwrap().0, FetchStatus::Cache);
    }

    #[tokio::test]
    async fn update_writes_through_to_every_tier() {
        let stale = map("a", MapStatus::Qualified);
        let cache = seeded(&[stale.clone()]).await;
        let database = seeded(&[stale.clone()]).await;
        let mut upstream = stale.clone();
        upstream.status = MapStatus::Ranked;
        let api = seeded(&[upstream]).await;

        let resolver = TieredResolver::new(cache.clone(), database.clone()).with_api(api);
        assert!(resolver.needs_update(&stale));

        resolver.update(stale).await.unwrap();
        let cached = cache.fetch("a").await.unwrap().unwrap();
        let stored = database.fetch("a").await.unwrap().unwrap();
        assert_eq!(cached.status, MapStatus::Ranked);
        assert_eq!(stored, cached);
        assert!(!resolver.needs_update(&cached));
    }

    // Upstream tier that answers every lookup with the same map.
    struct Misfiled(MapMetadata);

    #[async_trait]
    impl MapSource for Misfiled {
        async fn fetch(&self, _md5: &str) -> LbResult<Option<MapMetadata>> {
            Ok(Some(self.0.clone()))
        }
    }

    #[tokio::test]
    async fn update_rejects_metadata_for_another_map() {
        let stale = map("a", MapStatus::Pending);
        let cache = seeded(&[stale.clone()]).await;
        let database = seeded(&[stale.clone()]).await;
        let api = Arc::new(Misfiled(map("b", MapStatus::Ranked)));
        let resolver = TieredResolver::new(cache.clone(), database.clone()).with_api(api);

        let result = resolver.update(stale.clone()).await;
        assert!(matches!(result, Err(LeaderboardError::Metadata(_))));
        assert_eq!(cache.fetch("a").await.unwrap(), Some(stale.clone()));
        assert_eq!(database.fetch("a").await.unwrap(), Some(stale));
        assert!(cache.fetch("b").await.unwrap().is_none());
    }

    #[test]
    fn frozen_maps_never_need_updates() {
        let old = map("a", MapStatus::Ranked);
        assert!(!old.needs_update(Utc::now(), Duration::hours(1)));
        assert!(map("b", MapStatus::Pending).needs_update(Utc::now(), Duration::hours(1)));
        assert!(!map("c", MapStatus::Graveyard).has_leaderboard());
    }
}
