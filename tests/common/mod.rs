#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use leaderboard_cache::client::metadata::{MapMetadata, MapStatus, MetadataResolver};
use leaderboard_cache::client::scores::{ScoreQuery, ScoreStore};
use leaderboard_cache::core::modes::FetchStatus;
use leaderboard_cache::core::score::{ScoreRecord, ScoreRow, ScoreStatistics};
use leaderboard_cache::error::{LbResult, LeaderboardError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

pub const MD5: &str = "a5b99395a42bd55bc5eb1d2411cbdf8b";

pub fn map(md5: &str, status: MapStatus) -> MapMetadata {
    MapMetadata {
        md5: md5.to_string(),
        map_id: 129891,
        set_id: 39804,
        song_name: "xi - FREEDOM DiVE [FOUR DIMENSIONS]".to_string(),
        status,
        last_update: Utc::now() - Duration::days(2),
    }
}

pub fn statistics() -> ScoreStatistics {
    ScoreStatistics {
        max_combo: 2385,
        count_300: 1900,
        count_100: 80,
        count_50: 2,
        count_geki: 0,
        count_katu: 0,
        misses: 0,
        full_combo: true,
        mods: 24,
        timestamp: Utc::now(),
    }
}

pub fn row(user_id: u64, score: u64, pp: f32) -> ScoreRow {
    ScoreRow {
        score_id: user_id + 1_000,
        user_id,
        username: format!("player{user_id}"),
        score,
        pp,
        statistics: statistics(),
    }
}

pub fn record(user_id: u64, score: u64, pp: f32) -> ScoreRecord {
    ScoreRecord::from(row(user_id, score, pp))
}

/// Rows ordered by score, best first.
pub fn descending_rows(count: u64) -> Vec<ScoreRow> {
    (1..=count)
        .map(|u| row(u, 1_000_000 - u * 10, 0.0))
        .collect()
}

/// Score store serving fixed rows and counting queries.
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<Vec<ScoreRow>>,
    pub queries: AtomicUsize,
    pub failing: AtomicBool,
}

impl FakeStore {
    pub fn with_rows(rows: Vec<ScoreRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn set_rows(&self, rows: Vec<ScoreRow>) {
        *self.rows.lock() = rows;
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoreStore for FakeStore {
    async fn query_best_scores(&self, _query: &ScoreQuery) -> LbResult<Vec<ScoreRow>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(LeaderboardError::StoreUnavailable(
                "connection refused".to_string(),
            ));
        }
        Ok(self.rows.lock().clone())
    }
}

/// Score store whose first query parks until `release` is notified.
pub struct GatedStore {
    rows: Vec<ScoreRow>,
    gate_open: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedStore {
    pub fn with_rows(rows: Vec<ScoreRow>) -> Self {
        Self {
            rows,
            gate_open: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl ScoreStore for GatedStore {
    async fn query_best_scores(&self, _query: &ScoreQuery) -> LbResult<Vec<ScoreRow>> {
        if !self.gate_open.swap(true, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(self.rows.clone())
    }
}

/// Resolver answering from a fixed set of maps.
#[derive(Default)]
pub struct FakeResolver {
    maps: HashMap<String, MapMetadata>,
    pub stale: bool,
    pub resolves: AtomicUsize,
    pub updates: AtomicUsize,
    pub updated: Notify,
}

impl FakeResolver {
    pub fn with_maps(maps: Vec<MapMetadata>) -> Self {
        Self {
            maps: maps.into_iter().map(|m| (m.md5.clone(), m)).collect(),
            ..Default::default()
        }
    }

    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }
}

#[async_trait]
impl MetadataResolver for FakeResolver {
    async fn resolve(&self, md5: &str) -> LbResult<(FetchStatus, Option<MapMetadata>)> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        Ok(match self.maps.get(md5) {
            Some(map) => (FetchStatus::Database, Some(map.clone())),
            None => (FetchStatus::None, None),
        })
    }

    fn needs_update(&self, _map: &MapMetadata) -> bool {
        self.stale
    }

    async fn update(&self, _map: MapMetadata) -> LbResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.updated.notify_one();
        Ok(())
    }
}
