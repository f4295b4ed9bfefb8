//! In-process cache of ranked leaderboards.
//!
//! Entries are keyed by `(scope_key, timeframe)` and hold the full ranked
//! list so requests with different limits share one entry. Expiry is checked
//! lazily on read; there is no sweeper task. Any ledger write clears the whole
//! cache, so a stale board is at worst `ttl` old for writes made by another
//! process.
//!
//! Every invalidation bumps a generation counter. A reader takes the
//! generation before querying the database and hands it back to
//! [`LeaderboardCache::insert`]; a board computed before a later invalidation
//! is returned to its caller but not stored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use studyhub_core::leaderboard::LeaderboardEntry;
use studyhub_core::timeframe::Timeframe;
use tokio::sync::RwLock;

type CacheKey = (String, Timeframe);

struct CachedBoard {
    entries: Arc<Vec<LeaderboardEntry>>,
    cached_at: Instant,
}

/// TTL-bounded leaderboard cache. Never the source of truth.
pub struct LeaderboardCache {
    ttl: Duration,
    generation: AtomicU64,
    boards: RwLock<HashMap<CacheKey, CachedBoard>>,
}

impl LeaderboardCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            generation: AtomicU64::new(0),
            boards: RwLock::new(HashMap::new()),
        }
    }

    /// Fresh ranked board for the key, if one is cached.
    pub async fn get(
        &self,
        scope_key: &str,
        timeframe: Timeframe,
    ) -> Option<Arc<Vec<LeaderboardEntry>>> {
        if self.ttl.is_zero() {
            return None;
        }
        let boards = self.boards.read().await;
        boards
            .get(&(scope_key.to_string(), timeframe))
            .filter(|b| b.cached_at.elapsed() < self.ttl)
            .map(|b| Arc::clone(&b.entries))
    }

    /// Current invalidation generation. Take it before reading the database.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store a ranked board computed under `generation`, returning the shared
    /// handle. Boards from an older generation are not stored.
    pub async fn insert(
        &self,
        scope_key: &str,
        timeframe: Timeframe,
        entries: Vec<LeaderboardEntry>,
        generation: u64,
    ) -> Arc<Vec<LeaderboardEntry>> {
        let entries = Arc::new(entries);
        if self.ttl.is_zero() {
            return entries;
        }
        let mut boards = self.boards.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(scope = %scope_key, %timeframe, "Skipping stale leaderboard board");
            return entries;
        }
        boards.retain(|_, b| b.cached_at.elapsed() < self.ttl);
        boards.insert(
            (scope_key.to_string(), timeframe),
            CachedBoard {
                entries: Arc::clone(&entries),
                cached_at: Instant::now(),
            },
        );
        entries
    }

    /// Drop every cached board.
    pub async fn invalidate(&self) {
        let mut boards = self.boards.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if !boards.is_empty() {
            tracing::debug!(boards = boards.len(), "Invalidating leaderboard cache");
        }
        boards.clear();
    }

    /// Number of stored boards, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.boards.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
