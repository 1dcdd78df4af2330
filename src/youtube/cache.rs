/*!
 * Transcript caching.
 *
 * Fetched transcripts are kept in memory for a configurable time so that
 * summarizing and extracting key points from the same video only hits
 * YouTube once.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::debug;
use parking_lot::RwLock;

/// Cache key combining video id and requested language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    video_id: String,
    language: String,
}

impl CacheKey {
    fn new(video_id: &str, language: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            language: language.trim().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedTranscript {
    text: String,
    stored_at: Instant,
}

/// In-memory transcript cache with a time-to-live
#[derive(Debug, Clone)]
pub struct TranscriptCache {
    entries: Arc<RwLock<HashMap<CacheKey, CachedTranscript>>>,
    hits: Arc<AtomicUsize>,
    misses: Arc<AtomicUsize>,
    ttl: Duration,
    enabled: bool,
}

impl TranscriptCache {
    /// Create a new cache
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            ttl,
            enabled,
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(false, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get a transcript if present and not expired
    pub fn get(&self, video_id: &str, language: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(video_id, language);
        let fresh = {
            let entries = self.entries.read();
            entries
                .get(&key)
                .filter(|entry| entry.stored_at.elapsed() < self.ttl)
                .map(|entry| entry.text.clone())
        };

        match fresh {
            Some(text) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Transcript cache hit for {} ({})", video_id, key.language);
                Some(text)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Transcript cache miss for {} ({})", video_id, key.language);
                let mut entries = self.entries.write();
                if entries.get(&key).is_some_and(|entry| entry.stored_at.elapsed() >= self.ttl) {
                    entries.remove(&key);
                }
                None
            }
        }
    }

    /// Store a transcript
    pub fn store(&self, video_id: &str, language: &str, text: &str) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(video_id, language);
        self.entries.write().insert(
            key,
            CachedTranscript {
                text: text.to_string(),
                stored_at: Instant::now(),
            },
        );
        debug!("Cached transcript for {} ({} chars)", video_id, text.len());
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Get cache statistics: (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clear the cache and its statistics
    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
