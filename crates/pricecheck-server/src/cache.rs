//! Shared in-memory TTL cache for price-check results.
//!
//! Keyed by the normalized product name. Entries expire lazily on access
//! and eagerly via the periodic sweep; there is no persistence across
//! restarts because results are reconstructable from the upstream API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use pricecheck_core::PriceCheckResult;

use crate::clock::Clock;

const MAX_KEY_LEN: usize = 120;

#[derive(Debug, Clone)]
struct CacheEntry {
    result: PriceCheckResult,
    expires_at: DateTime<Utc>,
}

/// TTL key-value store mapping normalized query strings to previously
/// computed results. One process-wide TTL applied at write time; no
/// per-entry override.
pub struct ResultCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    #[must_use]
    pub fn new(ttl_hours: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            // Cap at 100 years so absurd configs cannot overflow the
            // expiry arithmetic.
            ttl: Duration::hours(i64::try_from(ttl_hours.min(876_000)).unwrap_or(876_000)),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Normalizes a product name into a cache key: lowercased, trimmed,
    /// capped at 120 characters.
    #[must_use]
    pub fn normalize_key(name: &str) -> String {
        let lowered = name.trim().to_lowercase();
        let mut end = lowered.len().min(MAX_KEY_LEN);
        while !lowered.is_char_boundary(end) {
            end -= 1;
        }
        lowered[..end].to_string()
    }

    /// Returns the cached result for `key`, evicting and missing when the
    /// entry has expired.
    pub fn get(&self, key: &str) -> Option<PriceCheckResult> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if now <= entry.expires_at => Some(entry.result.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `result` under `key` with the configured TTL.
    pub fn set(&self, key: &str, result: PriceCheckResult) {
        let expires_at = self.clock.now() + self.ttl;
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key.to_string(), CacheEntry { result, expires_at });
    }

    /// Removes every expired entry, independent of access. Returns the
    /// number removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        before - entries.len()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }
}
