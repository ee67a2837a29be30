// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Capacity-bounded cache with TTL expiry and LRU eviction

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::{CacheStats, SlotCache};
use crate::types::cache::AccessSequence;
use crate::types::Slot;

/// Entry in the cache with metadata
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    /// When this entry was inserted or last replaced
    inserted_at: Instant,
    /// Monotonic access stamp for LRU ordering
    access_seq: AccessSequence,
}

impl<V> CacheEntry<V> {
    fn is_stale(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) > ttl
    }
}

#[derive(Debug)]
struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    stats: CacheStats,
    next_seq: AccessSequence,
}

impl<K, V> Default for CacheState<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
            next_seq: AccessSequence::default(),
        }
    }
}

impl<K, V> CacheState<K, V> {
    fn stamp(&mut self) -> AccessSequence {
        let seq = self.next_seq;
        self.next_seq = seq.next();
        seq
    }
}

/// Bounded key-value store with freshness limit and LRU eviction
///
/// - An entry is only returned while its age does not exceed the TTL. Stale entries
///   are dropped when a lookup finds them.
/// - Both lookups and inserts count as use. When an insert pushes the entry
///   count above the capacity, the least recently used entries are evicted.
/// - Replacing an existing key refreshes its value, timestamp and recency.
///
/// All operations are serialized by one internal lock.
///
/// # Performance
///
/// - Get: O(1) average case (HashMap lookup)
/// - Add: O(1) without eviction, O(n) with eviction (finds LRU)
pub struct BoundedFreshCache<K, V> {
    capacity: NonZeroUsize,
    ttl: Duration,
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> BoundedFreshCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a clone of the fresh value for `key`, marking it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.lock();
        let now = Instant::now();

        let stale = match state.entries.get(key) {
            None => {
                state.stats.misses += 1;
                return None;
            }
            Some(entry) => entry.is_stale(self.ttl, now),
        };

        if stale {
            debug!(key = ?key, "Cache entry expired");
            state.entries.remove(key);
            state.stats.expirations += 1;
            state.stats.misses += 1;
            state.stats.entries = state.entries.len();
            return None;
        }

        let seq = state.stamp();
        state.stats.hits += 1;
        let entry = state.entries.get_mut(key)?;
        entry.access_seq = seq;
        Some(entry.value.clone())
    }

    /// Inserts or replaces `key`, then evicts down to capacity
    pub fn add(&self, key: K, value: V) {
        let mut state = self.lock();
        let seq = state.stamp();

        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
            access_seq: seq,
        };
        if state.entries.insert(key.clone(), entry).is_some() {
            debug!(key = ?key, "Replaced cache entry");
        }

        while state.entries.len() > self.capacity.get() {
            Self::evict_lru(&mut state);
        }
        state.stats.entries = state.entries.len();
    }

    /// Number of entries currently held, stale ones included
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            entries: state.entries.len(),
            ..state.stats.clone()
        }
    }

    /// Removes every entry; counters are kept
    pub fn clear(&self) {
        let mut state = self.lock();
        let count = state.entries.len();
        state.entries.clear();
        state.stats.entries = 0;
        debug!(count, "Cleared cache");
    }

    fn evict_lru(state: &mut CacheState<K, V>) {
        let lru_key = state
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.access_seq)
            .map(|(key, _)| key.clone());

        if let Some(key) = lru_key {
            debug!(key = ?key, "Evicting LRU cache entry");
            state.entries.remove(&key);
            state.stats.evictions += 1;
        }
    }
}

impl<K, V> fmt::Debug for BoundedFreshCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedFreshCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<V> SlotCache<V> for BoundedFreshCache<Slot, V>
where
    V: Clone + Send,
{
    fn get(&self, slot: Slot) -> Option<V> {
        BoundedFreshCache::get(self, &slot)
    }

    fn add(&self, slot: Slot, value: V) {
        BoundedFreshCache::add(self, slot, value)
    }
}
