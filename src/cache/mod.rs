// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory result caches
//!
//! Query results are cached per slot so repeated identical queries do not hit
//! the upstream nodes again:
//!
//! - [`SlotCache`]: the capability a use case needs (`get` / `add`)
//! - [`BoundedFreshCache`]: capacity-bounded, LRU-evicting, TTL-expiring
//!   implementation
//!
//! Only successful results are ever stored.
//!
//! # Examples
//!
//! ```rust
//! use slotscan::{BoundedFreshCache, SyncDuties};
//! use std::num::NonZeroUsize;
//! use std::time::Duration;
//!
//! let cache: BoundedFreshCache<u64, SyncDuties> =
//!     BoundedFreshCache::new(NonZeroUsize::new(1024).unwrap(), Duration::from_secs(3600));
//!
//! cache.add(100, SyncDuties::new(vec!["0xabc".into()]));
//! assert_eq!(cache.get(&100).unwrap().len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Slot;

mod bounded;

pub use bounded::BoundedFreshCache;

/// Statistics about cache performance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits (successful retrievals)
    pub hits: u64,
    /// Number of cache misses (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to capacity
    pub evictions: u64,
    /// Number of entries removed because they outlived the TTL
    pub expirations: u64,
    /// Current number of entries in the cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, evictions={}, expirations={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.evictions,
            self.expirations,
            self.entries,
            self.hit_rate()
        )
    }
}

/// Slot-keyed result cache used by query use cases
///
/// # Thread Safety
///
/// Implementations are shared by all concurrent requests and must serialize
/// their own internal mutations.
pub trait SlotCache<V>: Send + Sync {
    /// Returns the cached value for `slot`, if present and still fresh
    fn get(&self, slot: Slot) -> Option<V>;

    /// Stores `value` for `slot`, replacing any previous entry
    fn add(&self, slot: Slot, value: V);
}

impl<V, C> SlotCache<V> for std::sync::Arc<C>
where
    C: SlotCache<V> + ?Sized,
{
    fn get(&self, slot: Slot) -> Option<V> {
        (**self).get(slot)
    }

    fn add(&self, slot: Slot, value: V) {
        (**self).add(slot, value)
    }
}
