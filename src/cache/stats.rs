//! Cache Counters
//!
//! Lookup and write counters kept under the engine lock next to the LRU core,
//! so a snapshot always agrees with the entry count.

use serde::Serialize;

use crate::cache::lru::PutOutcome;

/// Counter snapshot for one engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Puts that added a new key
    pub inserts: u64,
    /// Puts that replaced an existing key
    pub updates: u64,
    /// Keys dropped from the tail by an insert into a full cache
    pub evictions: u64,
    /// Entry count at snapshot time
    pub total_entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn for_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn record_put(&mut self, outcome: &PutOutcome) {
        match outcome {
            PutOutcome::Updated => self.updates += 1,
            PutOutcome::Inserted { evicted } => {
                self.inserts += 1;
                if evicted.is_some() {
                    self.evictions += 1;
                }
            }
        }
    }

    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups served from the cache; 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_split_into_hits_and_misses() {
        let mut stats = CacheStats::for_capacity(3);
        for hit in [true, false, true, true] {
            stats.record_lookup(hit);
        }
        assert_eq!((stats.hits, stats.misses), (3, 1));
        assert_eq!(stats.lookups(), 4);
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_hit_rate_before_any_lookup() {
        assert_eq!(CacheStats::for_capacity(3).hit_rate(), 0.0);
    }

    #[test]
    fn test_put_outcomes() {
        let mut stats = CacheStats::for_capacity(1);
        stats.record_put(&PutOutcome::Inserted { evicted: None });
        stats.record_put(&PutOutcome::Updated);
        stats.record_put(&PutOutcome::Inserted {
            evicted: Some("old".to_string()),
        });

        assert_eq!(stats.inserts, 2);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.capacity, 1);
    }
}
