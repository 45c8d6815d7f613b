//! Per-window verse cache.
//!
//! Every resource window owns one [VerseCache] so that revisiting a verse —
//! scrolling back, re-broadcasting a group navigation, scanning for section
//! boundaries — does not re-fetch content from the backend. The cache is
//! deliberately small and bounded: it is a recent-history window, not a copy
//! of the Bible.

use lru::LruCache;
use std::num::NonZeroUsize;

use crate::{provider::VerseData, versekey::VerseKey, LecternError};

/// Cache capacity for lightweight resource boxes inside collections.
pub const RESOURCE_BOX_CACHE_SIZE: usize = 30;

/// Cache capacity for full resource windows.
pub const RESOURCE_WINDOW_CACHE_SIZE: usize = 300;

/// Bounded, access-ordered cache of fetched verse content.
///
/// Entries are promoted on every hit; inserting past capacity evicts the
/// least recently used entry. "No content for this key" is itself a cached
/// fact (`None`), so empty introductions and post-bridge keys are not
/// re-fetched either. There is no invalidation: a window whose underlying
/// text changes must drop the cache and start over.
pub struct VerseCache {
    entries: LruCache<VerseKey, Option<VerseData>>,
}

impl VerseCache {
    /// A cache holding at most `capacity` verses. Zero is clamped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("clamped to at least one");
        VerseCache {
            entries: LruCache::new(capacity),
        }
    }

    /// Return the cached content for `key`, fetching it on a miss.
    ///
    /// On a hit the entry is promoted and `fetch` is not called. On a miss
    /// `fetch` runs once; a fetch error is logged and cached as no-content
    /// rather than propagated — backends report missing keys for verse
    /// bridges and book boundaries in normal operation.
    pub fn get_or_fetch<F>(&mut self, key: VerseKey, fetch: F) -> Option<&VerseData>
    where
        F: FnOnce(&VerseKey) -> Result<Option<VerseData>, LecternError>,
    {
        if !self.entries.contains(&key) {
            let content = match fetch(&key) {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!("No content fetched for {key}: {e}");
                    None
                }
            };
            if let Some((evicted, _)) = self.entries.push(key, content) {
                if evicted != key {
                    tracing::trace!("Evicted {evicted} from verse cache");
                }
            }
        }
        self.entries.get(&key).and_then(|content| content.as_ref())
    }

    /// Whether `key` has a cached slot (even a no-content one). Does not
    /// promote.
    pub fn contains(&self, key: &VerseKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl std::fmt::Debug for VerseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("VerseCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use test_log::test;

    fn key(chapter: u16, verse: u16) -> VerseKey {
        VerseKey::new("GEN".parse().unwrap(), chapter, verse)
    }

    fn content(n: u16) -> Result<Option<VerseData>, LecternError> {
        Ok(Some(VerseData::verse(format!("verse {n}"))))
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache = VerseCache::with_capacity(4);
        for v in 1..=5 {
            cache.get_or_fetch(key(1, v), |_| content(v));
        }
        // Capacity 4, five inserts: the first key is gone, the rest remain.
        assert!(!cache.contains(&key(1, 1)));
        for v in 2..=5 {
            assert!(cache.contains(&key(1, v)));
        }
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_access_promotes() {
        let mut cache = VerseCache::with_capacity(3);
        for v in 1..=3 {
            cache.get_or_fetch(key(1, v), |_| content(v));
        }
        // Touch the oldest entry, then overflow: the second-oldest goes.
        cache.get_or_fetch(key(1, 1), |_| panic!("hit must not fetch"));
        cache.get_or_fetch(key(1, 4), |_| content(4));
        assert!(cache.contains(&key(1, 1)));
        assert!(!cache.contains(&key(1, 2)));
        assert!(cache.contains(&key(1, 3)));
        assert!(cache.contains(&key(1, 4)));
    }

    #[test]
    fn test_fetch_at_most_once() {
        let mut cache = VerseCache::with_capacity(10);
        let calls = Cell::new(0u32);
        let fetch = |_: &VerseKey| {
            calls.set(calls.get() + 1);
            content(7)
        };
        let first = cache.get_or_fetch(key(1, 7), fetch).cloned();
        let second = cache.get_or_fetch(key(1, 7), fetch).cloned();
        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(first, Some(VerseData::verse("verse 7")));
    }

    #[test]
    fn test_no_content_is_cached() {
        let mut cache = VerseCache::with_capacity(10);
        let calls = Cell::new(0u32);
        let fetch = |_: &VerseKey| {
            calls.set(calls.get() + 1);
            Ok(None)
        };
        assert!(cache.get_or_fetch(key(1, 0), fetch).is_none());
        assert!(cache.get_or_fetch(key(1, 0), fetch).is_none());
        assert_eq!(calls.get(), 1);
        assert!(cache.contains(&key(1, 0)));
    }

    #[test]
    fn test_fetch_error_reads_as_no_content() {
        let mut cache = VerseCache::with_capacity(10);
        let missing = cache.get_or_fetch(key(3, 99), |k| {
            Err(LecternError::NotFound(format!("no entry for {k}")))
        });
        assert!(missing.is_none());
        // The failure is cached; the fetch is not retried.
        let again = cache.get_or_fetch(key(3, 99), |_| panic!("cached miss must not refetch"));
        assert!(again.is_none());
    }

    #[test]
    fn test_zero_capacity_clamps() {
        let cache = VerseCache::with_capacity(0);
        assert_eq!(cache.capacity(), 1);
    }
}
