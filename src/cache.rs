//! Component resolution caching.
//!
//! [`ComponentCache`] keeps recently resolved components keyed by their
//! descriptor so that pushing the same page repeatedly does not walk the
//! registry again. It is gated behind the `cache` feature flag and uses the
//! [`lru`] crate internally.
//!
//! Hot reload relies on [`ComponentCache::invalidate`]: a page whose source
//! changed must pick up a fresh resolution when it is rebuilt.
//!
//! [`CacheStats`] tracks hits, misses, and invalidations.
//!
//! # Examples
//!
//! ```
//! use gpui_stack_navigator::cache::ComponentCache;
//! use gpui_stack_navigator::component::{ComponentParams, ResolvedComponent};
//! use gpui_stack_navigator::ComponentPath;
//!
//! let mut cache = ComponentCache::new();
//! let path = ComponentPath::new("/home");
//! cache.insert(
//!     path.clone(),
//!     ResolvedComponent { component: "home", params: ComponentParams::new() },
//! );
//!
//! assert_eq!(cache.get(&path).unwrap().component, "home");
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::component::ResolvedComponent;
use crate::page::ComponentPath;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to go to the registry.
    pub misses: usize,
    /// Single-descriptor invalidations that removed an entry.
    pub invalidations: usize,
    /// Full clears.
    pub clears: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of resolved components.
#[derive(Debug)]
pub struct ComponentCache<C> {
    entries: LruCache<ComponentPath, ResolvedComponent<C>>,
    stats: CacheStats,
}

impl<C: Clone> ComponentCache<C> {
    const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity (256 descriptors).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).expect("Cache capacity must be non-zero");
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up `path`, updating hit/miss stats.
    pub fn get(&mut self, path: &ComponentPath) -> Option<ResolvedComponent<C>> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Component cache hit for '{}'", path);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Component cache miss for '{}'", path);
            None
        }
    }

    /// Insert a resolution, evicting the least recently used one when full.
    pub fn insert(&mut self, path: ComponentPath, resolved: ResolvedComponent<C>) {
        if let Some((evicted, _)) = self.entries.push(path.clone(), resolved) {
            if evicted != path {
                trace_log!("Component cache evicted '{}'", evicted);
            }
        }
    }

    /// Drop the cached resolution for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &ComponentPath) -> bool {
        let removed = self.entries.pop(path).is_some();
        if removed {
            self.stats.invalidations += 1;
            debug_log!("Component cache invalidated '{}'", path);
        }
        removed
    }

    /// Drop every cached resolution.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.clears += 1;
        debug_log!(
            "Component cache cleared: {} entries removed (hit rate: {:.1}%)",
            len,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Clone> Default for ComponentCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentParams;

    fn resolved(component: u32) -> ResolvedComponent<u32> {
        ResolvedComponent {
            component,
            params: ComponentParams::new(),
        }
    }

    #[test]
    fn test_cache_miss() {
        let mut cache: ComponentCache<u32> = ComponentCache::new();
        assert!(cache.get(&ComponentPath::new("/a")).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_cache_hit() {
        let mut cache = ComponentCache::new();
        cache.insert(ComponentPath::new("/a"), resolved(1));
        assert_eq!(cache.get(&ComponentPath::new("/a")).unwrap().component, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = ComponentCache::with_capacity(2);
        cache.insert(ComponentPath::new("/a"), resolved(1));
        cache.insert(ComponentPath::new("/b"), resolved(2));
        // Touch /a so /b becomes least recently used.
        cache.get(&ComponentPath::new("/a"));
        cache.insert(ComponentPath::new("/c"), resolved(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&ComponentPath::new("/b")).is_none());
        assert!(cache.get(&ComponentPath::new("/a")).is_some());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = ComponentCache::new();
        cache.insert(ComponentPath::new("/a"), resolved(1));
        assert!(cache.invalidate(&ComponentPath::new("/a")));
        assert!(!cache.invalidate(&ComponentPath::new("/a")));
        assert_eq!(cache.stats().invalidations, 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_hit_rate_calculation() {
        let mut cache = ComponentCache::new();
        cache.get(&ComponentPath::new("/a"));
        cache.get(&ComponentPath::new("/b"));
        cache.get(&ComponentPath::new("/c"));
        cache.insert(ComponentPath::new("/a"), resolved(1));
        cache.get(&ComponentPath::new("/a"));
        cache.get(&ComponentPath::new("/a"));

        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 3);
        assert!((cache.stats().hit_rate() - 0.4).abs() < 0.001);
    }
}
