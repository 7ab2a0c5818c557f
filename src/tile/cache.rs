//! Cache for extracted PNG tiles.
//!
//! Serving a tile means reading a whole `.meta` container and scanning it
//! for one embedded PNG. This module provides an LRU cache over the results
//! so hot tiles skip that work entirely.
//!
//! Entries are keyed by render config plus tile coordinate. Capacity is
//! accounted in bytes of tile data rather than entry count: inserts that push
//! the total over the limit pop least-recently-used entries until it fits
//! again. A secondary entry-count bound keeps the LRU bookkeeping itself from
//! growing without limit when tiles are tiny.

use std::sync::Arc;

use bytes::Bytes;
use lru::LruCache;
use tokio::sync::RwLock;

use crate::coord::TileCoord;

/// Default capacity of the tile cache in bytes (100MB)
pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 100 * 1024 * 1024;

/// Hard ceiling on entry count, independent of byte size
const DEFAULT_MAX_ENTRIES: usize = 10_000;

// =============================================================================
// Cache Key
// =============================================================================

/// Cache key for extracted tiles.
///
/// A tile is uniquely identified by its render config and coordinate; two
/// configs can hold different imagery for the same `(zoom, x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileCacheKey {
    /// Render config name (top-level cache directory)
    pub config: Arc<str>,

    /// Tile coordinate
    pub coord: TileCoord,
}

impl TileCacheKey {
    pub fn new(config: impl Into<Arc<str>>, coord: TileCoord) -> Self {
        Self {
            config: config.into(),
            coord,
        }
    }
}

// =============================================================================
// Tile Cache
// =============================================================================

/// Byte-bounded LRU cache of extracted tiles.
///
/// All methods take `&self`; interior locking makes the cache safe to share
/// across tasks behind an `Arc`.
///
/// # Example
///
/// ```
/// use metatile_server::coord::TileCoord;
/// use metatile_server::tile::{TileCache, TileCacheKey};
/// use bytes::Bytes;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = TileCache::new();
///
///     let key = TileCacheKey::new("default", TileCoord::new(10, 500, 300));
///     let tile_data = Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47]);
///
///     cache.put(key.clone(), tile_data.clone()).await;
///     assert_eq!(cache.get(&key).await, Some(tile_data));
/// }
/// ```
pub struct TileCache {
    cache: RwLock<LruCache<TileCacheKey, Bytes>>,

    /// Ceiling on the summed size of cached tile bodies
    max_size: usize,

    /// Running total of cached bytes, kept in step with `cache`
    current_size: RwLock<usize>,
}

impl TileCache {
    /// Cache with the default capacity ([`DEFAULT_TILE_CACHE_CAPACITY`]).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TILE_CACHE_CAPACITY)
    }

    /// Cache bounded to `max_size` bytes of tile data.
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            cache: RwLock::new(LruCache::new(
                std::num::NonZeroUsize::new(DEFAULT_MAX_ENTRIES).unwrap(),
            )),
            max_size,
            current_size: RwLock::new(0),
        }
    }

    /// Cache bounded both in bytes and in entry count.
    pub fn with_capacity_and_entries(max_size: usize, max_entries: usize) -> Self {
        Self {
            cache: RwLock::new(LruCache::new(
                std::num::NonZeroUsize::new(max_entries).unwrap(),
            )),
            max_size,
            current_size: RwLock::new(0),
        }
    }

    /// Look up a tile, marking it most-recently-used on a hit.
    pub async fn get(&self, key: &TileCacheKey) -> Option<Bytes> {
        let mut cache = self.cache.write().await;
        cache.get(key).cloned()
    }

    /// Membership test that leaves the recency order untouched.
    pub async fn contains(&self, key: &TileCacheKey) -> bool {
        let cache = self.cache.read().await;
        cache.contains(key)
    }

    /// Insert a tile, evicting from the LRU end until the total fits the capacity.
    ///
    /// Re-inserting an existing key replaces its data and re-marks it as
    /// most-recently-used.
    pub async fn put(&self, key: TileCacheKey, data: Bytes) {
        let data_size = data.len();
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;

        // Replacing an entry: its old bytes leave the total first
        if let Some(old_data) = cache.peek(&key) {
            *current_size = current_size.saturating_sub(old_data.len());
        }

        cache.put(key, data);
        *current_size += data_size;

        while *current_size > self.max_size {
            match cache.pop_lru() {
                Some((_, evicted)) => {
                    *current_size = current_size.saturating_sub(evicted.len());
                }
                None => break,
            }
        }
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;
        cache.clear();
        *current_size = 0;
    }

    /// Number of tiles currently held.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Total bytes of tile data currently held.
    pub async fn size(&self) -> usize {
        *self.current_size.read().await
    }

    /// The configured capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
