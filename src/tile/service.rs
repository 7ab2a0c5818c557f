//! The tile read pipeline.
//!
//! [`TileService::get_tile`] takes a request from validation to PNG bytes:
//! reject unsafe config names and out-of-range coordinates, probe the cache,
//! resolve the container path, read the container, scan out the tile's PNG
//! stream and re-check its signature before caching and returning it. Each
//! failure along that pipeline maps to a distinct [`TileError`] variant so
//! the HTTP layer can log precisely while answering uniformly.

use bytes::Bytes;

use crate::coord::TileCoord;
use crate::error::{StoreError, TileError};
use crate::meta::{extract_tile, has_png_signature, MetatileLayout};
use crate::store::MetatileSource;

use super::cache::{TileCache, TileCacheKey};

// =============================================================================
// Tile Request
// =============================================================================

/// A request for a single tile.
#[derive(Debug, Clone)]
pub struct TileRequest {
    /// Render config name (top-level directory under the cache root)
    pub config: String,

    /// Tile coordinate
    pub coord: TileCoord,
}

impl TileRequest {
    pub fn new(config: impl Into<String>, zoom: u32, x: u32, y: u32) -> Self {
        Self {
            config: config.into(),
            coord: TileCoord::new(zoom, x, y),
        }
    }
}

// =============================================================================
// Tile Response
// =============================================================================

/// A successfully served tile.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// The extracted PNG tile data
    pub data: Bytes,

    /// Whether this tile was served from cache
    pub cache_hit: bool,
}

// =============================================================================
// Config Name Validation
// =============================================================================

/// Check that a render config name is a single safe path segment.
///
/// The name is joined directly under the cache root, so anything that could
/// traverse directories is rejected outright.
pub fn is_safe_config_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

// =============================================================================
// Tile Service
// =============================================================================

/// Extracts tiles from metatile containers, caching the results.
///
/// Generic over the [`MetatileSource`] so tests can substitute an in-memory
/// store for the filesystem one.
///
/// ```ignore
/// use metatile_server::meta::MetatileLayout;
/// use metatile_server::store::FsMetatileSource;
/// use metatile_server::tile::{TileRequest, TileService};
///
/// let source = FsMetatileSource::new("/var/cache/renderd/tiles");
/// let layout = MetatileLayout::new("/var/cache/renderd/tiles");
/// let service = TileService::new(source, layout);
///
/// let response = service.get_tile(TileRequest::new("default", 10, 500, 300)).await?;
/// println!("{} bytes, cache hit: {}", response.data.len(), response.cache_hit);
/// ```
pub struct TileService<S: MetatileSource> {
    /// Storage the containers are read from
    source: S,

    /// Coordinate-to-path mapping
    layout: MetatileLayout,

    /// Cache for extracted tiles
    cache: TileCache,
}

impl<S: MetatileSource> TileService<S> {
    /// Service with the default tile cache (100MB).
    pub fn new(source: S, layout: MetatileLayout) -> Self {
        Self {
            source,
            layout,
            cache: TileCache::new(),
        }
    }

    /// Service with a tile cache bounded to `cache_capacity` bytes.
    pub fn with_cache_capacity(source: S, layout: MetatileLayout, cache_capacity: usize) -> Self {
        Self {
            source,
            layout,
            cache: TileCache::with_capacity(cache_capacity),
        }
    }

    /// Serve one tile, from cache when possible.
    ///
    /// # Errors
    ///
    /// - [`TileError::InvalidConfigName`] for config names that are not a
    ///   single path segment
    /// - [`TileError::InvalidCoordinate`] for coordinates outside the zoom
    ///   level's range
    /// - [`TileError::Store`] when the container cannot be read
    /// - [`TileError::TileNotFound`] / [`TileError::InvalidTileData`] when
    ///   the container holds no usable PNG at the tile's index
    pub async fn get_tile(&self, request: TileRequest) -> Result<TileResponse, TileError> {
        if !is_safe_config_name(&request.config) {
            return Err(TileError::InvalidConfigName {
                name: request.config,
            });
        }

        let coord = request.coord;
        if !coord.is_valid() {
            return Err(TileError::InvalidCoordinate {
                z: coord.zoom.to_string(),
                x: coord.x.to_string(),
                y: coord.y.to_string(),
            });
        }

        let cache_key = TileCacheKey::new(request.config.as_str(), coord);

        if let Some(cached_data) = self.cache.get(&cache_key).await {
            return Ok(TileResponse {
                data: cached_data,
                cache_hit: true,
            });
        }

        // Miss: do the container read and scan, then remember the result
        let tile_data = self.load_tile(&request.config, coord).await?;

        self.cache.put(cache_key, tile_data.clone()).await;

        Ok(TileResponse {
            data: tile_data,
            cache_hit: false,
        })
    }

    /// Load and extract a tile without touching the cache.
    ///
    /// Reads the whole container, scans it for the tile's PNG stream and
    /// re-checks the signature on the extracted bytes before handing them
    /// out. The returned `Bytes` is a zero-copy view into the loaded
    /// container.
    pub async fn load_tile(&self, config: &str, coord: TileCoord) -> Result<Bytes, TileError> {
        let path = self.layout.meta_path(config, coord);
        let container = self.source.read_metatile(&path).await?;
        let index = self.layout.tile_index(coord);

        let Some(tile) = extract_tile(&container, index) else {
            return Err(TileError::TileNotFound {
                index,
                path: path.display().to_string(),
            });
        };

        if !has_png_signature(tile) {
            return Err(TileError::InvalidTileData {
                index,
                path: path.display().to_string(),
            });
        }

        Ok(container.slice_ref(tile))
    }

    /// List the render configs present at the cache root.
    pub async fn list_configs(&self) -> Result<Vec<String>, StoreError> {
        self.source.list_configs().await
    }

    /// Cache occupancy as `(current_size, capacity, entry_count)`.
    pub async fn cache_stats(&self) -> (usize, usize, usize) {
        let size = self.cache.size().await;
        let capacity = self.cache.capacity();
        let count = self.cache.len().await;
        (size, capacity, count)
    }

    /// Drop all cached tiles.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

// =============================================================================
// Tests
// =============================================================================
