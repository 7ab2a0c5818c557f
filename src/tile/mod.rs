//! Tile service layer.
//!
//! Sits between the HTTP handlers and the metatile store. A request for one
//! tile flows through [`TileService::get_tile`](TileService::get_tile) as:
//!
//! ```text
//! (config, zoom, x, y)
//!     -> TileCache probe (extracted PNGs, byte-bounded LRU)
//!     -> MetatileLayout (container path + slot index)
//!     -> MetatileSource::read_metatile
//!     -> extract_tile scan, result cached and returned
//! ```
//!
//! [`TileCache`] holds finished tiles so repeat requests skip the container
//! read and scan. [`TileRequest`] and [`TileResponse`] are the service's
//! in/out types; [`is_safe_config_name`] is the gate every config name passes
//! before it is allowed anywhere near a filesystem path.
//!
//! # Example
//!
//! ```
//! use metatile_server::coord::TileCoord;
//! use metatile_server::tile::{TileCache, TileCacheKey};
//! use bytes::Bytes;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = TileCache::with_capacity(50 * 1024 * 1024);
//!     let key = TileCacheKey::new("default", TileCoord::new(10, 500, 300));
//!
//!     if let Some(cached_tile) = cache.get(&key).await {
//!         println!("Cache hit: {} bytes", cached_tile.len());
//!     } else {
//!         let tile_data = Bytes::from(vec![/* PNG data */]);
//!         cache.put(key, tile_data).await;
//!     }
//! }
//! ```

mod cache;
mod service;

pub use cache::{TileCache, TileCacheKey, DEFAULT_TILE_CACHE_CAPACITY};
pub use service::{is_safe_config_name, TileRequest, TileResponse, TileService};
