//! # Metatile Server
//!
//! A read-side tile server for renderd/mod_tile metatile caches.
//!
//! renderd stores rendered map tiles in 8x8 batches: one `.meta` container
//! file per batch, placed in a hashed directory tree. Serving a single tile
//! therefore means resolving the container path from the tile coordinates,
//! reading the container and pulling the right embedded PNG back out. This
//! library does exactly that, behind a small HTTP API.
//!
//! ## Features
//!
//! - **Path resolution**: Pure arithmetic mapping from `(config, z, x, y)`
//!   to the container path and intra-file index
//! - **PNG extraction**: Single forward scan over the container, bounded by
//!   the requested index
//! - **Tile caching**: LRU cache of extracted tiles with size-based eviction
//! - **Uniform errors**: Every failed tile request answers 404, with the
//!   real cause kept to the logs
//!
//! ## Modules
//!
//! - [`coord`] - Tile coordinates and range validation
//! - [`meta`] - Metatile path layout and PNG extraction
//! - [`store`] - Storage access for container files
//! - [`tile`] - Tile service and caching
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use metatile_server::meta::MetatileLayout;
//! use metatile_server::server::{create_router, RouterConfig};
//! use metatile_server::store::FsMetatileSource;
//! use metatile_server::tile::TileService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let tile_dir = "/var/cache/renderd/tiles";
//!     let service = TileService::new(
//!         FsMetatileSource::new(tile_dir),
//!         MetatileLayout::new(tile_dir),
//!     );
//!     let router = create_router(service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod coord;
pub mod error;
pub mod meta;
pub mod server;
pub mod store;
pub mod tile;

pub use config::Config;
pub use coord::{TileCoord, MAX_ZOOM};
pub use error::{StoreError, TileError};
pub use meta::{
    extract_tile, has_png_signature, MetatileLayout, IEND_MARKER, IEND_TRAILER_LEN, METATILE_SIZE,
    PNG_SIGNATURE,
};
pub use server::{
    configs_handler, create_router, health_handler, tile_handler, AppState, ConfigsResponse,
    ErrorResponse, HealthResponse, RouterConfig, TilePathParams,
};
pub use store::{FsMetatileSource, MetatileSource};
pub use tile::{
    is_safe_config_name, TileCache, TileCacheKey, TileRequest, TileResponse, TileService,
    DEFAULT_TILE_CACHE_CAPACITY,
};
