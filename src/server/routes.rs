//! HTTP route table and middleware assembly.
//!
//! Three routes are exposed:
//!
//! ```text
//! GET /tiles/{config}/{z}/{x}/{y}.png   Tile lookup (".png" suffix optional)
//! GET /configs                          Render configs currently on disk
//! GET /health                           Liveness probe
//! ```
//!
//! # Example
//!
//! ```ignore
//! use metatile_server::meta::MetatileLayout;
//! use metatile_server::server::routes::{create_router, RouterConfig};
//! use metatile_server::store::FsMetatileSource;
//! use metatile_server::tile::TileService;
//!
//! let source = FsMetatileSource::new("/var/cache/renderd/tiles");
//! let layout = MetatileLayout::new("/var/cache/renderd/tiles");
//! let service = TileService::new(source, layout);
//!
//! let router = create_router(
//!     service,
//!     RouterConfig::new().with_cors_origins(vec!["https://maps.example.org".into()]),
//! );
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{configs_handler, health_handler, tile_handler, AppState};
use crate::store::MetatileSource;
use crate::tile::TileService;

// =============================================================================
// Router Configuration
// =============================================================================

/// Knobs for router assembly.
#[derive(Clone)]
pub struct RouterConfig {
    /// CORS origin allowlist. `None` admits any origin.
    pub cors_origins: Option<Vec<String>>,

    /// `max-age` value for the `Cache-Control` header on tile responses
    pub cache_max_age: u32,

    /// Attach a `tower_http` trace layer to every request
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Default configuration: no origin allowlist (any origin may call),
    /// 1 hour tile `max-age`. Tracing is enabled.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            cache_max_age: 3600,
            enable_tracing: true,
        }
    }

    /// Restrict CORS to the given origins.
    ///
    /// An empty list means no cross-origin access at all. To go back to
    /// admitting any origin use [`with_cors_any_origin`](Self::with_cors_any_origin).
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Admit any CORS origin (the default).
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Override the `Cache-Control: max-age` sent with tile responses.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Turn request tracing on or off.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Assemble the application router around a [`TileService`].
///
/// The returned router carries CORS (and, unless disabled, request tracing)
/// and owns the service through its shared [`AppState`].
pub fn create_router<S>(tile_service: TileService<S>, config: RouterConfig) -> Router
where
    S: MetatileSource + 'static,
{
    let state = AppState::with_cache_max_age(tile_service, config.cache_max_age);
    let cors = build_cors_layer(&config);

    // {filename} instead of {y}.png so bare "300" and "300.png" both match;
    // the handler strips the extension itself.
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/tiles/{config}/{z}/{x}/{filename}", get(tile_handler::<S>))
        .route("/configs", get(configs_handler::<S>))
        .with_state(state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Translate the origin allowlist into a [`CorsLayer`].
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        // No allowlist configured
        None => cors.allow_origin(Any),
        // Empty allowlist: leaving allow_origin unset denies every
        // cross-origin caller
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let allowed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(allowed)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
