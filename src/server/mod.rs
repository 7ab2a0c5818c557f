//! HTTP layer.
//!
//! [`handlers`] holds the Axum handlers and the uniform-404 error mapping;
//! [`routes`] assembles them into a router with CORS and tracing. Everything
//! underneath (path math, container scanning, caching) lives in the `meta`,
//! `store` and `tile` modules.

pub mod handlers;
pub mod routes;

pub use handlers::{
    configs_handler, health_handler, tile_handler, AppState, ConfigsResponse, ErrorResponse,
    HealthResponse, TilePathParams,
};
pub use routes::{create_router, RouterConfig};
