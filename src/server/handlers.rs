//! Axum handlers for the tile API.
//!
//! The tile endpoint deliberately collapses every failure into `404 Not
//! Found` with a small JSON body. Callers cannot tell a missing metatile
//! from bad coordinates, an unknown config or a corrupt container; the
//! distinction only shows up in the logs. `/health` and `/configs` are the
//! two JSON side doors next to it.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::coord::TileCoord;
use crate::error::{StoreError, TileError};
use crate::store::MetatileSource;
use crate::tile::{TileRequest, TileService};

// =============================================================================
// Application State
// =============================================================================

/// State handed to every handler: the tile service plus the response
/// `Cache-Control` policy.
pub struct AppState<S: MetatileSource> {
    pub tile_service: Arc<TileService<S>>,

    /// Seconds to put in `Cache-Control: public, max-age=...` on tile hits
    pub cache_max_age: u32,
}

impl<S: MetatileSource> AppState<S> {
    /// State with the default 1 hour `max-age`.
    pub fn new(tile_service: TileService<S>) -> Self {
        Self::with_cache_max_age(tile_service, 3600)
    }

    pub fn with_cache_max_age(tile_service: TileService<S>, cache_max_age: u32) -> Self {
        Self {
            tile_service: Arc::new(tile_service),
            cache_max_age,
        }
    }
}

// Manual impl: a derived Clone would demand S: Clone, which the Arc makes
// unnecessary.
impl<S: MetatileSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            tile_service: Arc::clone(&self.tile_service),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/tiles/{config}/{z}/{x}/{filename}`
/// where filename is `{y}` or `{y}.png`
///
/// The coordinate segments stay raw strings here so non-numeric junk like
/// `/tiles/default/abc/0/0.png` runs through the normal error path instead
/// of an Axum extractor rejection.
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Render config name (e.g., "default")
    pub config: String,

    /// Zoom level segment
    pub z: String,

    /// Tile X coordinate segment
    pub x: String,

    /// Tile Y coordinate with optional .png extension (e.g., "300" or "300.png")
    pub filename: String,
}

impl TilePathParams {
    /// The Y segment with any .png extension stripped.
    fn y_str(&self) -> &str {
        self.filename
            .strip_suffix(".png")
            .unwrap_or(&self.filename)
    }

    /// Parse the coordinate triple from the path segments.
    pub fn coord(&self) -> Result<TileCoord, TileError> {
        let invalid = || TileError::InvalidCoordinate {
            z: self.z.clone(),
            x: self.x.clone(),
            y: self.y_str().to_string(),
        };

        let zoom = self.z.parse().map_err(|_| invalid())?;
        let x = self.x.parse().map_err(|_| invalid())?;
        let y = self.y_str().parse().map_err(|_| invalid())?;
        Ok(TileCoord::new(zoom, x, y))
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON body attached to every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable tag ("not_found", "invalid_coordinates", ...)
    pub error: String,

    /// Free-text description for humans
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of `GET /configs`.
#[derive(Debug, Serialize)]
pub struct ConfigsResponse {
    /// Render config names found at the cache root
    pub configs: Vec<String>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Every [`TileError`] becomes `404 Not Found` with a JSON body; the response
/// never distinguishes a missing metatile from bad coordinates or a corrupt
/// container. Logging carries the distinction instead:
/// - unreadable storage is logged at ERROR (operator problem)
/// - corrupt tile bytes at WARN
/// - routine misses and bad requests at DEBUG (common and expected)
impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let status = StatusCode::NOT_FOUND;

        let error_type = match &self {
            TileError::InvalidCoordinate { .. } => "invalid_coordinates",
            TileError::InvalidConfigName { .. } => "invalid_config",
            TileError::Store(StoreError::NotFound(_)) => "not_found",
            TileError::Store(StoreError::Unreadable { .. }) => "storage_error",
            TileError::TileNotFound { .. } => "not_found",
            TileError::InvalidTileData { .. } => "invalid_tile",
        };
        let message = self.to_string();

        match &self {
            TileError::Store(StoreError::Unreadable { .. }) => {
                error!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Storage error: {}",
                    message
                );
            }
            TileError::InvalidTileData { .. } => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Corrupt tile: {}",
                    message
                );
            }
            _ => {
                debug!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Tile not served: {}",
                    message
                );
            }
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /tiles/{config}/{z}/{x}/{y}.png`
///
/// Parses the coordinate segments, asks the service for the tile and wraps
/// the PNG bytes in an HTTP response. On success the response carries
/// `Content-Type: image/png`, `Cache-Control: public, max-age=...` and an
/// `X-Tile-Cache-Hit` marker; on any failure the [`TileError`] conversion
/// above produces the uniform 404.
pub async fn tile_handler<S: MetatileSource>(
    State(state): State<AppState<S>>,
    Path(params): Path<TilePathParams>,
) -> Result<Response, TileError> {
    let coord = params.coord()?;

    let request = TileRequest {
        config: params.config,
        coord,
    };

    let response = state.tile_service.get_tile(request).await?;

    let http_response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )
        .header("X-Tile-Cache-Hit", response.cache_hit.to_string())
        .body(axum::body::Body::from(response.data))
        .unwrap();

    Ok(http_response)
}

/// `GET /health`
///
/// Always `200 OK` with `{"status": "healthy", "version": ...}`. Does not
/// touch the tile directory; liveness only.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /configs`
///
/// Lists the render config directories present at the cache root. Storage
/// failures surface as 404 like every other error here.
pub async fn configs_handler<S: MetatileSource>(
    State(state): State<AppState<S>>,
) -> Result<Json<ConfigsResponse>, TileError> {
    let configs = state.tile_service.list_configs().await?;
    Ok(Json(ConfigsResponse { configs }))
}

// =============================================================================
// Tests
// =============================================================================
