use thiserror::Error;

/// Errors that can occur when reading metatile containers from storage
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No metatile file exists at the resolved path
    #[error("Metatile not found: {0}")]
    NotFound(String),

    /// Metatile file exists but could not be read
    #[error("Cannot read metatile {path}: {message}")]
    Unreadable { path: String, message: String },
}

/// Errors that can occur while serving a tile request
///
/// All variants map to HTTP 404: the transport never reveals whether a tile
/// is missing, malformed, or out of range. The variants exist so logs can
/// tell those cases apart.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Coordinates are out of range or not numeric
    #[error("Invalid tile coordinates: z={z} x={x} y={y}")]
    InvalidCoordinate { z: String, x: String, y: String },

    /// Render config name is empty or not a single safe path segment
    #[error("Invalid render config name: {name:?}")]
    InvalidConfigName { name: String },

    /// Storage error while loading the container
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Container holds fewer embedded tiles than the requested index
    #[error("Tile {index} not present in metatile {path}")]
    TileNotFound { index: usize, path: String },

    /// Extracted bytes do not start with the PNG signature
    #[error("Tile {index} in metatile {path} is not a valid PNG")]
    InvalidTileData { index: usize, path: String },
}
