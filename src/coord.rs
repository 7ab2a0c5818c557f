//! Tile coordinates in the slippy-map tiling scheme.
//!
//! A tile is addressed by `(zoom, x, y)` where zoom level `z` holds a
//! `2^z x 2^z` grid. renderd caps the tree depth at zoom 20, so that is
//! the ceiling here as well.

use std::fmt;

/// Highest zoom level the server will resolve.
pub const MAX_ZOOM: u32 = 20;

/// Address of a single tile: zoom level plus grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub zoom: u32,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(zoom: u32, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Check that the zoom is within the ceiling and both axes fall inside
    /// the `2^zoom` grid.
    pub fn is_valid(&self) -> bool {
        if self.zoom > MAX_ZOOM {
            return false;
        }
        let max = (1u32 << self.zoom) - 1;
        self.x <= max && self.y <= max
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
