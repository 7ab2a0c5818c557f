//! Metatile path layout for the renderd on-disk cache.
//!
//! renderd does not store one file per tile. Tiles are grouped into 8x8
//! blocks ("metatiles") and each block lives in a single `.meta` file whose
//! location is derived from the block's coordinates:
//!
//! ```text
//! {base_dir}/{config}/{zoom}/{h4}/{h3}/{h2}/{h1}/{h0}.meta
//! ```
//!
//! Each `h` component is one byte of a positional hash of the
//! metatile-aligned `(x, y)`. The hash packs one 4-bit nibble of x and one
//! of y per byte, least-significant nibbles first, which keeps directory
//! fan-out bounded at any zoom level.
//!
//! # Worked Example
//!
//! For `z=10, x=500, y=300` the metatile origin is `(496, 296)`, the hash
//! bytes come out as `[8, 242, 17, 0, 0]`, and the tile resolves to
//! `{base_dir}/{config}/10/0/0/17/242/8.meta` at index 36 within the file.

use std::path::{Path, PathBuf};

use crate::coord::TileCoord;

// =============================================================================
// Constants
// =============================================================================

/// Tiles per metatile side. A container holds `8 * 8 = 64` embedded tiles.
pub const METATILE_SIZE: u32 = 8;

/// Number of bytes in the location hash. Five bytes cover 20-bit
/// coordinates, enough for zoom 20.
const HASH_LEN: usize = 5;

// =============================================================================
// MetatileLayout
// =============================================================================

/// Maps tile coordinates to metatile file paths and intra-file indices.
///
/// The mapping is pure arithmetic: it is defined for any coordinate values
/// and never touches the filesystem. Range validation happens upstream in
/// the tile service.
#[derive(Debug, Clone)]
pub struct MetatileLayout {
    base_dir: PathBuf,
    meta_size: u32,
}

impl MetatileLayout {
    /// Create a layout rooted at `base_dir` with the standard 8x8 grouping.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            meta_size: METATILE_SIZE,
        }
    }

    /// Root directory of the tile cache.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Index of a tile inside its metatile, column-major.
    ///
    /// The metatile origin `(0, 0)` maps to 0, `(0, 1)` to 1, and `(7, 7)`
    /// to 63 for the standard size.
    pub fn tile_index(&self, coord: TileCoord) -> usize {
        let mask = self.meta_size - 1;
        ((coord.x & mask) * self.meta_size + (coord.y & mask)) as usize
    }

    /// Path of the `.meta` file holding `coord` for the given render config.
    ///
    /// All 64 tiles of a metatile resolve to the identical path; they differ
    /// only in [`tile_index`](Self::tile_index).
    pub fn meta_path(&self, config: &str, coord: TileCoord) -> PathBuf {
        let hash = self.location_hash(coord.x, coord.y);

        let mut path = self.base_dir.join(config);
        path.push(coord.zoom.to_string());
        // Directory levels consume the hash most-significant byte first;
        // the least-significant byte names the file itself.
        for byte in hash[1..].iter().rev() {
            path.push(byte.to_string());
        }
        path.push(format!("{}.meta", hash[0]));
        path
    }

    /// Positional hash of the metatile-aligned coordinates.
    ///
    /// Byte `i` packs nibble `i` of the aligned x (high half) with nibble
    /// `i` of the aligned y (low half).
    fn location_hash(&self, x: u32, y: u32) -> [u8; HASH_LEN] {
        let mask = self.meta_size - 1;
        let mut meta_x = x & !mask;
        let mut meta_y = y & !mask;

        let mut hash = [0u8; HASH_LEN];
        for byte in &mut hash {
            *byte = (((meta_x & 0x0F) << 4) | (meta_y & 0x0F)) as u8;
            meta_x >>= 4;
            meta_y >>= 4;
        }
        hash
    }
}

// =============================================================================
// Tests
// =============================================================================
