//! Metatile container tests: path hashing and PNG stream extraction.
//!
//! Tests verify:
//! - The hashed directory layout for container paths
//! - Column-major slot indexing within the 8x8 block
//! - Stream scanning edge cases (leading header, missing IEND, truncation)

use std::path::Path;

use metatile_server::coord::TileCoord;
use metatile_server::meta::{
    extract_tile, has_png_signature, MetatileLayout, IEND_MARKER, METATILE_SIZE, PNG_SIGNATURE,
};

use super::test_utils::{fake_png, full_metatile, partial_metatile};

// =============================================================================
// Container Path Layout
// =============================================================================

#[test]
fn test_known_coordinate_path() {
    let layout = MetatileLayout::new("/tiles");
    let path = layout.meta_path("default", TileCoord::new(10, 500, 300));

    assert_eq!(path, Path::new("/tiles/default/10/0/0/17/242/8.meta"));
}

#[test]
fn test_block_resolves_to_single_container() {
    let layout = MetatileLayout::new("/tiles");
    let origin = layout.meta_path("default", TileCoord::new(10, 496, 296));

    for dx in 0..METATILE_SIZE {
        for dy in 0..METATILE_SIZE {
            let coord = TileCoord::new(10, 496 + dx, 296 + dy);
            assert_eq!(
                layout.meta_path("default", coord),
                origin,
                "Tile {} should live in the block's container",
                coord
            );
        }
    }
}

#[test]
fn test_adjacent_blocks_use_different_containers() {
    let layout = MetatileLayout::new("/tiles");

    let here = layout.meta_path("default", TileCoord::new(10, 496, 296));
    let right = layout.meta_path("default", TileCoord::new(10, 504, 296));
    let below = layout.meta_path("default", TileCoord::new(10, 496, 304));

    assert_ne!(here, right);
    assert_ne!(here, below);
}

#[test]
fn test_slot_index_is_column_major() {
    let layout = MetatileLayout::new("/tiles");

    assert_eq!(layout.tile_index(TileCoord::new(10, 496, 296)), 0);
    assert_eq!(layout.tile_index(TileCoord::new(10, 496, 297)), 1);
    assert_eq!(layout.tile_index(TileCoord::new(10, 497, 296)), 8);
    assert_eq!(layout.tile_index(TileCoord::new(10, 500, 300)), 36);
    assert_eq!(layout.tile_index(TileCoord::new(10, 503, 303)), 63);
}

// =============================================================================
// Stream Extraction
// =============================================================================

#[test]
fn test_extracts_every_slot() {
    let container = full_metatile();
    let slots = (METATILE_SIZE * METATILE_SIZE) as usize;

    for slot in 0..slots {
        let tile = extract_tile(&container, slot)
            .unwrap_or_else(|| panic!("Slot {} should be present", slot));
        assert_eq!(tile, &fake_png(slot as u8, 24)[..]);
        assert!(has_png_signature(tile));
    }
}

#[test]
fn test_header_block_before_first_stream_is_skipped() {
    // renderd writes a metadata header before the first PNG signature
    let mut container = vec![0x4D, 0x45, 0x54, 0x41, 0x00, 0x40, 0x00, 0x00];
    container.extend_from_slice(&fake_png(7, 16));

    let tile = extract_tile(&container, 0).unwrap();
    assert_eq!(tile, &fake_png(7, 16)[..]);
}

#[test]
fn test_index_beyond_last_stream_is_none() {
    let container = partial_metatile(8);

    assert!(extract_tile(&container, 7).is_some());
    assert!(extract_tile(&container, 8).is_none());
    assert!(extract_tile(&container, 63).is_none());

    // Even a full container has nothing at slot 64
    assert!(extract_tile(&full_metatile(), 64).is_none());
}

#[test]
fn test_stream_without_iend_is_none() {
    let mut container = Vec::new();
    container.extend_from_slice(&PNG_SIGNATURE);
    container.extend_from_slice(&[0x11; 32]);

    assert!(extract_tile(&container, 0).is_none());
}

#[test]
fn test_truncated_crc_is_none() {
    // Cut the container off in the middle of the final CRC
    let mut container = fake_png(3, 16);
    container.truncate(container.len() - 2);

    assert!(extract_tile(&container, 0).is_none());
}

#[test]
fn test_scan_stops_at_requested_index() {
    // Slots past the requested one may be garbage without affecting the result
    let mut container = partial_metatile(2);
    container.extend_from_slice(&PNG_SIGNATURE);
    container.extend_from_slice(&[0xFF; 10]); // dangling stream, no IEND

    let tile = extract_tile(&container, 1).unwrap();
    assert_eq!(tile, &fake_png(1, 24)[..]);
}

#[test]
fn test_extracted_bytes_are_exact_span() {
    let container = full_metatile();

    let tile = extract_tile(&container, 5).unwrap();
    assert!(tile.starts_with(&PNG_SIGNATURE));

    // Span ends right after the IEND chunk's CRC
    let crc_start = tile.len() - 4;
    assert_eq!(&tile[crc_start - IEND_MARKER.len()..crc_start], &IEND_MARKER);
    assert_eq!(&tile[crc_start..], &[0xAA, 0xBB, 0xCC, 0xDD]);
}
