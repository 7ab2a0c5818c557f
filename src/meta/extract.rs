//! PNG extraction from metatile containers.
//!
//! A `.meta` file is a concatenation of up to 64 complete PNG streams. This
//! reader ignores the header block renderd writes at the front of the file
//! and relies only on the streams themselves: each one starts with the fixed
//! 8-byte PNG signature and ends with its IEND chunk.
//!
//! # Stream Boundaries
//!
//! 1. A stream begins at the PNG signature (89 50 4E 47 0D 0A 1A 0A)
//! 2. It ends at the first `IEND` after that signature, plus the 4-byte
//!    chunk CRC that follows the marker
//!
//! Extraction is a single forward scan delimiting one stream at a time, so
//! the cost is proportional to the requested index, not to the container
//! size. The scan trusts that `IEND` never appears inside compressed image
//! data before the real end chunk, which holds for PNGs renderd writes.

// =============================================================================
// PNG Markers
// =============================================================================

/// PNG file signature, the first 8 bytes of every embedded tile
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// ASCII "IEND", the chunk type that terminates a PNG stream
pub const IEND_MARKER: [u8; 4] = [0x49, 0x45, 0x4E, 0x44];

/// Bytes after the IEND marker that still belong to the stream (the chunk CRC)
pub const IEND_TRAILER_LEN: usize = 4;

// =============================================================================
// Container Scanning
// =============================================================================

/// Find the next occurrence of `needle` in `haystack` at or after `from`.
///
/// Byte-wise comparison only; the haystack is binary data and may contain
/// NUL bytes or arbitrary values.
fn find_marker(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

/// Check if `data` begins with the PNG signature.
pub fn has_png_signature(data: &[u8]) -> bool {
    data.len() >= PNG_SIGNATURE.len() && data[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

/// Extract the `index`-th embedded PNG stream from a metatile container.
///
/// Streams are counted from 0 in file order. The scan stops as soon as the
/// requested stream is delimited; bytes past it are never examined.
///
/// # Arguments
/// * `container` - Raw bytes of a `.meta` file
/// * `index` - Position of the wanted tile within the container (0..=63 for
///   the standard layout)
///
/// # Returns
/// The stream's bytes, from its signature through its IEND CRC. `None` when
/// the container holds fewer streams than `index + 1`, or when the scan hits
/// a malformed stream first: a signature with no following `IEND`, or an
/// `IEND` whose CRC would run past the end of the buffer.
pub fn extract_tile(container: &[u8], index: usize) -> Option<&[u8]> {
    let mut cursor = 0;
    let mut found = 0;

    loop {
        let start = find_marker(container, &PNG_SIGNATURE, cursor)?;
        let iend = find_marker(container, &IEND_MARKER, start)?;

        let end = iend + IEND_MARKER.len() + IEND_TRAILER_LEN;
        if end > container.len() {
            // Truncated mid-CRC; nothing past here can be a whole stream
            return None;
        }

        if found == index {
            return Some(&container[start..end]);
        }

        found += 1;
        cursor = end;
    }
}

// =============================================================================
// Tests
// =============================================================================
