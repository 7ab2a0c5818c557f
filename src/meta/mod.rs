//! The renderd metatile container format.
//!
//! renderd groups rendered tiles into 8x8 "metatiles" and stores each group
//! as a single `.meta` file under a hashed directory tree. This module covers
//! both halves of reading that layout back:
//!
//! - [`MetatileLayout`] resolves `(zoom, x, y)` to the container path and the
//!   tile's index within it
//! - [`extract_tile`] pulls the n-th embedded PNG back out of a container's
//!   bytes
//!
//! Only the stock PNG container layout is handled; compressed or
//! custom-format metatiles are out of scope.

pub mod extract;
pub mod layout;

pub use extract::{extract_tile, has_png_signature, IEND_MARKER, IEND_TRAILER_LEN, PNG_SIGNATURE};
pub use layout::{MetatileLayout, METATILE_SIZE};
