//! Storage access for metatile containers.
//!
//! The tile service reads whole `.meta` files through the [`MetatileSource`]
//! trait. Production runs on [`FsMetatileSource`] over the local directory
//! renderd renders into; tests swap in an in-memory source.

pub mod fs;
pub mod source;

pub use fs::FsMetatileSource;
pub use source::MetatileSource;
