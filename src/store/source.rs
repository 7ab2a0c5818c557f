use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Trait for reading metatile containers from a tile cache.
///
/// The service hands implementations a fully resolved container path and
/// expects the complete file back. Containers cap out at 64 tile images, so
/// whole-file reads are cheap and keep the extraction scan a pure in-memory
/// operation. Implementations must be thread-safe.
#[async_trait]
pub trait MetatileSource: Send + Sync {
    /// Read a metatile container in full.
    ///
    /// Returns [`StoreError::NotFound`] when no file exists at `path`, which
    /// for a renderd cache simply means the metatile was never rendered.
    async fn read_metatile(&self, path: &Path) -> Result<Bytes, StoreError>;

    /// List the render config names available at the cache root.
    ///
    /// Each config is one top-level directory renderd writes into.
    async fn list_configs(&self) -> Result<Vec<String>, StoreError>;
}
