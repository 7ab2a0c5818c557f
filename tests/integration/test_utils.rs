//! Test utilities for integration tests.
//!
//! This module provides mock implementations and helper functions for building
//! metatile containers out of fake PNG streams.

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use metatile_server::coord::TileCoord;
use metatile_server::error::StoreError;
use metatile_server::meta::{MetatileLayout, IEND_MARKER, METATILE_SIZE, PNG_SIGNATURE};
use metatile_server::store::MetatileSource;
use metatile_server::tile::TileService;
use metatile_server::{create_router, RouterConfig};

/// Base directory every mock-backed layout resolves paths against.
pub const MOCK_TILE_BASE: &str = "/tiles";

// =============================================================================
// Fake PNG Streams
// =============================================================================

/// Build a minimal PNG-shaped byte stream.
///
/// The container scanner only looks at the signature and the IEND marker, so
/// the body is an arbitrary fill pattern rather than real image data.
pub fn fake_png(fill: u8, payload_len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(PNG_SIGNATURE.len() + payload_len + 8);
    data.extend_from_slice(&PNG_SIGNATURE);
    data.extend(std::iter::repeat(fill).take(payload_len));
    data.extend_from_slice(&IEND_MARKER);
    data.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]); // IEND CRC
    data
}

/// Build a container holding every slot of an 8x8 metatile.
///
/// Each stream's fill byte equals its slot index, so a test can tell exactly
/// which tile came back.
pub fn full_metatile() -> Vec<u8> {
    let slots = (METATILE_SIZE * METATILE_SIZE) as usize;
    partial_metatile(slots)
}

/// Build a container holding only the first `count` streams.
pub fn partial_metatile(count: usize) -> Vec<u8> {
    let mut container = Vec::new();
    for slot in 0..count {
        container.extend_from_slice(&fake_png(slot as u8, 24));
    }
    container
}

/// Check that response bytes look like one of our PNG streams: signature at
/// the front, IEND marker followed by its CRC at the back.
pub fn is_valid_png(data: &[u8]) -> bool {
    if data.len() < PNG_SIGNATURE.len() + IEND_MARKER.len() + 4 {
        return false;
    }
    let crc_start = data.len() - 4;
    let iend_start = crc_start - IEND_MARKER.len();
    data.starts_with(&PNG_SIGNATURE) && data[iend_start..crc_start] == IEND_MARKER
}

// =============================================================================
// Mock Metatile Source
// =============================================================================

/// A mock metatile source that serves pre-configured containers.
///
/// Containers are keyed by the same hashed path a real tile directory would
/// use, so the mock exercises the full path-resolution chain. Reads are
/// counted so cache tests can verify the store is not hit twice.
pub struct MockMetatileSource {
    files: HashMap<PathBuf, Bytes>,
    unreadable: HashSet<PathBuf>,
    configs: Vec<String>,
    read_count: Arc<AtomicUsize>,
}

impl MockMetatileSource {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            unreadable: HashSet::new(),
            configs: Vec::new(),
            read_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register a container for the metatile covering `(zoom, x, y)`.
    ///
    /// Any of the 64 tiles in that metatile's 8x8 block will resolve to it.
    pub fn with_metatile(
        mut self,
        config: &str,
        zoom: u32,
        x: u32,
        y: u32,
        data: Vec<u8>,
    ) -> Self {
        let path = mock_meta_path(config, zoom, x, y);
        self.files.insert(path, Bytes::from(data));
        self
    }

    /// Mark the metatile covering `(zoom, x, y)` as present but unreadable.
    pub fn with_unreadable_metatile(mut self, config: &str, zoom: u32, x: u32, y: u32) -> Self {
        let path = mock_meta_path(config, zoom, x, y);
        self.unreadable.insert(path);
        self
    }

    /// Register a render config for `list_configs`.
    pub fn with_config(mut self, name: &str) -> Self {
        self.configs.push(name.to_string());
        self
    }

    /// Number of `read_metatile` calls that reached this source.
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }
}

impl Default for MockMetatileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockMetatileSource {
    fn clone(&self) -> Self {
        Self {
            files: self.files.clone(),
            unreadable: self.unreadable.clone(),
            configs: self.configs.clone(),
            read_count: Arc::clone(&self.read_count),
        }
    }
}

#[async_trait]
impl MetatileSource for MockMetatileSource {
    async fn read_metatile(&self, path: &Path) -> Result<Bytes, StoreError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);

        if self.unreadable.contains(path) {
            return Err(StoreError::Unreadable {
                path: path.display().to_string(),
                message: "permission denied".to_string(),
            });
        }

        match self.files.get(path) {
            Some(data) => Ok(data.clone()),
            None => Err(StoreError::NotFound(path.display().to_string())),
        }
    }

    async fn list_configs(&self) -> Result<Vec<String>, StoreError> {
        let mut configs = self.configs.clone();
        configs.sort();
        Ok(configs)
    }
}

// =============================================================================
// Router Construction
// =============================================================================

/// Layout rooted at the mock base directory.
pub fn mock_layout() -> MetatileLayout {
    MetatileLayout::new(MOCK_TILE_BASE)
}

/// Resolve the container path the service will look up for `(zoom, x, y)`.
pub fn mock_meta_path(config: &str, zoom: u32, x: u32, y: u32) -> PathBuf {
    mock_layout().meta_path(config, TileCoord::new(zoom, x, y))
}

/// Build a router over a mock source with default settings.
pub fn test_router(source: MockMetatileSource) -> Router {
    let tile_service = TileService::new(source, mock_layout());
    create_router(tile_service, RouterConfig::new())
}
