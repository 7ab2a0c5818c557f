//! Process configuration.
//!
//! Every setting is a clap flag with a `METATILE_`-prefixed environment
//! variable fallback and a default that works against a stock renderd
//! install, so `metatile-server` with no arguments is a valid invocation
//! on a render host.
//!
//! ```ignore
//! use metatile_server::config::Config;
//!
//! let config = Config::parse();
//! println!("Listening on {}", config.bind_address());
//! println!("Tile cache: {}", config.tile_dir.display());
//! ```
//!
//! | Variable                 | Meaning                              | Default                    |
//! |--------------------------|--------------------------------------|----------------------------|
//! | `METATILE_HOST`          | Bind address                         | `0.0.0.0`                  |
//! | `METATILE_PORT`          | Bind port                            | `3000`                     |
//! | `METATILE_TILE_DIR`      | renderd tile cache root              | `/var/cache/renderd/tiles` |
//! | `METATILE_CACHE_TILES`   | In-memory tile cache size in bytes   | 100MB                      |
//! | `METATILE_CACHE_MAX_AGE` | `Cache-Control: max-age` for tiles   | `3600`                     |
//! | `METATILE_CORS_ORIGINS`  | Comma-separated CORS origin list     | any origin                 |

use std::path::PathBuf;

use clap::Parser;

use crate::tile::DEFAULT_TILE_CACHE_CAPACITY;

// =============================================================================
// Default Values
// =============================================================================

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 3000;

/// Where stock renderd.conf points its tile_dir.
pub const DEFAULT_TILE_DIR: &str = "/var/cache/renderd/tiles";

/// One hour, in seconds.
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Metatile Server - serves single tiles out of a renderd metatile cache.
///
/// Reads the `.meta` container files renderd maintains on disk, extracts the
/// requested PNG tile and serves it over HTTP. The cache is never written to.
#[derive(Parser, Debug, Clone)]
#[command(name = "metatile-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "METATILE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "METATILE_PORT")]
    pub port: u16,

    /// Root of the renderd tile cache (the tile_dir setting in renderd.conf).
    #[arg(long, default_value = DEFAULT_TILE_DIR, env = "METATILE_TILE_DIR")]
    pub tile_dir: PathBuf,

    /// Maximum bytes of extracted tiles to keep in the in-memory cache.
    #[arg(long, default_value_t = DEFAULT_TILE_CACHE_CAPACITY, env = "METATILE_CACHE_TILES")]
    pub cache_tiles: usize,

    /// HTTP Cache-Control max-age in seconds for tile responses.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "METATILE_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Comma-separated CORS origin allowlist. Omit to allow any origin.
    #[arg(long, env = "METATILE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Log at debug level instead of info.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable per-request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Reject settings clap cannot catch on its own.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_dir.as_os_str().is_empty() {
            return Err(
                "Tile directory is required. Set --tile-dir or METATILE_TILE_DIR".to_string(),
            );
        }

        if self.cache_tiles == 0 {
            return Err("cache_tiles must be greater than 0".to_string());
        }

        Ok(())
    }

    /// The "host:port" string to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
