//! Metatile server binary.
//!
//! Wires the filesystem store, layout, tile service and router together and
//! runs the listener until the process is killed.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metatile_server::{
    config::Config,
    meta::MetatileLayout,
    server::{create_router, RouterConfig},
    store::{FsMetatileSource, MetatileSource},
    tile::TileService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("metatile-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Tile directory: {}", config.tile_dir.display());
    info!(
        "  Cache: {}MB tiles, max-age {}s",
        config.cache_tiles / (1024 * 1024),
        config.cache_max_age
    );

    // Probe the tile directory up front so a bad tile_dir fails at startup
    // instead of as a stream of 404s later.
    let source = FsMetatileSource::new(&config.tile_dir);

    info!("");
    info!("Scanning tile directory...");
    match source.list_configs().await {
        Ok(configs) if configs.is_empty() => {
            warn!("  No render configs found in {}", config.tile_dir.display());
            warn!("  The server will answer 404 until renderd writes metatiles");
        }
        Ok(configs) => {
            info!(
                "  Found {} render config(s): {}",
                configs.len(),
                configs.join(", ")
            );
        }
        Err(e) => {
            error!("  Failed to read tile directory: {}", e);
            error!("");
            error!("  Please check:");
            error!(
                "    - The directory '{}' exists (renderd.conf tile_dir)",
                config.tile_dir.display()
            );
            error!("    - renderd has rendered at least one metatile");
            error!("    - This process has read permission on the tree");
            return ExitCode::FAILURE;
        }
    }

    let layout = MetatileLayout::new(&config.tile_dir);
    let tile_service = TileService::with_cache_capacity(source, layout, config.cache_tiles);
    let router = create_router(tile_service, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("Listening on http://{}", addr);
    info!("  health:  curl http://{}/health", addr);
    info!("  configs: curl http://{}/configs", addr);
    info!("  tiles:   curl http://{}/tiles/<config>/<z>/<x>/<y>.png", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Set up the tracing subscriber. `RUST_LOG` wins over the `--verbose` flag.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "metatile_server=debug,tower_http=debug"
    } else {
        "metatile_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
