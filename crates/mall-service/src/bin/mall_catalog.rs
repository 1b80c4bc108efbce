//! Catalog smoke runner.
//!
//! Loads configuration, connects to MySQL, checks the connection, and reads
//! the catalog twice through the caching decorators.

use mall_config::ConfigLoader;
use mall_core::telemetry::init_logging;
use mall_core::MallResult;
use mall_repository::DatabasePoolInterface;
use mall_service::di::build_catalog_module;
use mall_service::{CacheStore, Catalog, DatabaseResolver};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Catalog check failed: {}", e);
        eprintln!("Catalog check failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> MallResult<()> {
    let loader = ConfigLoader::from_default_location()?;
    let config = loader.get().await;
    init_logging(&config.observability.logging())?;

    info!("Starting {} ({})", config.app.name, config.app.environment);

    let module = build_catalog_module(&config).await?;
    let pool = module.database_pool();
    pool.health_check().await?;
    info!(
        "Catalog connected (cache enabled: {}, size limit: {})",
        config.cache.enabled, config.cache.size_limit
    );

    let catalog = Catalog::from_module(module.as_ref());
    for pass in 1..=2 {
        let categories = catalog.categories.get_all_categories().await?;
        let products = catalog.products.get_all_products().await?;
        info!(
            "Pass {}: {} categories, {} products",
            pass,
            categories.len(),
            products.len()
        );
    }

    let stats = catalog.cache.stats();
    info!(
        "Cache: {} hits, {} misses, {} entries, weight {}",
        stats.hits, stats.misses, stats.entry_count, stats.total_weight
    );

    pool.close().await;
    Ok(())
}
