use std::sync::Arc;

use tracing::info;

use starforge_economy_server::{api, reward::RewardSampler, storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    info!("Starting Starforge Economy Server...");

    // ========================================================================
    // 1. Storage (environment-driven configuration, seeded catalog + ledger)
    // ========================================================================
    let lmdb_path = std::env::var("LMDB_PATH").unwrap_or_else(|_| "data/catalog".to_string());
    let lmdb_max_size: usize = {
        let raw = std::env::var("LMDB_MAX_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(50_000_000);
        // LMDB requires map size to be a multiple of the OS page size (4096)
        let page_size = 4096_usize;
        (raw + page_size - 1) / page_size * page_size
    };

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/economy.db?mode=rwc".to_string());
    let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let fee_rate: f64 = std::env::var("MARKET_FEE_RATE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.10);

    if let Some(dir) = database_url
        .strip_prefix("sqlite://")
        .and_then(|p| std::path::Path::new(p.split('?').next().unwrap_or(p)).parent())
    {
        std::fs::create_dir_all(dir)?;
    }

    let (catalog, ledger) = storage::init_storage(
        &lmdb_path,
        lmdb_max_size,
        &database_url,
        max_connections,
        fee_rate,
    )
    .await?;
    info!(
        "Storage initialized at {} / {} (fee rate {:.0}%)",
        lmdb_path,
        database_url,
        fee_rate * 100.0
    );

    // ========================================================================
    // 2. Reward sampler snapshot from the catalog
    // ========================================================================
    let sampler = Arc::new(RewardSampler::new());
    sampler.refresh(&catalog)?;
    info!("Reward sampler table built ({} items)", sampler.table_len());

    // ========================================================================
    // 3. HTTP API server
    // ========================================================================
    let port: u16 = std::env::var("API_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(50051);

    api::start_api_server(catalog, ledger, sampler, port)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
