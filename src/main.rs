use std::time::Duration;

use tracing_subscriber::EnvFilter;

use cinematch_api::{
    cache::TtlCache, config::Config, db::create_pool, routes::create_router, state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Connected to PostgreSQL");

    let cache = TtlCache::new();
    let sweeper = cache.spawn_sweeper(Duration::from_secs(config.cache_sweep_interval_secs));

    let state = AppState::from_config(&config, pool, cache)?;
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    sweeper.shutdown().await;

    Ok(())
}
