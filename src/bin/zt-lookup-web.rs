use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zt_lookup::app_config::AppConfig;
use zt_lookup::cloudflare::{ZeroTrustApi, new_client};
use zt_lookup::web::build_router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let api = ZeroTrustApi::new(new_client(&config)?, &config);
    let app = build_router(api);

    let listener = TcpListener::bind(config.web().bind_address()).await?;
    info!("🔥 {} is listening on http://{}", env!("CARGO_PKG_NAME"), listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
