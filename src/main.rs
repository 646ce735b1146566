use std::io;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zt_lookup::app_config::AppConfig;
use zt_lookup::cloudflare::{ZeroTrustApi, new_client};
use zt_lookup::console;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let api = ZeroTrustApi::new(new_client(&config)?, &config);

    let exit_code = console::run(&api, &mut io::stdin().lock(), &mut io::stdout().lock()).await?;
    Ok(exit_code)
}
