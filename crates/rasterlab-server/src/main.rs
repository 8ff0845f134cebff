//! Remote execution TCP server for the workbench.

use rasterlab_server::config::Config;
use rasterlab_server::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(
        "starting rasterlab-server on {} (max_clients = {})",
        config.socket_addr_string(),
        config.max_clients
    );

    server::run(config).await
}
