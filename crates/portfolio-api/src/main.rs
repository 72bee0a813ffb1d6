use portfolio_api::Server;
use portfolio_core::ConfigManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "info,portfolio_api=debug,portfolio_core=debug,\
portfolio_sources=debug,portfolio_ai=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConfigManager::load()?;
    let server = Server::new(&config)?;
    server.run().await
}
