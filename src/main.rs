use anyhow::Result;
use need_coffee::{NeedCoffeeConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NeedCoffeeConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!(
        version = need_coffee::VERSION,
        environment = %config.server.environment,
        "Starting need-coffee"
    );

    web::run(&config).await
}
