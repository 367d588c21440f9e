use anyhow::Result;
use tracing::info;
use wanderlens::{SiteConfig, VERSION, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = SiteConfig::load()?;
    telemetry::init(&config.logging)?;

    info!(version = VERSION, "Starting Wander Lens Tours site");
    web::run(config).await
}
