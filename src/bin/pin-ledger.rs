use anyhow::Result;
use pin_ledger::service::{Service, ServiceConfig, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let config = ServiceConfig::from_env()?;
    Service::new(config).run().await
}
