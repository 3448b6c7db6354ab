//! Binary entrypoint for the Textflow API server.
use anyhow::Context;
use textflow_api::{init_tracing, run, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // TEXTFLOW_CONFIG selects a YAML file, TEXTFLOW_ADDR overrides host:port
    let config = ServiceConfig::from_env().context("failed to load configuration")?;
    init_tracing(config.log_level);
    run(config).await
}
