mod cli;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use shortlink_core::RetryPolicy;
use shortlink_rpc::server::serve;
use shortlink_rpc::telemetry;
use shortlink_storage::MySqlStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_json);

    info!(
        listen_addr = %config.listen_addr,
        namespace = config.namespace.as_deref().unwrap_or_default(),
        max_attempts = config.max_attempts,
        "starting storage gRPC server"
    );

    let retry = RetryPolicy::builder()
        .max_attempts(config.max_attempts)
        .build();
    let store = MySqlStore::connect(&config.mysql_dsn, config.namespace.as_deref(), retry)
        .await
        .context("failed to open the durable store")?;

    serve(config.listen_addr, store).await?;

    Ok(())
}
