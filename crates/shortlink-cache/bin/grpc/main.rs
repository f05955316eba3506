mod cli;

use crate::cli::CLI;
use clap::Parser;
use shortlink_cache::{CacheConfig, MokaEntryCache};
use shortlink_rpc::server::serve;
use shortlink_rpc::telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_json);

    info!(
        listen_addr = %config.listen_addr,
        max_capacity = config.max_capacity,
        ttl = ?config.ttl,
        sweep_interval = ?config.sweep_interval,
        "starting cache gRPC server"
    );

    let cache: MokaEntryCache = CacheConfig::builder()
        .max_capacity(config.max_capacity)
        .ttl(config.ttl)
        .sweep_interval(config.sweep_interval)
        .build()
        .into();

    serve(config.listen_addr, cache).await?;

    Ok(())
}
