mod cli;

use crate::cli::{Command, WritePolicyArg, CLI};
use anyhow::Context;
use clap::Parser;
use shortlink_core::{validate_url, ShortHash, Storage};
use shortlink_rpc::{connect_storage, telemetry, ConnectMode, ConnectOptions};
use std::sync::Arc;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_json);

    let mode = if config.eager {
        ConnectMode::Eager
    } else {
        ConnectMode::Lazy
    };
    let options = match config.timeout {
        Some(timeout) => ConnectOptions::builder()
            .mode(mode)
            .request_timeout(timeout)
            .build(),
        None => ConnectOptions::builder().mode(mode).build(),
    };

    match config.command {
        Command::Hash { url } => {
            validate_url(&url)?;
            println!("{}", ShortHash::of(&url));
        }
        Command::Put { url } => {
            validate_url(&url)?;
            let hash = ShortHash::of(&url);

            let storage = connect(&config.backends, &options, config.write_policy).await?;
            let result = storage
                .put(&url, &hash)
                .await
                .with_context(|| format!("failed to store {}", url));
            storage.close().await?;
            result?;

            println!("{}", hash);
        }
        Command::Get { hash } => {
            let hash = ShortHash::parse(hash)?;

            let storage = connect(&config.backends, &options, config.write_policy).await?;
            let result = storage
                .get(&hash)
                .await
                .with_context(|| format!("failed to resolve {}", hash));
            storage.close().await?;

            println!("{}", result?);
        }
    }

    Ok(())
}

async fn connect(
    backends: &[String],
    options: &ConnectOptions,
    write_policy: WritePolicyArg,
) -> anyhow::Result<Arc<dyn Storage>> {
    debug!(?backends, %write_policy, "connecting to storage");
    connect_storage(backends, options, write_policy.into())
        .await
        .context("failed to connect to storage backends")
}
