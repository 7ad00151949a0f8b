mod cli;

use crate::cli::CLI;
use anyhow::Context as _;
use clap::Parser;
use linkstash_shortener::{Context, Link, Shortener, ShortenerError, ShortenerService};
use linkstash_storage::{SqliteConfig, SqliteRepository};
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    linkstash_telemetry::init(config.log_format.into())?;

    info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        log_format = %config.log_format,
        "starting linkstash demo"
    );

    let store_config = SqliteConfig::builder()
        .database_url(config.database_url.clone())
        .max_connections(config.max_connections)
        .build();
    let repository = SqliteRepository::connect_with(&store_config)
        .await
        .with_context(|| format!("opening store at {}", config.database_url))?;

    let result = run(&config, ShortenerService::new(repository.clone())).await;
    repository.close().await;
    result
}

async fn run<S: Shortener>(config: &CLI, shortener: S) -> anyhow::Result<()> {
    let (ctx, cancel) = Context::with_cancel();

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            cancel.cancel();
        }
    });

    let result = shorten_and_resolve(&ctx, config, &shortener).await;
    interrupt.abort();
    result
}

/// Derives the context for one store operation, starting its deadline now.
fn operation_context(base: &Context, timeout: Option<Duration>) -> Context {
    match timeout {
        Some(timeout) => base.clone().with_timeout(timeout),
        None => base.clone(),
    }
}

async fn shorten_and_resolve<S: Shortener>(
    ctx: &Context,
    config: &CLI,
    shortener: &S,
) -> anyhow::Result<()> {
    let timeout = config.timeout_ms.map(Duration::from_millis);
    let link = Link::new(config.key.as_str(), config.url.as_str());

    match shortener.shorten(&operation_context(ctx, timeout), link).await {
        Ok(key) => println!("Shortened key: {key}"),
        // A previous run against the same file already stored the key.
        Err(ShortenerError::AlreadyExists(key)) => {
            warn!(key = %key, "key already shortened, resolving the stored link");
        }
        Err(err) => return Err(err).context("shortening link"),
    }

    let link = shortener
        .resolve(&operation_context(ctx, timeout), &config.key)
        .await
        .context("resolving link")?;
    println!("Resolved URL: {}", link.url);

    Ok(())
}
