//! Chunk Cache - An in-memory keyed chunk accumulator
//!
//! Reads `key value` lines from stdin, saves each value under its key, and
//! prints cache statistics as JSON when input ends.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chunk_cache::{spawn_sweep_task, ChunkCache, Config, SaveOutcome};

/// Main entry point for the chunk cache driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and start the background sweep task
/// 4. Feed stdin lines into the cache until EOF
/// 5. Print statistics and stop the sweep task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chunk_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting chunk cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_limit={}, sweep_interval={}s, sweep_policy={:?}",
        config.max_limit,
        config.sweep_interval,
        config.sweep_policy()
    );

    let cache = Arc::new(ChunkCache::from_config(&config));
    let sweep_handle = spawn_sweep_task(cache.clone(), config.sweep_interval);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(char::is_whitespace) else {
            warn!(line, "Skipping line without a value");
            continue;
        };

        match cache.try_save(value.as_bytes(), key) {
            Ok(SaveOutcome::AppendIgnored) => {
                warn!(key, len = value.len(), "Append ignored: payload too large")
            }
            Ok(outcome) => info!(key, ?outcome, "Saved"),
            Err(err) => warn!(key, "Save rejected: {}", err),
        }
    }

    sweep_handle.abort();

    let stats = serde_json::to_string_pretty(&cache.stats()).context("failed to encode stats")?;
    println!("{stats}");

    info!("Chunk cache shutdown complete");
    Ok(())
}
