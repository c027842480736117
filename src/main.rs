// rerun - finds that command you ran last week
//
// Loads shell history once, then answers queries from stdin until it closes.

use anyhow::Context;
use clap::Parser;
use rerun_lib::{transport::Server, Config, RecallError, SearchEngine};
use std::time::Instant;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let process_start = Instant::now();
    let config = Config::parse();
    init_logging(&config)?;

    let records = config
        .history_loader()
        .parse()
        .context("could not load shell history")?;
    let engine = SearchEngine::new(&records);

    info!(
        records = records.len(),
        commands = engine.corpus().len(),
        elapsed = ?process_start.elapsed(),
        "history loaded"
    );
    if config.interactive {
        eprintln!(
            "loaded {} commands in {:?}",
            records.len(),
            process_start.elapsed()
        );
    }
    // Only the corpus is needed from here on
    drop(records);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    Server::new(&engine, &config)
        .run(stdin, stdout)
        .await
        .context("stopped serving queries")?;

    Ok(())
}

// Logs go to stderr; stdout belongs to the protocol
fn init_logging(config: &Config) -> rerun_lib::Result<()> {
    let filter = match config.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| RecallError::Config(format!("invalid --log-level {:?}: {}", level, e)))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
