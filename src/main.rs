//! Console line classifier (default binary).
//!
//! Reads console broadcast lines (and optionally server log lines) from stdin or
//! `SQUAD_RCON_INPUT`, prints every recognised event as one JSON object per line on
//! stdout. Diagnostics go to stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use squad_rcon::adapter::{spawn_broadcast_pump, ConsoleConfig};
use squad_rcon::core::{broadcast_rules, log_rules, BroadcastClassifier};
use squad_rcon::types::Event;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConsoleConfig::from_env();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let input: Box<dyn AsyncBufRead + Unpin + Send> = match &config.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    run(&config, input).await
}

async fn run(config: &ConsoleConfig, input: Box<dyn AsyncBufRead + Unpin + Send>) -> Result<()> {
    let mut rules = broadcast_rules();
    if config.log_rules {
        rules.extend(log_rules());
    }
    tracing::info!(rules = rules.len(), input = ?config.input, "classifier ready");
    let classifier = Arc::new(BroadcastClassifier::with_rules(rules));

    let (line_tx, line_rx) = mpsc::channel::<String>(config.channel_capacity);
    let (event_tx, mut event_rx) = mpsc::channel::<Event>(config.channel_capacity);
    let pump = spawn_broadcast_pump(classifier, line_rx, event_tx);

    let reader = tokio::spawn(async move {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
        Ok::<_, std::io::Error>(())
    });

    let mut stdout = tokio::io::stdout();
    while let Some(event) = event_rx.recv().await {
        let mut json = serde_json::to_string(&event).context("failed to encode event")?;
        json.push('\n');
        stdout.write_all(json.as_bytes()).await?;
    }
    stdout.flush().await?;

    reader.await?.context("failed to read input")?;
    let stats = pump.await?;
    tracing::info!(
        lines = stats.lines,
        events = stats.events,
        unmatched = stats.unmatched,
        "done"
    );
    Ok(())
}
