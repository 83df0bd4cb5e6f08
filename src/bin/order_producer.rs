//! Order Producer
//!
//! Writes demo orders to stdout as newline-delimited JSON, one every
//! interval. Pipe it into the service to feed its ingestion stream:
//!
//! ```text
//! order_producer 100 250 | STORE_BACKEND=memory order_cache
//! ```
//!
//! Arguments: `[COUNT] [INTERVAL_MS]`. Without a count it runs until killed.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_cache::models::demo_order;

const DEFAULT_INTERVAL_MS: u64 = 5000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only orders
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_producer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let count: Option<u64> = args
        .next()
        .map(|v| v.parse())
        .transpose()
        .context("COUNT must be a non-negative integer")?;
    let interval_ms: u64 = args
        .next()
        .map(|v| v.parse())
        .transpose()
        .context("INTERVAL_MS must be a non-negative integer")?
        .unwrap_or(DEFAULT_INTERVAL_MS);

    let mut out = BufWriter::new(tokio::io::stdout());
    let mut sent = 0u64;

    while count.map_or(true, |limit| sent < limit) {
        let now = Utc::now();
        let order_uid = format!("b563feb7b2b84b6{}{:04}", now.timestamp(), sent % 10_000);
        let order = demo_order(&order_uid, now);

        let mut line = serde_json::to_vec(&order).context("failed to encode order")?;
        line.push(b'\n');
        out.write_all(&line).await.context("failed to write order")?;
        out.flush().await.context("failed to flush stdout")?;

        info!(message_number = sent, order_uid = %order_uid, "Message sent");
        sent += 1;

        if count.map_or(true, |limit| sent < limit) {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }

    Ok(())
}
