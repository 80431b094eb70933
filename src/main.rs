use std::env;

use switch_metrics::EngineConfig;
use switch_metrics::Ingestor;
use switch_metrics::wire::{read_events, write_snapshot};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .expect("usage: switch-metrics <events.ndjson>");

    if !(path.ends_with(".ndjson") || path.ends_with(".jsonl")) {
        warn!(path, "input file does not look like newline-delimited json");
    }

    let ingestor = Ingestor::spawn(EngineConfig::default());

    for result in read_events(&path) {
        match result {
            Ok(event) => {
                if let Err(e) = ingestor.publish(event).await {
                    warn!("{e}");
                }
            }
            Err(e) => warn!("{e}"),
        }
    }

    let snapshot = ingestor.shutdown().await;
    write_snapshot(&snapshot);
}
