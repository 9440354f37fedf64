//! Replay one recorded exchange through the sample application.
//!
//! Reads `{ "scope": {...}, "events": [...] }`, feeds the events to the
//! adapter over the in-memory gateway and prints every outbound event as a
//! JSON line.

use std::path::PathBuf;

use clap::Parser;
use gateway_bridge::app::sample::SampleApp;
use gateway_bridge::config::loader::load_config;
use gateway_bridge::gateway::{channel, InboundEvent, OutboundEvent, Scope};
use gateway_bridge::observability::logging::init_logging;
use gateway_bridge::{BridgeConfig, GatewayAdapter};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "bridge-replay")]
#[command(about = "Replay a recorded gateway exchange through the sample application", long_about = None)]
struct Cli {
    /// JSON file holding the scope and inbound events.
    #[arg(short, long)]
    exchange: PathBuf,

    /// Optional TOML configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Deserialize)]
struct Recording {
    scope: Scope,
    #[serde(default)]
    events: Vec<InboundEvent>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };
    init_logging(&config.observability);

    let recording: Recording = serde_json::from_str(&std::fs::read_to_string(&cli.exchange)?)?;
    tracing::info!(
        events = recording.events.len(),
        path = %recording.scope.path,
        "Replaying exchange"
    );

    let adapter = GatewayAdapter::with_config(SampleApp, config)?;
    let (source, sink, mut transport) = channel::pair();
    for event in recording.events {
        transport.push(event)?;
    }
    transport.end_input();

    let outcome = adapter.call(recording.scope, source, sink).await?;

    // The sink closes once the exchange released its connection.
    while let Some(event) = transport.next_outbound().await {
        println!("{}", serde_json::to_string(&render(&event))?);
    }

    tracing::info!(outcome = outcome.as_str(), "Replay complete");
    Ok(())
}

fn render(event: &OutboundEvent) -> Value {
    match event {
        OutboundEvent::ResponseStart { status, headers } => {
            let headers: Vec<_> = headers
                .iter()
                .map(|(name, value)| {
                    json!([
                        String::from_utf8_lossy(name),
                        String::from_utf8_lossy(value)
                    ])
                })
                .collect();
            json!({ "type": event.kind(), "status": status, "headers": headers })
        }
        OutboundEvent::ResponseBody { body, more_body } => json!({
            "type": event.kind(),
            "body": String::from_utf8_lossy(body),
            "more_body": more_body,
        }),
    }
}
