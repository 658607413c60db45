//! UDP flow-export collector.
//!
//! Binds the configured UDP port, decodes each datagram through the
//! flow-core engine, and publishes one Kafka message per decoded record.
//! Everything after a successful socket bind is best-effort: decode and
//! publish failures are logged and the listener moves on to the next
//! datagram.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tokio::net::UdpSocket;
use tokio::signal;

use flow_core::config::CollectorConfig;
use flow_core::error::EngineError;
use flow_core::Engine;
use flow_publish::{encode_row_messages, KafkaPublisher, Publisher, MESSAGE_KEY};

/// Receive buffer size; datagrams beyond this are truncated by the socket.
const RECV_BUFFER_LEN: usize = 1024;

/// Command-line arguments for the collector.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the collector configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let config = match CollectorConfig::from_file(Path::new(&args.config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{e}; falling back to built-in defaults");
            CollectorConfig::default()
        }
    };

    // A semantically broken configuration (bad column codes, strict-mode
    // rule failures) degrades to the same no-op engine as a missing file.
    let engine = match Engine::from_config(&config) {
        Ok((engine, issues)) => {
            for issue in &issues {
                tracing::warn!("{issue}");
            }
            engine
        }
        Err(e) => {
            tracing::error!("{e}; decoding disabled");
            let (engine, _) = Engine::from_config(&CollectorConfig::default())
                .context("default configuration must build")?;
            engine
        }
    };

    let publisher = KafkaPublisher::new(&config.kafka_info, config.kafka_topic.clone())
        .context("failed to create Kafka producer")?;

    let addr: SocketAddr = format!("{}:{}", config.listen_ip, config.listen_udp_port)
        .parse()
        .context("invalid listen address")?;
    let socket = UdpSocket::bind(addr)
        .await
        .with_context(|| format!("failed to bind UDP {addr}"))?;

    println!("Starting flow collector...");
    println!("  Listen: {addr}");
    println!("  Kafka: {}", config.kafka_info);
    println!("  Topic: {}", config.kafka_topic);
    println!("  Header length: {} bytes", config.head_length);
    println!("  Record length: {} bytes", config.message_length);

    let listener = tokio::spawn(async move {
        run(socket, engine, publisher).await;
    });

    signal::ctrl_c().await.context("failed to listen for ctrl_c")?;
    println!("\nShutting down collector...");
    listener.abort();

    Ok(())
}

/// Receive loop: one datagram at a time, fully decoded and published before
/// the next receive.
async fn run(socket: UdpSocket, engine: Engine, publisher: impl Publisher) {
    let mut buf = vec![0u8; RECV_BUFFER_LEN];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                tracing::error!("UDP receive failed: {e}");
                continue;
            }
        };
        tracing::debug!(bytes = len, %peer, "received datagram");

        let decoded = match engine.process_datagram(&buf[..len]) {
            Ok(decoded) => decoded,
            Err(EngineError::RulesNotConfigured) => {
                tracing::warn!("parsing rules not configured");
                continue;
            }
            Err(e) => {
                tracing::warn!("dropping datagram from {peer}: {e}");
                continue;
            }
        };
        for row_error in &decoded.row_errors {
            tracing::warn!(block = row_error.block, "row skipped: {}", row_error.error);
        }

        let payloads = match encode_row_messages(&decoded.table) {
            Ok(payloads) => payloads,
            Err(e) => {
                tracing::error!("encoding failed: {e}");
                continue;
            }
        };
        for payload in payloads {
            if let Err(e) = publisher.publish(&payload, MESSAGE_KEY).await {
                tracing::error!("publish failed: {e}");
            }
        }
    }
}
