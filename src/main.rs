//! # Padlink
//!
//! Virtual gamepad aggregation and uplink engine for driving a remote robot.
//!
//! This binary runs the engine with a bounded-channel sink and a consumer
//! that serializes frames for the transport layer.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber;

mod config;
mod engine;
mod error;
mod gamepad;
mod input;
mod uplink;

use config::Config;
use engine::PadEngine;
use uplink::ChannelSink;

/// Default configuration file path
const CONFIG_PATH: &str = "config/default.toml";

/// Number of frames between status log messages
const LOG_INTERVAL_FRAMES: u64 = 100;

/// Main entry point for the padlink application
///
/// Initializes logging, loads configuration, spawns the engine task and a
/// frame consumer, then waits for Ctrl+C.
///
/// With the default 100 ms tick the engine emits ten frames per second from
/// the moment it starts, all-neutral until input arrives; the consumer here
/// stands in for the network transport, which is provided by the embedding
/// application.
///
/// # Errors
///
/// Returns error if the configuration file exists but is invalid.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Padlink v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(CONFIG_PATH)?;
    info!(
        "Uplink period {} ms, keyboard {}",
        config.uplink.tick_interval_ms,
        if config.keyboard.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let (frame_tx, mut frame_rx) = mpsc::channel(config.uplink.channel_capacity);
    let (handle, engine_task) = PadEngine::spawn(&config, ChannelSink::new(frame_tx));

    // Frame consumer: serializes each frame the way the transport would
    let consumer = tokio::spawn(async move {
        let mut frame_count: u64 = 0;

        while let Some(frame) = frame_rx.recv().await {
            frame_count += 1;

            match serde_json::to_string(&frame) {
                Ok(payload) => debug!("Frame {}: {}", frame_count, payload),
                Err(e) => debug!("Failed to serialize frame: {}", e),
            }

            if frame_count % LOG_INTERVAL_FRAMES == 0 {
                info!("Sent {} state frames", frame_count);
            }
        }

        info!("Total frames consumed: {}", frame_count);
    });

    info!("Press Ctrl+C to exit");
    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down...");

    handle.shutdown().await.ok();
    engine_task.await?;
    consumer.await?;

    Ok(())
}
