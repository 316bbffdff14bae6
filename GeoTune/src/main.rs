//! GeoTune: touch a world map, hear a radio station from that spot.
//!
//! The binary wires four crates together: `gtgeo` projects panel pixels to
//! coordinates, `gtstations` resolves coordinates to a playable stream,
//! `gtcontrol` drives a UPnP renderer, and `gtbus` carries events in and
//! notifications out. Events arrive as JSON lines on stdin, notifications
//! leave as JSON lines on stdout.

use std::io::BufRead;
use std::thread;

use anyhow::Result;
use gtbus::{inbound_channel, InboundEvent, StdioBus};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod config;

use app::GeoTuneApp;
use config::Config;

fn main() -> Result<()> {
    let config_path = config::resolve_path();
    let config = Config::load_from(&config_path)?;
    init_tracing(&config.logging.level);

    if config_path.exists() {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!(
            "Config file {} not found, using defaults",
            config_path.display()
        );
    }

    info!("🌍 Starting GeoTune...");
    let mut app = GeoTuneApp::new(&config, Box::new(StdioBus::new()))?;

    app.discover_renderer();

    let (tx, rx) = inbound_channel();
    spawn_stdin_reader(tx);

    info!("✅ GeoTune is ready!");
    info!("Listening for touch events...");
    app.run(rx);

    Ok(())
}

// Logs go to stderr: stdout carries the outbound notification stream.
fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Feed stdin JSON lines into the event loop.
///
/// Dropping the sender on EOF is what shuts the loop down, so the thread
/// is deliberately left detached.
fn spawn_stdin_reader(tx: crossbeam_channel::Sender<InboundEvent>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read stdin: {e}");
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<InboundEvent>(trimmed) {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Ignoring malformed event {trimmed:?}: {e}"),
            }
        }
    });
}
