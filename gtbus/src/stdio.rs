//! Stdout transport: one tagged JSON object per line

use crate::events::{NowPlaying, OutboundMessage, StatusUpdate};
use crate::{BusError, MessageBus};
use std::io::Write;

/// Bus implementation that prints notifications as JSON lines on stdout,
/// so the binary can be driven end to end from a shell pipeline.
#[derive(Debug, Default)]
pub struct StdioBus;

impl StdioBus {
    pub fn new() -> Self {
        Self
    }

    fn write_line(&self, message: &OutboundMessage) -> Result<(), BusError> {
        let line = serde_json::to_string(message)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

impl MessageBus for StdioBus {
    fn publish_now_playing(&self, now: &NowPlaying) -> Result<(), BusError> {
        self.write_line(&OutboundMessage::NowPlaying(now.clone()))
    }

    fn publish_status(&self, status: &StatusUpdate) -> Result<(), BusError> {
        self.write_line(&OutboundMessage::Status(status.clone()))
    }
}
