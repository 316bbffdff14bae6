//! Message bus abstraction for GeoTune
//!
//! The touch wall talks to the outside world through a small
//! publish/subscribe surface: touch and command events come in, now-playing
//! and status notifications go out. The transport technology is deliberately
//! not part of this crate; [`MessageBus`] is the unit of substitution. Two
//! implementations ship here: [`ChannelBus`] (in-process channels, used by
//! tests and embedders) and [`StdioBus`] (tagged JSON lines on stdout, used
//! by the binary).

mod channel;
mod events;
mod stdio;

pub use channel::{channel_bus, inbound_channel, ChannelBus};
pub use events::{
    CommandEvent, InboundEvent, NowPlaying, OutboundMessage, StatusState, StatusUpdate, TouchEvent,
};
pub use stdio::StdioBus;

/// Errors raised when publishing a notification.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// The receiving side of the bus is gone.
    #[error("bus channel closed")]
    Closed,

    /// The payload could not be encoded as JSON.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing to the transport failed.
    #[error("failed to write to transport: {0}")]
    Io(#[from] std::io::Error),
}

/// Outbound side of the bus as seen by the application.
pub trait MessageBus {
    fn publish_now_playing(&self, now: &NowPlaying) -> Result<(), BusError>;

    fn publish_status(&self, status: &StatusUpdate) -> Result<(), BusError>;
}
