//! Wire payloads exchanged over the bus

use serde::{Deserialize, Serialize};

/// A touch on the wall panel, in raw pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub x: i32,
    pub y: i32,
}

/// A control command, e.g. `{"cmd": "stop"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEvent {
    pub cmd: String,
}

/// Anything the wall can send us, distinguished by payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InboundEvent {
    Touch(TouchEvent),
    Command(CommandEvent),
}

/// Notification that a station started playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub station: String,
    pub location: String,
    pub country: String,
}

/// Coarse lifecycle state reported back to the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Loading,
    Playing,
    Stopped,
    Error,
}

/// Status notification, optionally carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub state: StatusState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl StatusUpdate {
    pub fn loading() -> Self {
        Self {
            state: StatusState::Loading,
            msg: None,
        }
    }

    pub fn playing() -> Self {
        Self {
            state: StatusState::Playing,
            msg: None,
        }
    }

    pub fn stopped() -> Self {
        Self {
            state: StatusState::Stopped,
            msg: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            state: StatusState::Error,
            msg: Some(msg.into()),
        }
    }
}

/// Outbound notifications, tagged so they can share one transport stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OutboundMessage {
    NowPlaying(NowPlaying),
    Status(StatusUpdate),
}
