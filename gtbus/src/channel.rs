//! In-process bus backed by crossbeam channels

use crate::events::{InboundEvent, NowPlaying, OutboundMessage, StatusUpdate};
use crate::{BusError, MessageBus};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Bus implementation that hands every notification to an in-process
/// receiver. Used by tests and by embedders that bridge to a real transport
/// themselves.
#[derive(Debug, Clone)]
pub struct ChannelBus {
    tx: Sender<OutboundMessage>,
}

/// Create a [`ChannelBus`] together with the receiving end of its stream.
pub fn channel_bus() -> (ChannelBus, Receiver<OutboundMessage>) {
    let (tx, rx) = unbounded();
    (ChannelBus { tx }, rx)
}

/// Create the intake channel the event loop consumes from.
///
/// Producers (a transport bridge, a stdin reader, a test) hold the sender;
/// dropping every sender shuts the loop down.
pub fn inbound_channel() -> (Sender<InboundEvent>, Receiver<InboundEvent>) {
    unbounded()
}

impl MessageBus for ChannelBus {
    fn publish_now_playing(&self, now: &NowPlaying) -> Result<(), BusError> {
        self.tx
            .send(OutboundMessage::NowPlaying(now.clone()))
            .map_err(|_| BusError::Closed)
    }

    fn publish_status(&self, status: &StatusUpdate) -> Result<(), BusError> {
        self.tx
            .send(OutboundMessage::Status(status.clone()))
            .map_err(|_| BusError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::StatusState;

    #[test]
    fn published_messages_arrive_in_order() {
        let (bus, rx) = channel_bus();

        bus.publish_status(&StatusUpdate::loading()).unwrap();
        bus.publish_now_playing(&NowPlaying {
            station: "KEXP".to_string(),
            location: "Seattle WA".to_string(),
            country: "United States".to_string(),
        })
        .unwrap();

        match rx.recv().unwrap() {
            OutboundMessage::Status(status) => assert_eq!(status.state, StatusState::Loading),
            other => panic!("unexpected message: {other:?}"),
        }
        match rx.recv().unwrap() {
            OutboundMessage::NowPlaying(now) => assert_eq!(now.station, "KEXP"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn publishing_after_receiver_dropped_is_closed() {
        let (bus, rx) = channel_bus();
        drop(rx);

        let err = bus.publish_status(&StatusUpdate::stopped()).unwrap_err();
        assert!(matches!(err, BusError::Closed));
    }
}
