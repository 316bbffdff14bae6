//! Playback control: stream URLs in, transport actions out.

use crate::avtransport_client::AvTransportClient;
use crate::didl;
use crate::directory::RendererDirectory;
use crate::rendering_control_client::{DEFAULT_CHANNEL, RenderingControlClient};
use tracing::{debug, error, info, warn};

// UPnP AV renderers expose a single transport instance.
const INSTANCE_ID: u32 = 0;

/// What to play: a stream URL and the title shown on the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub stream_url: String,
    pub title: String,
}

/// Drives playback on the renderer held by a [`RendererDirectory`].
///
/// All methods report success as a plain `bool`; the interesting detail
/// lands in the logs. Callers only need to know whether to announce
/// "playing" or "failed".
pub struct PlaybackController {
    directory: RendererDirectory,
    default_volume: Option<u32>,
}

impl PlaybackController {
    pub fn new(directory: RendererDirectory, default_volume: Option<u32>) -> Self {
        Self {
            directory,
            default_volume,
        }
    }

    /// Run discovery now. Useful at startup so the first touch does not
    /// pay the search window.
    pub fn discover(&mut self) -> bool {
        self.directory.discover().is_some()
    }

    /// Friendly name of the selected renderer, if any.
    pub fn renderer_name(&self) -> Option<&str> {
        self.directory
            .selected()
            .map(|device| device.friendly_name.as_str())
    }

    /// Send a stream to the renderer and start playback.
    pub fn play(&mut self, request: &PlayRequest) -> bool {
        if self.directory.selected().is_none() && self.directory.discover().is_none() {
            error!("No UPnP renderer available");
            return false;
        }
        let Some(device) = self.directory.selected() else {
            return false;
        };

        let transport = AvTransportClient::from_endpoint(&device.av_transport);

        // May fail if nothing is playing; not worth surfacing.
        if let Err(e) = transport.stop(INSTANCE_ID) {
            debug!("Pre-play Stop ignored: {e}");
        }

        if let Some(volume) = self.default_volume {
            if device.capabilities.volume_control {
                if let Some(endpoint) = &device.rendering_control {
                    let rendering = RenderingControlClient::from_endpoint(endpoint);
                    if let Err(e) = rendering.set_volume(INSTANCE_ID, DEFAULT_CHANNEL, volume) {
                        warn!("Failed to set volume: {e}");
                    }
                }
            }
        }

        let metadata = didl::broadcast_metadata(&request.title, &request.stream_url);

        if let Err(e) = transport.set_av_transport_uri(INSTANCE_ID, &request.stream_url, &metadata)
        {
            error!("Failed to start playback: {e}");
            return false;
        }
        if let Err(e) = transport.play(INSTANCE_ID, "1") {
            error!("Failed to start playback: {e}");
            return false;
        }

        info!("Playing: {} -> {}", request.title, request.stream_url);
        true
    }

    /// Stop playback. Nothing selected means nothing is playing, which
    /// counts as success.
    pub fn stop(&mut self) -> bool {
        let Some(device) = self.directory.selected() else {
            return true;
        };

        let transport = AvTransportClient::from_endpoint(&device.av_transport);
        match transport.stop(INSTANCE_ID) {
            Ok(()) => {
                info!("Playback stopped");
                true
            }
            Err(e) => {
                error!("Failed to stop playback: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // A zero search window makes discovery return immediately empty.
    fn unreachable_directory() -> RendererDirectory {
        RendererDirectory::new(Duration::ZERO, None)
    }

    #[test]
    fn play_without_a_renderer_fails_cleanly() {
        let mut controller = PlaybackController::new(unreachable_directory(), None);
        let request = PlayRequest {
            stream_url: "http://example.net/live.mp3".to_string(),
            title: "Test Station".to_string(),
        };
        assert!(!controller.play(&request));
        assert!(controller.renderer_name().is_none());
    }

    #[test]
    fn stop_without_a_renderer_is_a_no_op_success() {
        let mut controller = PlaybackController::new(unreachable_directory(), None);
        assert!(controller.stop());
    }
}
