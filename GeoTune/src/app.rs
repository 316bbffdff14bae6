//! Application wiring and the serial event loop
//!
//! One thread, one event at a time: a touch is projected to coordinates,
//! resolved to a station and handed to the renderer before the next event
//! is looked at. The async directory client runs on a current-thread
//! runtime owned by the app, so there is no task concurrency to reason
//! about anywhere in the pipeline.

use std::time::Duration;

use anyhow::Result;
use crossbeam_channel::Receiver;
use gtbus::{CommandEvent, InboundEvent, MessageBus, NowPlaying, StatusUpdate, TouchEvent};
use gtcontrol::{PlayRequest, PlaybackController, RendererDirectory};
use gtgeo::TouchProjector;
use gtstations::{DirectoryClient, StationFinder};
use tokio::runtime::{Builder, Runtime};
use tracing::{error, info, warn};

use crate::config::Config;

/// The assembled application.
pub struct GeoTuneApp {
    runtime: Runtime,
    projector: TouchProjector,
    finder: StationFinder,
    playback: PlaybackController,
    bus: Box<dyn MessageBus>,
}

impl GeoTuneApp {
    /// Build every component from the configuration.
    pub fn new(config: &Config, bus: Box<dyn MessageBus>) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let projector = TouchProjector::new(
            config.calibration.panel_bounds(),
            config.calibration.map_bounds(),
        );

        let client = DirectoryClient::builder()
            .api_base(config.stations.base_url.clone())
            .build()?;
        let finder = StationFinder::new(
            client,
            Duration::from_secs(config.stations.cache_ttl_seconds),
            config.stations.station_budget,
            config.stations.selection_mode,
        );

        let directory = RendererDirectory::new(
            Duration::from_secs(config.renderer.discovery_timeout_seconds),
            config.renderer.device_name.clone(),
        );
        let playback = PlaybackController::new(directory, config.renderer.default_volume);

        Ok(Self {
            runtime,
            projector,
            finder,
            playback,
            bus,
        })
    }

    /// Best-effort renderer discovery before the loop starts.
    pub fn discover_renderer(&mut self) {
        if !self.playback.discover() {
            warn!("UPnP discovery failed at startup, will retry on first touch");
        }
    }

    /// Consume inbound events until every sender is gone.
    pub fn run(&mut self, events: Receiver<InboundEvent>) {
        for event in events {
            match event {
                InboundEvent::Touch(touch) => self.handle_touch(touch),
                InboundEvent::Command(command) => self.handle_command(&command),
            }
        }
        info!("Event intake closed, shutting down");
    }

    fn handle_touch(&mut self, touch: TouchEvent) {
        let point = self.projector.project(touch.x, touch.y);
        info!(
            "Touch ({}, {}) -> coordinates ({:.2}, {:.2})",
            touch.x, touch.y, point.latitude, point.longitude
        );

        self.publish_status(StatusUpdate::loading());

        let station = match self.runtime.block_on(self.finder.select(point)) {
            Ok(station) => station,
            Err(e) => {
                error!("Failed to find stations: {e}");
                self.publish_status(StatusUpdate::error("No stations found"));
                return;
            }
        };

        info!(
            "Playing {} from {}, {}",
            station.station_name, station.location, station.country
        );

        let request = PlayRequest {
            stream_url: station.stream_url.clone(),
            title: format!("{} - {}", station.station_name, station.location),
        };
        if self.playback.play(&request) {
            self.publish_now_playing(NowPlaying {
                station: station.station_name,
                location: station.location,
                country: station.country,
            });
            self.publish_status(StatusUpdate::playing());
        } else {
            self.publish_status(StatusUpdate::error("Playback failed"));
        }
    }

    fn handle_command(&mut self, command: &CommandEvent) {
        match command.cmd.as_str() {
            "stop" => {
                self.playback.stop();
                self.publish_status(StatusUpdate::stopped());
            }
            "replay" => info!("Replay not yet implemented"),
            other => warn!("Unknown command: {other}"),
        }
    }

    // Bus failures never take the loop down; the wall resyncs on the next
    // notification it does receive.
    fn publish_status(&self, status: StatusUpdate) {
        if let Err(e) = self.bus.publish_status(&status) {
            warn!("Failed to publish status: {e}");
        }
    }

    fn publish_now_playing(&self, now: NowPlaying) {
        if let Err(e) = self.bus.publish_now_playing(&now) {
            warn!("Failed to publish now-playing: {e}");
        }
    }
}
