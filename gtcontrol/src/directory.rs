//! Renderer discovery and selection.

use crate::description::{DeviceDescription, RendererCapabilities, ServiceEndpoint};
use crate::ssdp::{MEDIA_RENDERER_TARGET, SsdpSearch};
use std::time::Duration;
use tracing::{debug, info, warn};

const DESCRIPTION_TIMEOUT_SECS: u64 = 5;

/// A renderer picked by discovery, with its resolved control endpoints.
#[derive(Debug, Clone)]
pub struct RendererDevice {
    pub friendly_name: String,
    pub location: String,
    pub capabilities: RendererCapabilities,
    pub av_transport: ServiceEndpoint,
    pub rendering_control: Option<ServiceEndpoint>,
}

/// Finds and holds on to one usable media renderer.
///
/// Candidates are taken in reply-arrival order, which for a batch of
/// simultaneous M-SEARCH replies means shortest round-trip first. A
/// configured name filter overrides that order: the first *matching*
/// capable device wins.
pub struct RendererDirectory {
    search_window: Duration,
    name_filter: Option<String>,
    description_timeout: Duration,
    selected: Option<RendererDevice>,
}

impl RendererDirectory {
    pub fn new(search_window: Duration, name_filter: Option<String>) -> Self {
        Self {
            search_window,
            name_filter,
            description_timeout: Duration::from_secs(DESCRIPTION_TIMEOUT_SECS),
            selected: None,
        }
    }

    /// The currently selected renderer, if discovery has succeeded.
    pub fn selected(&self) -> Option<&RendererDevice> {
        self.selected.as_ref()
    }

    /// Search the network and select a renderer.
    ///
    /// Returns the friendly name of the selected device. Never errors:
    /// every failure path logs and yields `None`, leaving any previous
    /// selection in place.
    pub fn discover(&mut self) -> Option<String> {
        info!(
            "Scanning for UPnP renderers (window={}s)...",
            self.search_window.as_secs()
        );

        let search = match SsdpSearch::open() {
            Ok(search) => search,
            Err(e) => {
                warn!("SSDP socket setup failed: {e}");
                return None;
            }
        };
        let responses = match search.search(MEDIA_RENDERER_TARGET, self.search_window) {
            Ok(responses) => responses,
            Err(e) => {
                warn!("SSDP search failed: {e}");
                return None;
            }
        };
        debug!("SSDP search returned {} unique location(s)", responses.len());

        for response in &responses {
            let description =
                match DeviceDescription::fetch(&response.location, self.description_timeout) {
                    Ok(description) => description,
                    Err(e) => {
                        debug!("Failed to query device at {}: {e}", response.location);
                        continue;
                    }
                };

            let capabilities = description.capabilities();
            if !capabilities.transport_control {
                debug!(
                    "Skipping {}: no transport control",
                    description.friendly_name()
                );
                continue;
            }

            let name = description.friendly_name().to_string();
            info!("Found renderer: {}", name);

            if !name_matches(self.name_filter.as_deref(), &name) {
                continue;
            }

            let Some(av_transport) = description.av_transport().cloned() else {
                continue;
            };
            let device = RendererDevice {
                friendly_name: name.clone(),
                location: response.location.clone(),
                capabilities,
                av_transport,
                rendering_control: description.rendering_control().cloned(),
            };
            debug!(
                "Selected renderer detail: model={:?} manufacturer={:?} server={}",
                description.model_name(),
                description.manufacturer(),
                response.server
            );
            info!("Selected renderer: {}", name);
            self.selected = Some(device);
            return Some(name);
        }

        warn!("No suitable UPnP renderer found");
        None
    }
}

fn name_matches(filter: Option<&str>, name: &str) -> bool {
    match filter {
        Some(filter) => name.to_lowercase().contains(&filter.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_matches_anything() {
        assert!(name_matches(None, "WiiM Amp Pro"));
        assert!(name_matches(None, ""));
    }

    #[test]
    fn filter_is_a_case_insensitive_substring() {
        assert!(name_matches(Some("wiim"), "WiiM Amp Pro"));
        assert!(name_matches(Some("AMP"), "WiiM Amp Pro"));
        assert!(!name_matches(Some("sonos"), "WiiM Amp Pro"));
    }

    #[test]
    fn directory_starts_unselected() {
        let directory = RendererDirectory::new(Duration::from_secs(5), None);
        assert!(directory.selected().is_none());
    }
}
