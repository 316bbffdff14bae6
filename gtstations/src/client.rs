//! HTTP client for the station directory API.

use crate::error::{Error, Result};
use crate::models::{Channel, ChannelsEnvelope, Place, PlacesEnvelope};
use reqwest::{header, redirect};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://radio.garden/api/ara/content";

/// Default timeout for directory requests in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default timeout for stream URL probes in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("gtstations/", env!("CARGO_PKG_VERSION"));

/// Statuses the stream probe follows to the `Location` header.
const REDIRECT_STATUSES: &[u16] = &[301, 302, 307, 308];

/// Client for the station directory API.
///
/// Holds two HTTP clients: one for JSON directory calls and one that
/// keeps redirects unfollowed so stream probes can read the `Location`
/// header themselves.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    probe: reqwest::Client,
    api_base: String,
}

impl DirectoryClient {
    /// Create a new client with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The configured API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch the full place catalog.
    pub async fn places(&self) -> Result<Vec<Place>> {
        let url = format!("{}/places", self.api_base);
        debug!("Fetching place catalog: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::other(format!(
                "places endpoint returned status: {}",
                response.status()
            )));
        }

        let envelope: PlacesEnvelope = response.json().await?;
        Ok(envelope.data.list)
    }

    /// Fetch the channel list of a single place.
    pub async fn place_channels(&self, place_id: &str) -> Result<Vec<Channel>> {
        let url = format!("{}/page/{}/channels", self.api_base, place_id);
        debug!("Fetching channels: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::other(format!(
                "channels endpoint returned status: {}",
                response.status()
            )));
        }

        let envelope: ChannelsEnvelope = response.json().await?;
        let block = envelope
            .data
            .content
            .into_iter()
            .next()
            .ok_or(Error::UnexpectedPayload("channels response has no content block"))?;
        Ok(block.items)
    }

    /// The directory's own MP3 endpoint for a station. Always playable,
    /// but proxied through the directory.
    pub fn canonical_stream_url(&self, station_id: &str) -> String {
        format!("{}/listen/{}/channel.mp3", self.api_base, station_id)
    }

    /// Resolve a station's direct stream URL.
    ///
    /// Probes the canonical endpoint with a HEAD request. A redirect
    /// answer yields the `Location` target; any other success yields the
    /// probed URL itself. Probe failures are logged and degrade to the
    /// canonical URL, so this never blocks playback.
    pub async fn resolve_stream_url(&self, station_id: &str) -> String {
        let url = self.canonical_stream_url(station_id);
        let response = match self.probe.head(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Stream probe failed for {}: {e}", station_id);
                return url;
            }
        };

        if REDIRECT_STATUSES.contains(&response.status().as_u16()) {
            match response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok())
            {
                Some(location) => location.to_string(),
                None => url,
            }
        } else {
            response.url().to_string()
        }
    }
}

/// Builder for configuring a [`DirectoryClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    api_base: String,
    request_timeout: Duration,
    probe_timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom API base URL.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the timeout for directory requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the timeout for stream URL probes.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set a custom User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DirectoryClient> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .timeout(self.request_timeout)
            .build()?;

        // Redirects stay unfollowed so the probe can inspect `Location`.
        let probe = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .redirect(redirect::Policy::none())
            .timeout(self.probe_timeout)
            .build()?;

        Ok(DirectoryClient {
            client,
            probe,
            api_base: self.api_base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = ClientBuilder::new();
        assert_eq!(builder.api_base, DEFAULT_API_BASE);
        assert_eq!(builder.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        assert_eq!(builder.probe_timeout, Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS));
        assert_eq!(builder.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn canonical_url_embeds_station_id() {
        let client = DirectoryClient::new().unwrap();
        assert_eq!(
            client.canonical_stream_url("AbC123"),
            "http://radio.garden/api/ara/content/listen/AbC123/channel.mp3"
        );
    }

    #[test]
    fn resolve_falls_back_to_canonical_on_transport_error() {
        // Port 1 is never listening, so the probe fails fast.
        let client = DirectoryClient::builder()
            .api_base("http://127.0.0.1:1/api")
            .probe_timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        let url = tokio_test::block_on(client.resolve_stream_url("abc"));
        assert_eq!(url, "http://127.0.0.1:1/api/listen/abc/channel.mp3");
    }
}
