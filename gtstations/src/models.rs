//! Data models for the station directory API.

use gtgeo::GeoPoint;
use serde::Deserialize;

// The directory serves `geo` as `[longitude, latitude]`.
const GEO_LONGITUDE_IDX: usize = 0;
const GEO_LATITUDE_IDX: usize = 1;

/// A geographic place carrying one or more radio channels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    /// Directory identifier, used to fetch the place's channel list
    pub id: String,
    /// Human-readable place name (usually a city)
    pub title: String,
    /// Country name; the directory omits it for some places
    #[serde(default = "unknown")]
    pub country: String,
    /// Coordinates as served by the directory: `[longitude, latitude]`
    pub geo: [f64; 2],
    /// Number of channels hosted at this place
    #[serde(default = "default_size")]
    pub size: u32,
}

impl Place {
    /// Position of this place, with the axes in conventional order.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.geo[GEO_LATITUDE_IDX], self.geo[GEO_LONGITUDE_IDX])
    }
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn default_size() -> u32 {
    1
}

/// A single radio channel inside a place's channel list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Channel {
    pub page: ChannelPage,
}

/// The page descriptor the directory attaches to each channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelPage {
    /// Path-style reference ending in the station identifier
    pub url: String,
    /// Station display name
    pub title: String,
}

impl Channel {
    /// Station identifier, the last path segment of the page URL.
    pub fn station_id(&self) -> &str {
        self.page.url.rsplit('/').next().unwrap_or_default()
    }
}

/// Outcome of a station selection: everything the player and the
/// now-playing announcement need.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedStation {
    pub station_id: String,
    pub station_name: String,
    /// Name of the place nearest to the touched point
    pub location: String,
    /// Country of that nearest place
    pub country: String,
    /// Resolved (or canonical) stream URL
    pub stream_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlacesEnvelope {
    pub data: PlacesData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlacesData {
    pub list: Vec<Place>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelsEnvelope {
    pub data: ChannelsData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelsData {
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(default)]
    pub items: Vec<Channel>,
}
