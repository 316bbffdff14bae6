//! Station directory client for geographic radio selection.
//!
//! This crate turns a geographic point into one playable radio station.
//! It speaks the Radio Garden content API: a place catalog (`/places`),
//! per-place channel lists (`/page/{id}/channels`) and a per-station
//! MP3 endpoint (`/listen/{id}/channel.mp3`).
//!
//! # Example
//!
//! ```no_run
//! use gtgeo::GeoPoint;
//! use gtstations::{DirectoryClient, SelectionMode, StationFinder};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), gtstations::Error> {
//! let client = DirectoryClient::new()?;
//! let mut finder = StationFinder::new(
//!     client,
//!     Duration::from_secs(3600),
//!     20,
//!     SelectionMode::Random,
//! );
//! let station = finder.select(GeoPoint::new(48.85, 2.35)).await?;
//! println!("{} from {}", station.station_name, station.location);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod selector;

pub use cache::{PlaceCache, DEFAULT_CACHE_TTL_SECS};
pub use client::{
    ClientBuilder, DirectoryClient, DEFAULT_API_BASE, DEFAULT_PROBE_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
pub use error::{Error, Result};
pub use models::{Channel, ChannelPage, Place, SelectedStation};
pub use selector::{SelectionMode, StationFinder, DEFAULT_STATION_BUDGET};
