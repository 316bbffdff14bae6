//! Error types for the station directory client.

use thiserror::Error;

/// Errors that can occur when selecting a station from the directory.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The directory could not be reached and no cached snapshot exists
    #[error("station directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// The place catalog produced no candidates for the requested point
    #[error("no radio places found near ({latitude:.2}, {longitude:.2})")]
    NoPlacesFound { latitude: f64, longitude: f64 },

    /// No playable channel could be collected for the requested point
    #[error("no channels found near ({latitude:.2}, {longitude:.2})")]
    NoChannelsFound { latitude: f64, longitude: f64 },

    /// The directory answered with a shape we do not understand
    #[error("unexpected directory payload: {0}")]
    UnexpectedPayload(&'static str),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error with a custom message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;
