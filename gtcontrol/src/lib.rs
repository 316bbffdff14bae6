//! UPnP/DLNA control point for network audio renderers.
//!
//! Discovers media renderers over SSDP, reads their descriptions, and
//! drives playback through the AVTransport and RenderingControl
//! services. The control plane is fully synchronous: SOAP calls are
//! short, serialized, and carry their own timeouts.
//!
//! # Example
//!
//! ```no_run
//! use gtcontrol::{PlaybackController, PlayRequest, RendererDirectory};
//! use std::time::Duration;
//!
//! let directory = RendererDirectory::new(Duration::from_secs(5), Some("wiim".to_string()));
//! let mut controller = PlaybackController::new(directory, Some(30));
//!
//! let started = controller.play(&PlayRequest {
//!     stream_url: "http://streams.example.net/live.mp3".to_string(),
//!     title: "Some Station - Lyon".to_string(),
//! });
//! assert!(started || controller.renderer_name().is_none());
//! ```

pub mod avtransport_client;
pub mod description;
pub mod didl;
pub mod directory;
pub mod error;
pub mod playback;
pub mod rendering_control_client;
pub mod soap_client;
pub mod ssdp;

pub use avtransport_client::AvTransportClient;
pub use description::{DeviceDescription, RendererCapabilities, ServiceEndpoint};
pub use didl::broadcast_metadata;
pub use directory::{RendererDevice, RendererDirectory};
pub use error::{ControlError, Result, UpnpFault};
pub use playback::{PlayRequest, PlaybackController};
pub use rendering_control_client::{DEFAULT_CHANNEL, RenderingControlClient};
pub use ssdp::{MEDIA_RENDERER_TARGET, SearchResponse, SsdpSearch};
