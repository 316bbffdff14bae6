//! Geographic primitives for GeoTune
//!
//! This crate maps touch-panel pixels onto a latitude/longitude rectangle
//! and measures great-circle distances between the resulting points. It is
//! pure math: no I/O, no failure modes.
//!
//! # Example
//!
//! ```
//! use gtgeo::{MapBounds, PanelBounds, TouchProjector};
//!
//! let projector = TouchProjector::new(PanelBounds::default(), MapBounds::default());
//! let point = projector.project(512, 300);
//! assert!(point.latitude.abs() < 1e-9);
//! assert!(point.longitude.abs() < 1e-9);
//! ```

mod point;
mod touch;

pub use point::GeoPoint;
pub use touch::{MapBounds, PanelBounds, TouchProjector};
