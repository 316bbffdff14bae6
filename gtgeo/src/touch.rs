//! Touch-panel calibration and the pixel → coordinate projection

use crate::GeoPoint;
use serde::Deserialize;

/// Pixel rectangle reported by the touch panel.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PanelBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Default for PanelBounds {
    fn default() -> Self {
        Self {
            min_x: 0,
            max_x: 1024,
            min_y: 0,
            max_y: 600,
        }
    }
}

/// Geographic rectangle the panel is mapped onto.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            north: 90.0,
            south: -90.0,
            west: -180.0,
            east: 180.0,
        }
    }
}

/// Converts touch-panel pixels to geographic coordinates.
///
/// The map is assumed to be an equirectangular (plate carrée) projection, so
/// the conversion is linear on both axes. Out-of-range inputs are clamped to
/// the panel rectangle before mapping, so the result always lies inside the
/// configured [`MapBounds`].
#[derive(Debug, Clone, Copy)]
pub struct TouchProjector {
    panel: PanelBounds,
    map: MapBounds,
}

impl TouchProjector {
    pub fn new(panel: PanelBounds, map: MapBounds) -> Self {
        Self { panel, map }
    }

    /// Map a touch position to a geographic point.
    ///
    /// Longitude grows with x (west to east); latitude shrinks with y
    /// (north to south, the pixel origin being the top-left corner).
    pub fn project(&self, x: i32, y: i32) -> GeoPoint {
        // A degenerate calibration rectangle would divide by zero.
        let width = f64::from(self.panel.max_x - self.panel.min_x).max(1.0);
        let height = f64::from(self.panel.max_y - self.panel.min_y).max(1.0);

        let nx = (f64::from(x - self.panel.min_x) / width).clamp(0.0, 1.0);
        let ny = (f64::from(y - self.panel.min_y) / height).clamp(0.0, 1.0);

        let longitude = self.map.west + nx * (self.map.east - self.map.west);
        let latitude = self.map.north - ny * (self.map.north - self.map.south);

        GeoPoint::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_projector() -> TouchProjector {
        TouchProjector::new(PanelBounds::default(), MapBounds::default())
    }

    #[test]
    fn corners_map_to_map_corners() {
        let p = world_projector();

        let top_left = p.project(0, 0);
        assert_eq!(top_left.latitude, 90.0);
        assert_eq!(top_left.longitude, -180.0);

        let bottom_right = p.project(1024, 600);
        assert_eq!(bottom_right.latitude, -90.0);
        assert_eq!(bottom_right.longitude, 180.0);
    }

    #[test]
    fn center_of_world_panel_is_origin() {
        let point = world_projector().project(512, 300);
        assert!(point.latitude.abs() < 1e-9, "lat {}", point.latitude);
        assert!(point.longitude.abs() < 1e-9, "lon {}", point.longitude);
    }

    #[test]
    fn out_of_range_touches_are_clamped() {
        let p = world_projector();

        for (x, y) in [(-500, -500), (5000, 5000), (-1, 300), (512, 100_000)] {
            let point = p.project(x, y);
            assert!((-90.0..=90.0).contains(&point.latitude));
            assert!((-180.0..=180.0).contains(&point.longitude));
        }

        // Beyond the right edge clamps exactly to the east bound.
        assert_eq!(p.project(99999, 300).longitude, 180.0);
    }

    #[test]
    fn respects_partial_map_bounds() {
        // Europe-ish crop.
        let p = TouchProjector::new(
            PanelBounds::default(),
            MapBounds {
                north: 60.0,
                south: 35.0,
                west: -10.0,
                east: 30.0,
            },
        );

        let nw = p.project(0, 0);
        assert_eq!(nw.latitude, 60.0);
        assert_eq!(nw.longitude, -10.0);

        let se = p.project(1024, 600);
        assert_eq!(se.latitude, 35.0);
        assert_eq!(se.longitude, 30.0);
    }

    #[test]
    fn degenerate_panel_does_not_panic() {
        let p = TouchProjector::new(
            PanelBounds {
                min_x: 10,
                max_x: 10,
                min_y: 10,
                max_y: 10,
            },
            MapBounds::default(),
        );
        let point = p.project(10, 10);
        assert!(point.latitude.is_finite());
        assert!(point.longitude.is_finite());
    }
}
