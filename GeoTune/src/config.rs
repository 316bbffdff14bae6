//! Configuration file loading
//!
//! GeoTune reads one YAML file, located through the `GEOTUNE_CONFIG`
//! environment variable or `geotune.yaml` in the working directory. Every
//! section is optional: a missing file, a missing section or a missing key
//! falls back to defaults that map the whole world onto a 1024x600 panel
//! and talk to the public Radio Garden directory.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gtgeo::{MapBounds, PanelBounds};
use gtstations::SelectionMode;
use serde::Deserialize;
use tracing::warn;

/// Environment variable overriding the config file location.
pub const ENV_CONFIG_PATH: &str = "GEOTUNE_CONFIG";

/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "geotune.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calibration: CalibrationSection,
    pub stations: StationsSection,
    pub renderer: RendererSection,
    pub logging: LoggingSection,
}

/// Touch panel and map calibration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalibrationSection {
    pub touch_min_x: i32,
    pub touch_max_x: i32,
    pub touch_min_y: i32,
    pub touch_max_y: i32,
    pub map_north: f64,
    pub map_south: f64,
    pub map_west: f64,
    pub map_east: f64,
}

impl Default for CalibrationSection {
    fn default() -> Self {
        Self {
            touch_min_x: 0,
            touch_max_x: 1024,
            touch_min_y: 0,
            touch_max_y: 600,
            map_north: 90.0,
            map_south: -90.0,
            map_west: -180.0,
            map_east: 180.0,
        }
    }
}

impl CalibrationSection {
    pub fn panel_bounds(&self) -> PanelBounds {
        PanelBounds {
            min_x: self.touch_min_x,
            max_x: self.touch_max_x,
            min_y: self.touch_min_y,
            max_y: self.touch_max_y,
        }
    }

    pub fn map_bounds(&self) -> MapBounds {
        MapBounds {
            north: self.map_north,
            south: self.map_south,
            west: self.map_west,
            east: self.map_east,
        }
    }
}

/// Station directory client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StationsSection {
    pub base_url: String,
    pub cache_ttl_seconds: u64,
    pub station_budget: usize,
    pub selection_mode: SelectionMode,
}

impl Default for StationsSection {
    fn default() -> Self {
        Self {
            base_url: gtstations::DEFAULT_API_BASE.to_string(),
            cache_ttl_seconds: gtstations::DEFAULT_CACHE_TTL_SECS,
            station_budget: gtstations::DEFAULT_STATION_BUDGET,
            selection_mode: SelectionMode::default(),
        }
    }
}

/// UPnP renderer discovery and playback settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererSection {
    /// Case-insensitive substring matched against friendly names. Unset
    /// means the first capable renderer wins.
    pub device_name: Option<String>,
    pub discovery_timeout_seconds: u64,
    /// Volume (0-100) applied before each playback. Unset leaves the
    /// renderer volume alone.
    pub default_volume: Option<u32>,
}

impl Default for RendererSection {
    fn default() -> Self {
        Self {
            device_name: None,
            discovery_timeout_seconds: 5,
            default_volume: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default tracing filter, overridden by `RUST_LOG` when set.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Resolve the config file location: `GEOTUNE_CONFIG` when set, otherwise
/// `geotune.yaml` next to the process.
pub fn resolve_path() -> PathBuf {
    env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

impl Config {
    /// Load the configuration from an explicit path.
    ///
    /// A missing file is not an error: the defaults stand in for it.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_whole_world() {
        let config = Config::default();

        assert_eq!(config.calibration.touch_max_x, 1024);
        assert_eq!(config.calibration.touch_max_y, 600);
        assert_eq!(config.calibration.map_north, 90.0);
        assert_eq!(config.calibration.map_west, -180.0);
        assert_eq!(config.stations.base_url, gtstations::DEFAULT_API_BASE);
        assert_eq!(config.stations.cache_ttl_seconds, 3600);
        assert_eq!(config.stations.station_budget, 20);
        assert_eq!(config.stations.selection_mode, SelectionMode::Random);
        assert!(config.renderer.device_name.is_none());
        assert_eq!(config.renderer.discovery_timeout_seconds, 5);
        assert!(config.renderer.default_volume.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn full_file_parses() {
        let yaml = r#"
calibration:
  touch_min_x: 10
  touch_max_x: 1910
  touch_min_y: 10
  touch_max_y: 1070
  map_north: 71.0
  map_south: 34.0
  map_west: -11.0
  map_east: 40.0
stations:
  base_url: "http://directory.local/api"
  cache_ttl_seconds: 600
  station_budget: 10
  selection_mode: nearest
renderer:
  device_name: "living room"
  discovery_timeout_seconds: 3
  default_volume: 40
logging:
  level: debug
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.calibration.touch_max_x, 1910);
        assert_eq!(config.calibration.map_south, 34.0);
        assert_eq!(config.stations.base_url, "http://directory.local/api");
        assert_eq!(config.stations.selection_mode, SelectionMode::Nearest);
        assert_eq!(config.renderer.device_name.as_deref(), Some("living room"));
        assert_eq!(config.renderer.default_volume, Some(40));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_file_keeps_defaults_elsewhere() {
        let yaml = r#"
renderer:
  device_name: "kitchen"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.renderer.device_name.as_deref(), Some("kitchen"));
        assert_eq!(config.renderer.discovery_timeout_seconds, 5);
        assert_eq!(config.stations.station_budget, 20);
        assert_eq!(config.calibration.touch_max_x, 1024);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/geotune.yaml")).unwrap();
        assert_eq!(config.stations.base_url, gtstations::DEFAULT_API_BASE);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = std::env::temp_dir().join("geotune-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.yaml");
        std::fs::write(&path, "stations: [not, a, mapping]").unwrap();

        assert!(Config::load_from(&path).is_err());

        let _ = std::fs::remove_file(&path);
    }
}
