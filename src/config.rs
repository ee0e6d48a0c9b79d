//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the locator-config.toml
//! file. It provides a centralized way to configure the map surface, the radius input,
//! the location request parameters and the location source.

use crate::location::PositionOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "locator-config.toml";

/// Largest accepted map or frame edge, in pixels
pub const MAX_SURFACE_PX: u32 = 4096;

/// Errors from reading or writing the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialization: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config out of range: {0}")]
    Invalid(String),
}

/// Application configuration loaded from locator-config.toml
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Map surface dimensions
    pub map: MapConfig,
    /// Radius input control
    pub radius: RadiusConfig,
    /// Parameters passed to every location request
    pub request: PositionOptions,
    /// Where positions come from
    pub location: LocationConfig,
    /// Rendered frame dimensions
    pub display: DisplayConfig,
}

/// Pixel size of the map surface the overlay is projected onto
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct MapConfig {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width_px: 200,
            height_px: 200,
        }
    }
}

/// Radius input control settings
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RadiusConfig {
    /// Value the input starts with
    pub initial_meters: f64,
    /// Smallest value the input accepts; lower edits snap up to it
    pub min_meters: f64,
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            initial_meters: 100.0,
            min_meters: 10.0,
        }
    }
}

/// Which location capability the platform offers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// A configured, stationary position
    Fixed,
    /// A JSON geolocation endpoint
    Http,
    /// No location support at all
    None,
}

/// Location source settings
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    pub source: LocationSource,
    /// Fixed source latitude in degrees
    pub latitude: f64,
    /// Fixed source longitude in degrees
    pub longitude: f64,
    /// Fixed source accuracy in meters
    pub accuracy_m: f64,
    /// Simulated time to first fix for the fixed source
    pub fix_delay_ms: u64,
    /// Endpoint for the HTTP source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            source: LocationSource::Fixed,
            latitude: 25.033,
            longitude: 121.565,
            accuracy_m: 12.0,
            fix_delay_ms: 0,
            endpoint: None,
        }
    }
}

/// Display and rendering configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

impl Config {
    /// Load configuration from locator-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load_from_path(path) {
            Ok(config) => {
                info!(path = %path.display(), source = ?config.location.source, "loaded configuration");
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unusable config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from specified path, reporting any problem
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str::<Config>(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject surface sizes the renderer cannot lay out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let surfaces = [
            ("map.width_px", self.map.width_px),
            ("map.height_px", self.map.height_px),
            ("display.width", self.display.width),
            ("display.height", self.display.height),
        ];
        for (key, value) in surfaces {
            if value > MAX_SURFACE_PX {
                return Err(ConfigError::Invalid(format!(
                    "{} = {} exceeds {}",
                    key, value, MAX_SURFACE_PX
                )));
            }
        }
        Ok(())
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.map.width_px, 200);
        assert_eq!(config.radius.initial_meters, 100.0);
        assert_eq!(config.radius.min_meters, 10.0);
        assert_eq!(config.request, PositionOptions::default());
        assert_eq!(config.location.source, LocationSource::Fixed);
        assert_eq!(config.display.width, 400);
    }

    #[test]
    fn test_config_roundtrip() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.location.source = LocationSource::Http;
        config.location.endpoint = Some("http://localhost:8080/where".to_string());
        config.radius.min_meters = 25.0;

        config.save_to_path(file.path()).unwrap();
        let parsed = Config::try_load_from_path(file.path()).unwrap();

        assert_eq!(parsed.location.source, LocationSource::Http);
        assert_eq!(parsed.location.endpoint, config.location.endpoint);
        assert_eq!(parsed.radius.min_meters, 25.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"
[request]
timeout_ms = 5000

[location]
source = "none"
"#,
        )
        .unwrap();

        let config = Config::try_load_from_path(file.path()).unwrap();
        assert_eq!(config.request.timeout_ms, 5000);
        assert!(config.request.high_accuracy);
        assert_eq!(config.request.maximum_age_ms, 0);
        assert_eq!(config.location.source, LocationSource::None);
        assert_eq!(config.map.width_px, 200);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[location]\nsource = \"carrier-pigeon\"\n").unwrap();

        assert!(matches!(
            Config::try_load_from_path(file.path()),
            Err(ConfigError::Parse(_))
        ));
        let config = Config::load_from_path(file.path());
        assert_eq!(config.location.source, LocationSource::Fixed);
    }

    #[test]
    fn test_oversized_surface_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[map]\nwidth_px = 2147483647\n").unwrap();

        assert!(matches!(
            Config::try_load_from_path(file.path()),
            Err(ConfigError::Invalid(_))
        ));
        let config = Config::load_from_path(file.path());
        assert_eq!(config.map.width_px, 200);

        fs::write(file.path(), "[display]\nheight = 4096\n").unwrap();
        let config = Config::try_load_from_path(file.path()).unwrap();
        assert_eq!(config.display.height, 4096);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        assert_eq!(config.radius.initial_meters, 100.0);
    }
}
