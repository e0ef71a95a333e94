use crate::channel::demo::DemoSettings;
use crate::geo::{LatLng, LatLngBounds};
use crate::map::markers::MarkerRetention;
use crate::map::MapOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub map: MapConfig,
    pub feed: FeedConfig,
    pub markers: MarkerConfig,
    pub demo: DemoConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    #[default]
    Socketio,
    Demo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
    pub namespace: String,
    pub mode: ServerMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".to_string(),
            namespace: String::new(),
            mode: ServerMode::Socketio,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    pub init_sw: LatLng,
    pub init_ne: LatLng,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub idle_delay_ms: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Map".to_string(),
            init_sw: LatLng::new(40.0, -74.0),
            init_ne: LatLng::new(41.0, -73.0),
            min_zoom: 7,
            max_zoom: 12,
            idle_delay_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,
    pub max_tweets: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Tweets".to_string(),
            max_tweets: crate::tweets::DEFAULT_MAX_TWEETS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub retention: MarkerRetention,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    pub interval_secs: u64,
    pub jitter_secs: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            jitter_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{which} {point:?} is outside latitude [-90, 90] / longitude [-180, 180]")]
    OutOfRange { which: &'static str, point: LatLng },

    #[error("initial bounds are not a rectangle: sw {sw:?} must lie south-west of ne {ne:?}")]
    InvalidBounds { sw: LatLng, ne: LatLng },

    #[error("zoom range is empty: min_zoom {min} > max_zoom {max}")]
    ZoomRange { min: u8, max: u8 },

    #[error("feed.max_tweets must be at least 1")]
    EmptyFeed,

    #[error("demo.interval_secs must be at least 1")]
    DemoInterval,
}

impl Config {
    /// `$XDG_CONFIG_HOME/geofeed/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geofeed").join("config.toml"))
    }

    /// Loads `path`, or the default location when `path` is `None`. A missing
    /// default file yields the built-in defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let corners = [("map.init_sw", self.map.init_sw), ("map.init_ne", self.map.init_ne)];
        for (which, point) in corners {
            if !point.in_range() {
                return Err(ConfigError::OutOfRange { which, point });
            }
        }
        let bounds = self.initial_bounds();
        if !bounds.is_valid() {
            return Err(ConfigError::InvalidBounds {
                sw: bounds.sw,
                ne: bounds.ne,
            });
        }
        if self.map.min_zoom > self.map.max_zoom {
            return Err(ConfigError::ZoomRange {
                min: self.map.min_zoom,
                max: self.map.max_zoom,
            });
        }
        if self.feed.max_tweets == 0 {
            return Err(ConfigError::EmptyFeed);
        }
        if self.demo.interval_secs == 0 {
            return Err(ConfigError::DemoInterval);
        }
        Ok(())
    }

    pub fn initial_bounds(&self) -> LatLngBounds {
        LatLngBounds::new(self.map.init_sw, self.map.init_ne)
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            initial_bounds: self.initial_bounds(),
            min_zoom: self.map.min_zoom,
            max_zoom: self.map.max_zoom,
            idle_delay: Duration::from_millis(self.map.idle_delay_ms),
        }
    }

    pub fn demo_settings(&self) -> DemoSettings {
        DemoSettings {
            interval: Duration::from_secs(self.demo.interval_secs),
            jitter_secs: self.demo.jitter_secs,
        }
    }

    /// Where the tracing output goes; the terminal itself belongs to the UI.
    pub fn log_file(&self) -> PathBuf {
        self.logging.file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("geofeed")
                .join("geofeed.log")
        })
    }
}
