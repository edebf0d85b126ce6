//! Configuration loading and typed config structures for GeoView.
//!
//! The canonical configuration lives in `geoview-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads the file. Every
//! field has a default, so an empty file (or no file at all) yields a
//! fully working configuration pointed at the public USGS daily feed.

use std::path::Path;
use std::time::Duration;

use geoview_map::ClusterConfig;
use geoview_types::FilterParameters;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Upstream feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Clustering parameters for the map source.
    #[serde(default)]
    pub cluster: ClusterSection,

    /// Initial filter state applied before the user touches anything.
    #[serde(default)]
    pub filters: FilterParameters,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `GEOVIEW_FEED_URL` environment variable overrides `feed.url`
    /// when set, so deployments can repoint the feed without editing the
    /// YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.feed.apply_env_overrides();
        Ok(config)
    }
}

/// Upstream feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// GeoJSON feed endpoint.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Refresh interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl FeedConfig {
    /// The refresh interval as a [`Duration`], never zero.
    ///
    /// A configured `poll_interval_ms: 0` is clamped to one millisecond;
    /// the poller's interval timer aborts on a zero period.
    pub const fn poll_interval(&self) -> Duration {
        if self.poll_interval_ms == 0 {
            Duration::from_millis(1)
        } else {
            Duration::from_millis(self.poll_interval_ms)
        }
    }

    /// Override the feed URL with `GEOVIEW_FEED_URL` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("GEOVIEW_FEED_URL") {
            self.url = val;
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Clustering parameters section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClusterSection {
    /// Cluster aggregation radius in pixels.
    #[serde(default = "default_cluster_radius")]
    pub cluster_radius: u32,

    /// Highest zoom level at which points are still clustered.
    #[serde(default = "default_cluster_max_zoom")]
    pub cluster_max_zoom: u32,
}

impl ClusterSection {
    /// Convert into the map crate's clustering config.
    pub const fn cluster_config(self) -> ClusterConfig {
        ClusterConfig {
            cluster_radius: self.cluster_radius,
            cluster_max_zoom: self.cluster_max_zoom,
        }
    }
}

impl Default for ClusterSection {
    fn default() -> Self {
        Self {
            cluster_radius: default_cluster_radius(),
            cluster_max_zoom: default_cluster_max_zoom(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_feed_url() -> String {
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson".to_owned()
}

const fn default_poll_interval_ms() -> u64 {
    60_000
}

const fn default_cluster_radius() -> u32 {
    50
}

const fn default_cluster_max_zoom() -> u32 {
    14
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_the_daily_feed() {
        let config = EngineConfig::default();
        assert!(config.feed.url.ends_with("all_day.geojson"));
        assert_eq!(config.feed.poll_interval_ms, 60_000);
        assert_eq!(config.cluster.cluster_radius, 50);
        assert_eq!(config.cluster.cluster_max_zoom, 14);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
feed:
  url: "https://example.test/feed.geojson"
  poll_interval_ms: 30000

cluster:
  cluster_radius: 40
  cluster_max_zoom: 12

filters:
  min_magnitude: 2.5

logging:
  level: "debug"
"#;
        let config = EngineConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.feed.url, "https://example.test/feed.geojson");
        assert_eq!(config.feed.poll_interval(), Duration::from_millis(30_000));
        assert_eq!(config.cluster.cluster_radius, 40);
        assert!((config.filters.min_magnitude - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = EngineConfig::parse("cluster:\n  cluster_radius: 30\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Radius is overridden, everything else uses defaults.
        assert_eq!(config.cluster.cluster_radius, 30);
        assert_eq!(config.cluster.cluster_max_zoom, 14);
        assert_eq!(config.feed.poll_interval_ms, 60_000);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(EngineConfig::parse("").is_ok());
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let config = EngineConfig::parse("feed:\n  poll_interval_ms: 0\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.feed.poll_interval_ms, 0);
        assert_eq!(config.feed.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("geoview-config.yaml");
        if path.exists() {
            let config = EngineConfig::from_file(&path);
            assert!(config.is_ok(), "failed to load project config: {config:?}");
        }
    }

    #[test]
    fn cluster_section_converts_to_map_config() {
        let section = ClusterSection {
            cluster_radius: 25,
            cluster_max_zoom: 10,
        };
        let config = section.cluster_config();
        assert_eq!(config.cluster_radius, 25);
        assert_eq!(config.cluster_max_zoom, 10);
    }
}
