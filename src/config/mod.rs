// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub use crate::detection::MovementConfig;
use crate::cache::DEFAULT_CACHE_CAPACITY;

const DEFAULT_USER_AGENT: &str = concat!("watchpost/", env!("CARGO_PKG_VERSION"));

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Log level used when no command line flag or RUST_LOG is given
    pub log_level: String,

    /// Replay the built-in demo drive instead of a real position source
    pub demo_mode: bool,

    /// Interval between cache sweeps in seconds
    pub cache_sweep_interval_secs: u64,

    /// Movement detector thresholds
    pub movement: MovementConfig,

    /// Weather hazard feed
    pub hazards: HazardFeedConfig,

    /// Emergency contact resolution
    pub contacts: ContactConfig,

    /// Geolocation source
    pub geolocation: GeolocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Watchpost".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            demo_mode: false,
            cache_sweep_interval_secs: 60,
            movement: MovementConfig::default(),
            hazards: HazardFeedConfig::default(),
            contacts: ContactConfig::default(),
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("watchpost"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Weather hazard feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardFeedConfig {
    /// Fetch hazard alerts at all
    pub enabled: bool,

    /// Base URL of the weather API
    pub endpoint: String,

    /// User-Agent sent with every request (the API rejects anonymous clients)
    pub user_agent: String,

    /// Forecast-zone cache lifetime in seconds
    pub zone_ttl_secs: u64,

    /// Decimals kept when rounding coordinates for the zone cache
    pub zone_precision: u8,

    /// Maximum cached zones
    pub cache_capacity: usize,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for HazardFeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.weather.gov".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            zone_ttl_secs: 10 * 60,
            zone_precision: 4,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            request_timeout_secs: 30,
        }
    }
}

/// Emergency contact resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Base URL of the reverse geocoder
    pub endpoint: String,

    /// Preferred language for geocoder responses
    pub language: String,

    /// User-Agent sent to the geocoder
    pub user_agent: String,

    /// Lifetime of a resolved contact in seconds
    pub ttl_secs: u64,

    /// Decimals kept when rounding coordinates for the contact cache
    pub precision: u8,

    /// Maximum cached contacts
    pub cache_capacity: usize,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org".to_string(),
            language: "en".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ttl_secs: 60 * 60,
            precision: 3,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            request_timeout_secs: 30,
        }
    }
}

/// Geolocation source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// Timeout for a regular fix in milliseconds
    pub timeout_ms: u64,

    /// Timeout for a fix forced by the SOS button in milliseconds
    pub forced_timeout_ms: u64,

    /// Cadence of simulated fixes in milliseconds
    pub demo_interval_ms: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            forced_timeout_ms: 5_000,
            demo_interval_ms: 2_000,
        }
    }
}

impl GeolocationConfig {
    pub fn fix_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    pub fn forced_timeout(&self) -> Duration {
        Duration::from_millis(self.forced_timeout_ms.max(1))
    }
}
