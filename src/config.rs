// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! Persistent preferences are stored in TOML via confy. Command line flags
//! are layered on top at startup and are never written back.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use weather_fx::{Condition, DEFAULT_STRIKE_CHANCE};

use crate::units::{TemperatureUnit, WindSpeedUnit};

const APP_NAME: &str = "skycast-desktop";
const CONFIG_NAME: &str = "config";

/// Default location query for the weather provider
pub const DEFAULT_LOCATION: &str = "San Francisco";

/// Longest allowed refresh interval (one day)
pub const MAX_REFRESH_MINUTES: u64 = 24 * 60;

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Location query sent to the weather provider (city, postcode or "lat,lon")
    #[serde(default = "default_location")]
    pub location: String,

    /// WeatherAPI.com key (optional, env var takes precedence)
    #[serde(default)]
    pub weatherapi_key: Option<String>,

    /// Use the darker sky palette
    #[serde(default)]
    pub dark_mode: bool,

    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    #[serde(default)]
    pub wind_speed_unit: WindSpeedUnit,

    /// Minutes between weather refreshes
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,

    /// Condition shown when no live weather is available
    #[serde(default)]
    pub fallback_condition: Condition,

    /// Per-frame lightning probability during thunderstorms (0.0 - 1.0)
    #[serde(default = "default_lightning_chance")]
    pub lightning_chance: f64,

    /// Fixed frame interval in milliseconds; unset follows the display refresh
    #[serde(default)]
    pub frame_interval_ms: Option<u64>,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_refresh_minutes() -> u64 {
    30
}

fn default_lightning_chance() -> f64 {
    DEFAULT_STRIKE_CHANCE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            location: default_location(),
            weatherapi_key: None,
            dark_mode: false,
            temperature_unit: TemperatureUnit::default(),
            wind_speed_unit: WindSpeedUnit::default(),
            refresh_minutes: default_refresh_minutes(),
            fallback_condition: Condition::default(),
            lightning_chance: default_lightning_chance(),
            frame_interval_ms: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if it cannot be read
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Could not load configuration, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        let config: AppConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        Ok(config.sanitized())
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Clamp hand-edited values into their valid ranges.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.lightning_chance.is_finite() {
            self.lightning_chance = default_lightning_chance();
        }
        self.lightning_chance = self.lightning_chance.clamp(0.0, 1.0);
        self.refresh_minutes = self.refresh_minutes.clamp(1, MAX_REFRESH_MINUTES);
        self.frame_interval_ms = self.frame_interval_ms.filter(|ms| *ms > 0);
        if self.location.trim().is_empty() {
            self.location = default_location();
        }
        self
    }

    /// Time between weather refreshes.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_minutes.saturating_mul(60))
    }

    /// Resolve the weather API key from the environment or config.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_api_key(std::env::var("WEATHERAPI_KEY").ok(), self.weatherapi_key.as_deref())
    }
}

/// Environment value wins over the config value; empty strings count as unset.
fn resolve_api_key(env_key: Option<String>, config_key: Option<&str>) -> Option<String> {
    env_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| config_key.map(str::to_string).filter(|k| !k.trim().is_empty()))
}
