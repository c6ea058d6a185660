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

//! Weather condition model.
//!
//! Maps provider condition codes onto the discrete [`Condition`] set that
//! drives the backdrop, and classifies conditions into the particle
//! families the renderer animates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a condition name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weather condition: {0}")]
pub struct ConditionParseError(pub String);

/// Discrete weather state shown by the backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    #[default]
    Sunny,
    Clear,
    PartlyCloudy,
    Cloudy,
    Overcast,
    Mist,
    Fog,
    Rain,
    Drizzle,
    Snow,
    Sleet,
    Thunderstorm,
}

/// Particle family a condition animates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleFamily {
    /// Falling streaks (rain, drizzle).
    Rain,
    /// Heavier, faster streaks with lightning.
    Storm,
    /// Rotating, drifting flakes (snow, sleet).
    Snow,
    /// Sun glow by day, stars by night (sunny, clear).
    Clear,
    /// Horizontally drifting cloud blobs (cloudy, overcast).
    Cloud,
    /// Static motes for everything else.
    Still,
}

// Provider (WeatherAPI.com) condition codes grouped by condition.
const CLOUDY_CODES: &[u16] = &[1006, 1009];
const MIST_CODES: &[u16] = &[1030, 1135, 1147];
const RAIN_CODES: &[u16] = &[1063, 1180, 1183, 1186, 1189, 1192, 1195, 1240, 1243, 1246];
const SNOW_CODES: &[u16] = &[
    1066, 1114, 1117, 1210, 1213, 1216, 1219, 1222, 1225, 1255, 1258,
];
const SLEET_CODES: &[u16] = &[
    1069, 1072, 1168, 1171, 1198, 1201, 1204, 1207, 1237, 1249, 1252,
];
const THUNDER_CODES: &[u16] = &[1087, 1273, 1276, 1279, 1282];

impl Condition {
    /// Every condition, in declaration order.
    pub const ALL: [Condition; 12] = [
        Condition::Sunny,
        Condition::Clear,
        Condition::PartlyCloudy,
        Condition::Cloudy,
        Condition::Overcast,
        Condition::Mist,
        Condition::Fog,
        Condition::Rain,
        Condition::Drizzle,
        Condition::Snow,
        Condition::Sleet,
        Condition::Thunderstorm,
    ];

    /// Map a provider condition code to a condition.
    ///
    /// Unknown codes fall back to [`Condition::Clear`].
    #[must_use]
    pub fn from_code(code: u16) -> Self {
        match code {
            1000 => Condition::Sunny,
            1003 => Condition::PartlyCloudy,
            c if CLOUDY_CODES.contains(&c) => Condition::Cloudy,
            c if MIST_CODES.contains(&c) => Condition::Mist,
            c if RAIN_CODES.contains(&c) => Condition::Rain,
            c if SNOW_CODES.contains(&c) => Condition::Snow,
            c if SLEET_CODES.contains(&c) => Condition::Sleet,
            c if THUNDER_CODES.contains(&c) => Condition::Thunderstorm,
            _ => Condition::Clear,
        }
    }

    /// Kebab-case name used on the command line and in config files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::Clear => "clear",
            Condition::PartlyCloudy => "partly-cloudy",
            Condition::Cloudy => "cloudy",
            Condition::Overcast => "overcast",
            Condition::Mist => "mist",
            Condition::Fog => "fog",
            Condition::Rain => "rain",
            Condition::Drizzle => "drizzle",
            Condition::Snow => "snow",
            Condition::Sleet => "sleet",
            Condition::Thunderstorm => "thunderstorm",
        }
    }

    /// Human-readable display name
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Condition::Sunny => "Sunny",
            Condition::Clear => "Clear",
            Condition::PartlyCloudy => "Partly cloudy",
            Condition::Cloudy => "Cloudy",
            Condition::Overcast => "Overcast",
            Condition::Mist => "Mist",
            Condition::Fog => "Fog",
            Condition::Rain => "Rain",
            Condition::Drizzle => "Drizzle",
            Condition::Snow => "Snow",
            Condition::Sleet => "Sleet",
            Condition::Thunderstorm => "Thunderstorm",
        }
    }

    #[must_use]
    pub fn family(&self) -> ParticleFamily {
        match self {
            Condition::Rain | Condition::Drizzle => ParticleFamily::Rain,
            Condition::Thunderstorm => ParticleFamily::Storm,
            Condition::Snow | Condition::Sleet => ParticleFamily::Snow,
            Condition::Sunny | Condition::Clear => ParticleFamily::Clear,
            Condition::Cloudy | Condition::Overcast => ParticleFamily::Cloud,
            Condition::PartlyCloudy | Condition::Mist | Condition::Fog => ParticleFamily::Still,
        }
    }
}

/// Number of particles a run allocates for `condition`.
///
/// Rain and drizzle use 200, snow and sleet 100, thunderstorms 250,
/// clear skies 30 sun rays by day or 100 stars by night, and every other
/// condition 50.
#[must_use]
pub fn particle_count(condition: Condition, is_day: bool) -> usize {
    match condition.family() {
        ParticleFamily::Rain => 200,
        ParticleFamily::Snow => 100,
        ParticleFamily::Storm => 250,
        ParticleFamily::Clear if is_day => 30,
        ParticleFamily::Clear => 100,
        ParticleFamily::Cloud | ParticleFamily::Still => 50,
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = ConditionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ConditionParseError(s.to_string()))
    }
}
