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

//! Live weather data.
//!
//! Current conditions come from WeatherAPI.com and are refreshed by a
//! background worker that publishes into the shared [`WeatherStatus`].
//!
//! [`WeatherStatus`]: crate::status::WeatherStatus

pub mod weatherapi;
pub mod worker;

use chrono::{DateTime, Utc};
use weather_fx::Condition;

pub use weatherapi::{WeatherApiClient, WeatherError};
pub use worker::WeatherWorker;

/// Current conditions at one location
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Local time at the location as reported by the provider
    pub local_time: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    /// Provider's description, e.g. "Patchy light rain"
    pub condition_text: String,
    /// Provider condition code the backdrop is derived from
    pub condition_code: u16,
    pub condition: Condition,
    pub is_day: bool,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub humidity: u8,
    pub uv: f64,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReport {
    /// "City, Region" or just the city when the region is blank
    pub fn place_name(&self) -> String {
        if self.region.is_empty() || self.region == self.location {
            self.location.clone()
        } else {
            format!("{}, {}", self.location, self.region)
        }
    }
}
