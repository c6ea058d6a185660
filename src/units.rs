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

//! Display units for temperature and wind speed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    #[must_use]
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Rounded temperature with its unit, e.g. `21°C`
    #[must_use]
    pub fn format(self, celsius: f64) -> String {
        // Adding zero turns a rounded -0 into 0.
        format!("{:.0}{}", self.convert(celsius).round() + 0.0, self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kph,
    Mph,
    Ms,
}

impl WindSpeedUnit {
    pub const ALL: [WindSpeedUnit; 3] = [WindSpeedUnit::Kph, WindSpeedUnit::Mph, WindSpeedUnit::Ms];

    #[must_use]
    pub fn convert(self, kph: f64) -> f64 {
        match self {
            WindSpeedUnit::Kph => kph,
            WindSpeedUnit::Mph => kph * 0.621_371,
            WindSpeedUnit::Ms => kph * 0.277_778,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WindSpeedUnit::Kph => "km/h",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Ms => "m/s",
        }
    }

    /// Rounded speed with its unit, e.g. `12 mph`
    #[must_use]
    pub fn format(self, kph: f64) -> String {
        format!("{:.0} {}", self.convert(kph).round() + 0.0, self.label())
    }
}
