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

//! Command line options. These apply to one session and are never saved.

use clap::Parser;
use weather_fx::Condition;

use crate::app::Overrides;
use crate::config::AppConfig;

#[derive(Parser, Debug, Default)]
#[command(name = "skycast-desktop")]
#[command(about = "Desktop weather dashboard with an animated sky", long_about = None)]
#[command(version)]
pub struct Args {
    /// Force the backdrop condition (e.g. rain, thunderstorm, partly-cloudy)
    #[arg(short, long)]
    pub condition: Option<Condition>,

    /// Force the night sky
    #[arg(long, conflicts_with = "day")]
    pub night: bool,

    /// Force the daytime sky
    #[arg(long)]
    pub day: bool,

    /// Use the darker sky palette
    #[arg(long)]
    pub dark: bool,

    /// Location query for this session (city, postcode or "lat,lon")
    #[arg(short, long)]
    pub location: Option<String>,

    /// Per-frame lightning probability during thunderstorms (0.0 - 1.0)
    #[arg(long)]
    pub lightning_chance: Option<f64>,

    /// Run the animation at a fixed interval instead of the display refresh rate
    #[arg(long, value_name = "MS")]
    pub frame_interval_ms: Option<u64>,
}

impl Args {
    /// Session-only backdrop overrides
    pub fn overrides(&self) -> Overrides {
        let is_day = match (self.day, self.night) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        Overrides {
            condition: self.condition,
            is_day,
            dark_mode: self.dark.then_some(true),
            location: self.location.clone().filter(|l| !l.trim().is_empty()),
        }
    }

    /// Config with tuning flags layered on top
    pub fn apply_tuning(&self, config: &AppConfig) -> AppConfig {
        AppConfig {
            lightning_chance: self.lightning_chance.unwrap_or(config.lightning_chance),
            frame_interval_ms: self.frame_interval_ms.or(config.frame_interval_ms),
            ..config.clone()
        }
        .sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "skycast-desktop",
            "--condition",
            "thunderstorm",
            "--night",
            "--location",
            "Oslo",
        ])
        .unwrap();

        let overrides = args.overrides();
        assert_eq!(overrides.condition, Some(Condition::Thunderstorm));
        assert_eq!(overrides.is_day, Some(false));
        assert_eq!(overrides.dark_mode, None);
        assert_eq!(overrides.location.as_deref(), Some("Oslo"));
    }

    #[test]
    fn test_day_and_night_conflict() {
        assert!(Args::try_parse_from(["skycast-desktop", "--day", "--night"]).is_err());
        assert!(Args::try_parse_from(["skycast-desktop", "--condition", "hail"]).is_err());
    }

    #[test]
    fn test_tuning_is_sanitized() {
        let args = Args::try_parse_from(["skycast-desktop", "--lightning-chance", "3.5"]).unwrap();
        let config = args.apply_tuning(&AppConfig::default());
        assert!((config.lightning_chance - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.frame_interval_ms, None);
    }
}
