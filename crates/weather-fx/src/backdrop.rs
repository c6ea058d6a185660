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

//! Static sky behind the particle layer.
//!
//! Picks a two-stop vertical gradient from the condition, time of day and
//! dark mode, and paints the ambient glows and haze used by conditions that
//! have no particle motion of their own.

use std::f32::consts::TAU;
use std::time::Duration;

use crate::condition::Condition;
use crate::surface::{Point, Rgba, Surface};

/// Sky palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sky {
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
}

impl Sky {
    #[must_use]
    pub fn for_condition(condition: Condition, is_day: bool) -> Self {
        match condition {
            Condition::Sunny | Condition::Clear if is_day => Sky::ClearDay,
            Condition::Sunny | Condition::Clear => Sky::ClearNight,
            Condition::PartlyCloudy if is_day => Sky::PartlyCloudyDay,
            Condition::PartlyCloudy => Sky::PartlyCloudyNight,
            Condition::Cloudy | Condition::Overcast | Condition::Mist | Condition::Fog => Sky::Cloudy,
            Condition::Rain | Condition::Drizzle => Sky::Rainy,
            Condition::Snow | Condition::Sleet => Sky::Snowy,
            Condition::Thunderstorm => Sky::Stormy,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Sky::ClearDay => "clear-day",
            Sky::ClearNight => "clear-night",
            Sky::PartlyCloudyDay => "partly-cloudy-day",
            Sky::PartlyCloudyNight => "partly-cloudy-night",
            Sky::Cloudy => "cloudy",
            Sky::Rainy => "rainy",
            Sky::Snowy => "snowy",
            Sky::Stormy => "stormy",
        }
    }

    /// Top and bottom gradient stops.
    #[must_use]
    pub fn gradient(&self, dark_mode: bool) -> (Rgba, Rgba) {
        let ((tr, tg, tb), (br, bg, bb)) = match (self, dark_mode) {
            (Sky::ClearDay, false) => ((56, 152, 236), (142, 202, 250)),
            (Sky::ClearDay, true) => ((20, 52, 100), (40, 90, 150)),
            (Sky::ClearNight, false) => ((10, 14, 40), (36, 40, 86)),
            (Sky::ClearNight, true) => ((4, 6, 20), (16, 20, 48)),
            (Sky::PartlyCloudyDay, false) => ((84, 150, 210), (170, 200, 225)),
            (Sky::PartlyCloudyDay, true) => ((28, 56, 90), (60, 84, 110)),
            (Sky::PartlyCloudyNight, false) => ((22, 28, 56), (58, 64, 96)),
            (Sky::PartlyCloudyNight, true) => ((10, 12, 28), (30, 34, 56)),
            (Sky::Cloudy, false) => ((120, 130, 145), (170, 178, 190)),
            (Sky::Cloudy, true) => ((40, 44, 52), (70, 76, 86)),
            (Sky::Rainy, false) => ((70, 84, 104), (110, 124, 140)),
            (Sky::Rainy, true) => ((24, 30, 40), (44, 52, 64)),
            (Sky::Snowy, false) => ((170, 190, 210), (225, 232, 240)),
            (Sky::Snowy, true) => ((50, 60, 75), (90, 100, 115)),
            (Sky::Stormy, false) => ((40, 44, 60), (78, 82, 100)),
            (Sky::Stormy, true) => ((14, 16, 24), (34, 36, 48)),
        };
        (Rgba::new(tr, tg, tb, 1.0), Rgba::new(br, bg, bb, 1.0))
    }
}

/// Ambient decoration painted over the sky gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Ambient {
    None,
    /// Soft sun (by day) and two slowly drifting cloud glows.
    PartlyCloudy { sun: bool },
    /// A faint veil with haze bands near the top and bottom.
    Haze,
}

const SUN_GLOW: Rgba = Rgba::new(250, 204, 21, 0.5);
const CLOUD_GLOW: Rgba = Rgba::new(255, 255, 255, 0.3);
const FAR_CLOUD_GLOW: Rgba = Rgba::new(255, 255, 255, 0.2);
const HAZE_VEIL: Rgba = Rgba::new(255, 255, 255, 0.1);
const HAZE_BAND: Rgba = Rgba::new(255, 255, 255, 0.2);

// Cloud glows sway sideways over this period.
const DRIFT_PERIOD_SECS: f32 = 15.0;
const DRIFT_DISTANCE: f32 = 24.0;

/// Everything drawn beneath the particles for one sky configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    sky: Sky,
    top: Rgba,
    bottom: Rgba,
    ambient: Ambient,
}

impl Backdrop {
    #[must_use]
    pub fn for_sky(condition: Condition, is_day: bool, dark_mode: bool) -> Self {
        let sky = Sky::for_condition(condition, is_day);
        let (top, bottom) = sky.gradient(dark_mode);
        let ambient = match condition {
            Condition::PartlyCloudy => Ambient::PartlyCloudy { sun: is_day },
            Condition::Mist | Condition::Fog => Ambient::Haze,
            _ => Ambient::None,
        };
        Self {
            sky,
            top,
            bottom,
            ambient,
        }
    }

    #[must_use]
    pub fn sky(&self) -> Sky {
        self.sky
    }

    /// Gradient stops, top then bottom.
    #[must_use]
    pub fn stops(&self) -> (Rgba, Rgba) {
        (self.top, self.bottom)
    }

    /// Paint the sky and its ambient decoration.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S, elapsed: Duration) {
        let size = surface.size();
        if size.is_empty() {
            return;
        }

        surface.vertical_gradient(0.0, size.height, self.top, self.bottom);

        match self.ambient {
            Ambient::None => {}
            Ambient::PartlyCloudy { sun } => {
                if sun {
                    surface.radial_gradient(
                        Point::new(size.width - 80.0, 80.0),
                        60.0,
                        SUN_GLOW,
                        SUN_GLOW.with_alpha(0.0),
                    );
                }
                let sway = (elapsed.as_secs_f32() * TAU / DRIFT_PERIOD_SECS).sin() * DRIFT_DISTANCE;
                surface.radial_gradient(
                    Point::new(size.width * 0.2 + 80.0 + sway, 120.0),
                    100.0,
                    CLOUD_GLOW,
                    CLOUD_GLOW.with_alpha(0.0),
                );
                surface.radial_gradient(
                    Point::new(size.width * 0.75 - 112.0 - sway, size.height - 176.0),
                    120.0,
                    FAR_CLOUD_GLOW,
                    FAR_CLOUD_GLOW.with_alpha(0.0),
                );
            }
            Ambient::Haze => {
                surface.fill(HAZE_VEIL);
                let clear = HAZE_BAND.with_alpha(0.0);
                for band_top in [40.0, size.height - 200.0] {
                    let middle = band_top + 80.0;
                    surface.vertical_gradient(band_top, middle, clear, HAZE_BAND);
                    surface.vertical_gradient(middle, middle + 80.0, HAZE_BAND, clear);
                }
            }
        }
    }
}
