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

//! Lightning bolts and the screen flash that accompanies them.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::surface::{Point, Rgba, Size, Surface};

/// How long a flash stays on screen.
pub const FLASH_DURATION: Duration = Duration::from_millis(50);

/// Default per-tick strike probability.
pub const DEFAULT_STRIKE_CHANCE: f64 = 0.01;

const BOLT_COLOR: Rgba = Rgba::new(255, 255, 255, 0.8);
const BOLT_WIDTH: f32 = 2.0;
const FLASH_COLOR: Rgba = Rgba::new(255, 255, 255, 0.1);

// Bolt shape: each step jitters sideways by up to +/-JITTER and descends
// STEP_MIN..STEP_MAX until it reaches REACH of the surface height.
const JITTER: f32 = 40.0;
const STEP_MIN: f32 = 10.0;
const STEP_MAX: f32 = 30.0;
const REACH: f32 = 0.7;

/// A jagged bolt from the top edge down to roughly 70% of the height.
#[derive(Debug, Clone, PartialEq)]
pub struct Bolt {
    points: Vec<Point>,
}

impl Bolt {
    /// Build a bolt starting at a random x on the top edge.
    pub fn strike<R: Rng + ?Sized>(bounds: Size, rng: &mut R) -> Self {
        let start_x = if bounds.width > 0.0 {
            rng.random_range(0.0..bounds.width)
        } else {
            0.0
        };
        let mut point = Point::new(start_x, 0.0);
        let mut points = vec![point];

        while point.y < bounds.height * REACH {
            point.x += rng.random_range(-JITTER..JITTER);
            point.y += rng.random_range(STEP_MIN..STEP_MAX);
            points.push(point);
        }

        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// A bolt plus a faint full-surface flash, shown for [`FLASH_DURATION`].
#[derive(Debug, Clone)]
pub struct Flash {
    bolt: Bolt,
    triggered_at: Instant,
}

impl Flash {
    #[must_use]
    pub fn new(bolt: Bolt, triggered_at: Instant) -> Self {
        Self { bolt, triggered_at }
    }

    /// Time since the strike.
    #[must_use]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.triggered_at)
    }

    /// Whether the flash should already have been cleared at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.age(now) >= FLASH_DURATION
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.polyline(self.bolt.points(), BOLT_WIDTH, BOLT_COLOR);
        surface.fill(FLASH_COLOR);
    }
}
