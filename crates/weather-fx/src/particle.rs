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

//! Weather particles and their per-tick motion and drawing rules.
//!
//! Each variant of [`Particle`] carries exactly the state its rule needs.
//! Positions are in surface pixels; speeds are pixels per tick.

use std::f32::consts::{FRAC_PI_3, TAU};

use rand::Rng;

use crate::condition::{Condition, ParticleFamily};
use crate::surface::{Point, Rgba, Size, Surface};

/// Y coordinate a falling particle is recycled to, just above the top edge.
pub const RECYCLE_Y: f32 = -10.0;

/// Upper bound (exclusive) of the depth factor applied to fall speed.
pub const MAX_DEPTH: f32 = 3.0;

const RAIN_COLOR: Rgba = Rgba::new(196, 232, 255, 0.6);
const STORM_RAIN_COLOR: Rgba = Rgba::new(196, 232, 255, 0.5);
const SNOW_COLOR: Rgba = Rgba::new(255, 255, 255, 0.8);
const SUN_RAY_COLOR: Rgba = Rgba::new(255, 255, 200, 0.1);
const SUN_GLOW_INNER: Rgba = Rgba::new(255, 255, 200, 0.4);
const STAR_COLOR: Rgba = Rgba::new(255, 255, 255, 0.8);
const CLOUD_COLOR: Rgba = Rgba::new(200, 200, 200, 0.2);
const CLOUD_GLOW_INNER: Rgba = Rgba::new(255, 255, 255, 0.4);

// Snowflake drift: x wobbles with sin(y * FREQ) * AMPLITUDE.
const SNOW_DRIFT_FREQUENCY: f32 = 0.01;
const SNOW_DRIFT_AMPLITUDE: f32 = 0.5;

const SUN_PULSE_AMPLITUDE: f64 = 0.05;
const TWINKLE_BASE_ALPHA: f64 = 0.3;
const TWINKLE_RANGE: f64 = 0.5;

/// A raindrop, drizzle streak or storm streak.
#[derive(Debug, Clone, PartialEq)]
pub struct Drop {
    pub pos: Point,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub depth: f32,
    pub color: Rgba,
}

/// A rotating snow or sleet flake.
#[derive(Debug, Clone, PartialEq)]
pub struct Flake {
    pub pos: Point,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub depth: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub color: Rgba,
}

/// A pulsing glow radiating from the sun anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct SunRay {
    /// Point the ray is rotated around.
    pub anchor: Point,
    /// Size at rest; the drawn size breathes around it.
    pub base_size: f32,
    /// Size after the current pulse.
    pub size: f32,
    /// Ray direction in radians.
    pub angle: f32,
    /// Distance of the glow center from the anchor along the ray.
    pub distance: f32,
    pub pulse_speed: f32,
    pub color: Rgba,
}

/// A twinkling star.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Point,
    pub size: f32,
    pub twinkle_speed: f32,
    pub twinkle_phase: f32,
    pub color: Rgba,
}

/// A soft cloud blob drifting horizontally.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudBlob {
    pub pos: Point,
    pub size: f32,
    pub speed_x: f32,
    pub color: Rgba,
}

/// A particle with no motion rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Mote {
    pub pos: Point,
    pub color: Rgba,
}

/// One simulated visual element.
#[derive(Debug, Clone, PartialEq)]
pub enum Particle {
    Rain(Drop),
    Snow(Flake),
    SunRay(SunRay),
    Star(Star),
    Cloud(CloudBlob),
    Mote(Mote),
}

/// Anchor the sun rays radiate from for a surface of `bounds`.
#[must_use]
pub fn sun_anchor(bounds: Size) -> Point {
    Point::new(bounds.width / 2.0, bounds.height / 3.0)
}

/// Uniform sample in `[0, max)`, or 0 for an empty range.
fn sample<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    if max > 0.0 {
        rng.random_range(0.0..max)
    } else {
        0.0
    }
}

impl Particle {
    /// Create a particle for `condition` somewhere on a surface of `bounds`.
    pub fn spawn<R: Rng + ?Sized>(condition: Condition, is_day: bool, bounds: Size, rng: &mut R) -> Self {
        let pos = Point::new(sample(rng, bounds.width), sample(rng, bounds.height));
        let depth = rng.random_range(0.0..MAX_DEPTH);

        match condition.family() {
            ParticleFamily::Rain => Particle::Rain(Drop {
                pos,
                size: rng.random_range(1.0..3.0),
                speed_x: rng.random_range(-0.5..0.5),
                speed_y: rng.random_range(8.0..11.0),
                depth,
                color: RAIN_COLOR,
            }),
            ParticleFamily::Storm => Particle::Rain(Drop {
                pos,
                size: rng.random_range(1.0..3.0),
                speed_x: rng.random_range(-1.0..1.0),
                speed_y: rng.random_range(10.0..15.0),
                depth,
                color: STORM_RAIN_COLOR,
            }),
            ParticleFamily::Snow => Particle::Snow(Flake {
                pos,
                size: rng.random_range(2.0..6.0),
                speed_x: rng.random_range(-0.5..0.5),
                speed_y: rng.random_range(1.0..2.0),
                depth,
                rotation: rng.random_range(0.0..TAU),
                rotation_speed: rng.random_range(-0.01..0.01),
                color: SNOW_COLOR,
            }),
            ParticleFamily::Clear if is_day => {
                let size = rng.random_range(50.0..150.0);
                Particle::SunRay(SunRay {
                    anchor: sun_anchor(bounds),
                    base_size: size,
                    size,
                    angle: rng.random_range(0.0..TAU),
                    distance: sample(rng, bounds.width * 0.3),
                    pulse_speed: rng.random_range(0.005..0.015),
                    color: SUN_RAY_COLOR,
                })
            }
            ParticleFamily::Clear => Particle::Star(Star {
                pos,
                size: rng.random_range(1.0..3.0),
                twinkle_speed: rng.random_range(0.01..0.06),
                twinkle_phase: rng.random_range(0.0..TAU),
                color: STAR_COLOR,
            }),
            ParticleFamily::Cloud => Particle::Cloud(CloudBlob {
                pos: Point::new(pos.x, sample(rng, bounds.height / 2.0)),
                size: rng.random_range(50.0..150.0),
                speed_x: rng.random_range(-0.25..0.25),
                color: CLOUD_COLOR,
            }),
            ParticleFamily::Still => Particle::Mote(Mote { pos, color: STAR_COLOR }),
        }
    }

    /// Current position of the particle's visual center.
    #[must_use]
    pub fn position(&self) -> Point {
        match self {
            Particle::Rain(p) => p.pos,
            Particle::Snow(p) => p.pos,
            Particle::SunRay(p) => {
                let (sin, cos) = p.angle.sin_cos();
                Point::new(p.anchor.x + p.distance * cos, p.anchor.y + p.distance * sin)
            }
            Particle::Star(p) => p.pos,
            Particle::Cloud(p) => p.pos,
            Particle::Mote(p) => p.pos,
        }
    }

    /// Current color, including any twinkle.
    #[must_use]
    pub fn color(&self) -> Rgba {
        match self {
            Particle::Rain(p) => p.color,
            Particle::Snow(p) => p.color,
            Particle::SunRay(p) => p.color,
            Particle::Star(p) => p.color,
            Particle::Cloud(p) => p.color,
            Particle::Mote(p) => p.color,
        }
    }

    /// Advance one tick.
    ///
    /// `elapsed_ms` is the time since the run started and drives the sun
    /// pulse and star twinkle; falling and drifting particles move a fixed
    /// amount per tick.
    pub fn update<R: Rng + ?Sized>(&mut self, bounds: Size, elapsed_ms: f64, rng: &mut R) {
        match self {
            Particle::Rain(drop) => {
                drop.pos.y += drop.speed_y * drop.depth;
                drop.pos.x += drop.speed_x;
                if drop.pos.y > bounds.height {
                    drop.pos.y = RECYCLE_Y;
                    drop.pos.x = sample(rng, bounds.width);
                }
            }
            Particle::Snow(flake) => {
                flake.pos.y += flake.speed_y * flake.depth;
                flake.pos.x += flake.speed_x + (flake.pos.y * SNOW_DRIFT_FREQUENCY).sin() * SNOW_DRIFT_AMPLITUDE;
                flake.rotation += flake.rotation_speed;
                if flake.pos.y > bounds.height {
                    flake.pos.y = RECYCLE_Y;
                    flake.pos.x = sample(rng, bounds.width);
                }
            }
            Particle::SunRay(ray) => {
                let pulse = (elapsed_ms * f64::from(ray.pulse_speed)).sin() * SUN_PULSE_AMPLITUDE;
                #[allow(clippy::cast_possible_truncation, reason = "pulse factor is within 0.95..=1.05")]
                let factor = (1.0 + pulse) as f32;
                ray.size = ray.base_size * factor;
            }
            Particle::Star(star) => {
                star.color = star.color.with_alpha(twinkle_alpha(star, elapsed_ms));
            }
            Particle::Cloud(cloud) => {
                cloud.pos.x += cloud.speed_x;
                if cloud.pos.x > bounds.width + cloud.size {
                    cloud.pos.x = -cloud.size;
                } else if cloud.pos.x < -cloud.size {
                    cloud.pos.x = bounds.width + cloud.size;
                }
            }
            Particle::Mote(_) => {}
        }
    }

    /// Re-anchor bound-relative state after the surface was resized.
    pub fn reflow(&mut self, bounds: Size) {
        if let Particle::SunRay(ray) = self {
            ray.anchor = sun_anchor(bounds);
        }
    }

    /// Paint the particle in its current state.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self {
            Particle::Rain(drop) => {
                let to = Point::new(drop.pos.x, drop.pos.y + drop.size * 2.0);
                surface.line(drop.pos, to, drop.size / 2.0, drop.color);
            }
            Particle::Snow(flake) => {
                for spoke in 0..6u8 {
                    let theta = flake.rotation + f32::from(spoke) * FRAC_PI_3;
                    let (sin, cos) = theta.sin_cos();
                    // Spoke along +y in the flake's rotated frame.
                    let tip = Point::new(flake.pos.x - flake.size * sin, flake.pos.y + flake.size * cos);
                    surface.line(flake.pos, tip, 1.0, flake.color);
                }
            }
            Particle::SunRay(ray) => {
                let center = self.position();
                surface.radial_gradient(center, ray.size, SUN_GLOW_INNER, SUN_GLOW_INNER.with_alpha(0.0));
            }
            Particle::Star(star) => {
                surface.disc(star.pos, star.size, star.color);
                surface.radial_gradient(
                    star.pos,
                    star.size * 3.0,
                    star.color,
                    Rgba::new(255, 255, 255, 0.0),
                );
            }
            Particle::Cloud(cloud) => {
                surface.radial_gradient(
                    cloud.pos,
                    cloud.size,
                    CLOUD_GLOW_INNER,
                    CLOUD_GLOW_INNER.with_alpha(0.0),
                );
            }
            Particle::Mote(_) => {}
        }
    }
}

/// Star opacity at `elapsed_ms`.
///
/// The sine is rescaled to 0..=1 so the opacity swings between 0.3 and 0.8
/// and never goes negative.
#[allow(clippy::cast_possible_truncation, reason = "alpha is within 0.3..=0.8")]
fn twinkle_alpha(star: &Star, elapsed_ms: f64) -> f32 {
    let phase = elapsed_ms * f64::from(star.twinkle_speed) + f64::from(star.twinkle_phase);
    let wave = 0.5 + 0.5 * phase.sin();
    (TWINKLE_BASE_ALPHA + TWINKLE_RANGE * wave) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawCall, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BOUNDS: Size = Size::new(800.0, 600.0);

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_spawn_variant_matches_condition() {
        let mut rng = rng();
        assert!(matches!(Particle::spawn(Condition::Drizzle, true, BOUNDS, &mut rng), Particle::Rain(_)));
        assert!(matches!(Particle::spawn(Condition::Thunderstorm, true, BOUNDS, &mut rng), Particle::Rain(_)));
        assert!(matches!(Particle::spawn(Condition::Sleet, true, BOUNDS, &mut rng), Particle::Snow(_)));
        assert!(matches!(Particle::spawn(Condition::Clear, true, BOUNDS, &mut rng), Particle::SunRay(_)));
        assert!(matches!(Particle::spawn(Condition::Sunny, false, BOUNDS, &mut rng), Particle::Star(_)));
        assert!(matches!(Particle::spawn(Condition::Overcast, true, BOUNDS, &mut rng), Particle::Cloud(_)));
        assert!(matches!(Particle::spawn(Condition::Fog, true, BOUNDS, &mut rng), Particle::Mote(_)));
    }

    #[test]
    fn test_mote_keeps_position_and_color() {
        let mut rng = rng();
        let mut particle = Particle::spawn(Condition::Mist, true, BOUNDS, &mut rng);
        let Particle::Mote(mote) = particle.clone() else {
            panic!("mist should spawn motes");
        };
        assert_eq!(mote.color, STAR_COLOR);

        particle.update(BOUNDS, 1000.0, &mut rng);
        assert_eq!(particle, Particle::Mote(mote.clone()));
        assert_eq!(particle.position(), mote.pos);
    }

    #[test]
    fn test_storm_falls_faster_than_rain() {
        let mut rng = rng();
        for _ in 0..100 {
            let Particle::Rain(rain) = Particle::spawn(Condition::Rain, true, BOUNDS, &mut rng) else {
                panic!("rain spawned a non-rain particle");
            };
            let Particle::Rain(storm) = Particle::spawn(Condition::Thunderstorm, true, BOUNDS, &mut rng) else {
                panic!("storm spawned a non-rain particle");
            };
            assert!((8.0..11.0).contains(&rain.speed_y));
            assert!((10.0..15.0).contains(&storm.speed_y));
            assert!((0.0..MAX_DEPTH).contains(&rain.depth));
        }
    }

    #[test]
    fn test_rain_recycles_above_top() {
        let mut rng = rng();
        let mut particle = Particle::Rain(Drop {
            pos: Point::new(100.0, 0.0),
            size: 2.0,
            speed_x: 0.5,
            speed_y: 10.0,
            depth: 1.5,
            color: RAIN_COLOR,
        });

        let mut recycled = false;
        for tick in 0..200 {
            let before = particle.position();
            particle.update(BOUNDS, f64::from(tick) * 16.0, &mut rng);
            let after = particle.position();
            assert!(after.y <= BOUNDS.height + 15.0, "raindrop escaped to y={}", after.y);
            if after.y < before.y {
                assert!((after.y - RECYCLE_Y).abs() < f32::EPSILON);
                assert!((0.0..BOUNDS.width).contains(&after.x));
                recycled = true;
                break;
            }
        }
        assert!(recycled, "raindrop never recycled");
    }

    #[test]
    fn test_snow_drifts_rotates_and_recycles() {
        let mut rng = rng();
        let mut particle = Particle::Snow(Flake {
            pos: Point::new(400.0, 590.0),
            size: 4.0,
            speed_x: 0.0,
            speed_y: 2.0,
            depth: 2.0,
            rotation: 0.0,
            rotation_speed: 0.01,
            color: SNOW_COLOR,
        });

        particle.update(BOUNDS, 0.0, &mut rng);
        let Particle::Snow(flake) = &particle else { unreachable!() };
        assert!((flake.pos.y - 594.0).abs() < 1e-3);
        let drift = (594.0f32 * 0.01).sin() * 0.5;
        assert!((flake.pos.x - (400.0 + drift)).abs() < 1e-3);
        assert!((flake.rotation - 0.01).abs() < 1e-6);

        // 598, then 602 which is past the bottom edge.
        for _ in 0..2 {
            particle.update(BOUNDS, 0.0, &mut rng);
        }
        let Particle::Snow(flake) = &particle else { unreachable!() };
        assert!((flake.pos.y - RECYCLE_Y).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cloud_wraps_both_edges() {
        let mut rng = rng();
        let mut right = Particle::Cloud(CloudBlob {
            pos: Point::new(BOUNDS.width + 60.0, 100.0),
            size: 60.0,
            speed_x: 0.25,
            color: CLOUD_COLOR,
        });
        right.update(BOUNDS, 0.0, &mut rng);
        assert!((right.position().x - -60.0).abs() < f32::EPSILON);

        let mut left = Particle::Cloud(CloudBlob {
            pos: Point::new(-60.0, 100.0),
            size: 60.0,
            speed_x: -0.25,
            color: CLOUD_COLOR,
        });
        left.update(BOUNDS, 0.0, &mut rng);
        assert!((left.position().x - (BOUNDS.width + 60.0)).abs() < f32::EPSILON);
        assert!((left.position().y - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_star_alpha_stays_in_twinkle_range() {
        let mut rng = rng();
        let mut star = Particle::spawn(Condition::Clear, false, BOUNDS, &mut rng);
        let Particle::Star(s) = &star else { unreachable!() };
        let period_ms = std::f64::consts::TAU / f64::from(s.twinkle_speed);
        let start = star.position();

        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for step in 0..=1000 {
            star.update(BOUNDS, period_ms * f64::from(step) / 1000.0, &mut rng);
            let alpha = star.color().a;
            min = min.min(alpha);
            max = max.max(alpha);
        }
        assert!(min >= 0.3 - 1e-3, "alpha dipped to {min}");
        assert!(max <= 0.8 + 1e-3, "alpha rose to {max}");
        assert!(max - min > 0.45, "star did not twinkle");
        assert_eq!(star.position(), start);
    }

    #[test]
    fn test_sun_ray_breathes_without_moving() {
        let mut rng = rng();
        let mut ray = Particle::spawn(Condition::Sunny, true, BOUNDS, &mut rng);
        let start = ray.position();
        let Particle::SunRay(r) = &ray else { unreachable!() };
        let base = r.base_size;

        for tick in 0..1000 {
            ray.update(BOUNDS, f64::from(tick) * 16.0, &mut rng);
            let Particle::SunRay(r) = &ray else { unreachable!() };
            assert!(r.size >= base * 0.95 - 1e-3 && r.size <= base * 1.05 + 1e-3);
        }
        assert_eq!(ray.position(), start);
    }

    #[test]
    fn test_reflow_moves_sun_anchor() {
        let mut rng = rng();
        let mut ray = Particle::spawn(Condition::Sunny, true, BOUNDS, &mut rng);
        ray.reflow(Size::new(1200.0, 900.0));
        let Particle::SunRay(r) = &ray else { unreachable!() };
        assert_eq!(r.anchor, Point::new(600.0, 300.0));
    }

    #[test]
    fn test_draw_shapes() {
        let mut rng = rng();
        let mut surface = RecordingSurface::new(BOUNDS.width, BOUNDS.height);

        Particle::spawn(Condition::Snow, true, BOUNDS, &mut rng).draw(&mut surface);
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Line { .. })), 6);

        surface.calls.clear();
        Particle::spawn(Condition::Clear, false, BOUNDS, &mut rng).draw(&mut surface);
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Disc { .. })), 1);
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Gradient { .. })), 1);

        surface.calls.clear();
        let drop = Drop {
            pos: Point::new(10.0, 20.0),
            size: 2.0,
            speed_x: 0.0,
            speed_y: 9.0,
            depth: 1.0,
            color: RAIN_COLOR,
        };
        Particle::Rain(drop).draw(&mut surface);
        assert_eq!(
            surface.calls,
            vec![DrawCall::Line {
                from: Point::new(10.0, 20.0),
                to: Point::new(10.0, 24.0),
                width: 1.0,
                color: RAIN_COLOR,
            }]
        );

        surface.calls.clear();
        Particle::spawn(Condition::Mist, true, BOUNDS, &mut rng).draw(&mut surface);
        assert!(surface.calls.is_empty());
    }
}
