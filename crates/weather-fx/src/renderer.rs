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

//! Weather particle renderer.
//!
//! The renderer is a two-state machine, `Idle` or `Running(run)`. Starting a
//! run always tears down the previous one first (cancelling its scheduled
//! frame and removing its resize listener) so only one frame loop is ever
//! live per host. Every tick clears the surface, updates and draws each
//! particle in population order, rolls for lightning during storms and then
//! requests the next frame.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::condition::{particle_count, Condition};
use crate::host::{FrameHandle, FrameHost, ListenerId};
use crate::lightning::{Bolt, Flash, DEFAULT_STRIKE_CHANCE, FLASH_DURATION};
use crate::particle::Particle;
use crate::surface::{Size, Surface};

/// Inputs that define a run. Any change restarts the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    pub condition: Condition,
    pub is_day: bool,
    pub dark_mode: bool,
}

/// Identifies one run from start to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunHandle(u64);

/// Tunables for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererOptions {
    /// Probability of a lightning strike on any single storm tick.
    pub lightning_chance: f64,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            lightning_chance: DEFAULT_STRIKE_CHANCE,
        }
    }
}

/// One active simulation.
#[derive(Debug)]
struct Run {
    handle: RunHandle,
    config: RunConfig,
    bounds: Size,
    particles: Vec<Particle>,
    started_at: Instant,
    frame: Option<FrameHandle>,
    resize_listener: ListenerId,
    flash: Option<Flash>,
}

#[derive(Debug)]
enum State {
    Idle,
    Running(Run),
}

/// Drives the weather backdrop for a single host view.
#[derive(Debug)]
pub struct Renderer<R = StdRng> {
    state: State,
    options: RendererOptions,
    rng: R,
    next_run: u64,
}

impl Renderer<StdRng> {
    /// Create an idle renderer seeded from the operating system.
    #[must_use]
    pub fn new(options: RendererOptions) -> Self {
        Self::with_rng(options, StdRng::from_os_rng())
    }
}

impl<R: Rng> Renderer<R> {
    /// Create an idle renderer with a caller-supplied random source.
    pub fn with_rng(options: RendererOptions, rng: R) -> Self {
        Self {
            state: State::Idle,
            options,
            rng,
            next_run: 0,
        }
    }

    /// Start a run for `config`, superseding any run in progress.
    ///
    /// Returns `None` without scheduling anything when the host has no
    /// drawable surface.
    pub fn start<H: FrameHost + ?Sized>(&mut self, config: RunConfig, host: &mut H, now: Instant) -> Option<RunHandle> {
        self.stop(host);

        let bounds = match host.surface_size() {
            Some(size) if !size.is_empty() => size,
            other => {
                warn!("Weather backdrop disabled: no drawing surface available ({other:?})");
                return None;
            }
        };

        let count = particle_count(config.condition, config.is_day);
        let particles: Vec<Particle> = (0..count)
            .map(|_| Particle::spawn(config.condition, config.is_day, bounds, &mut self.rng))
            .collect();

        self.next_run += 1;
        let handle = RunHandle(self.next_run);
        let resize_listener = host.add_resize_listener();
        let frame = Some(host.request_frame());

        info!(
            "Started weather run #{} ({}, {}, {} particles, {:.0}x{:.0})",
            handle.0,
            config.condition,
            if config.is_day { "day" } else { "night" },
            count,
            bounds.width,
            bounds.height
        );

        self.state = State::Running(Run {
            handle,
            config,
            bounds,
            particles,
            started_at: now,
            frame,
            resize_listener,
            flash: None,
        });

        Some(handle)
    }

    /// Start a run only if `config` differs from the active one.
    ///
    /// Returns the handle of the run that is active afterwards.
    pub fn ensure<H: FrameHost + ?Sized>(&mut self, config: RunConfig, host: &mut H, now: Instant) -> Option<RunHandle> {
        if let State::Running(run) = &self.state {
            if run.config == config {
                return Some(run.handle);
            }
        }
        self.start(config, host, now)
    }

    /// Stop the active run: cancel its pending frame, remove its resize
    /// listener and drop its particles. Does nothing when idle.
    pub fn stop<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if let State::Running(run) = std::mem::replace(&mut self.state, State::Idle) {
            if let Some(frame) = run.frame {
                host.cancel_frame(frame);
            }
            host.remove_resize_listener(run.resize_listener);
            debug!("Stopped weather run #{}", run.handle.0);
        }
    }

    /// Record a new viewport size for the active run.
    ///
    /// Particles keep their positions; recycling, wrapping and the sun
    /// anchor use the new bounds from the next tick on.
    pub fn resize(&mut self, size: Size) {
        if let State::Running(run) = &mut self.state {
            if run.bounds == size {
                return;
            }
            debug!(
                "Weather run #{} resized to {:.0}x{:.0}",
                run.handle.0, size.width, size.height
            );
            run.bounds = size;
            for particle in &mut run.particles {
                particle.reflow(size);
            }
        }
    }

    /// Run one frame: clear, update and draw every particle, roll for
    /// lightning, then schedule the next frame.
    pub fn tick<S, H>(&mut self, surface: &mut S, host: &mut H, now: Instant)
    where
        S: Surface + ?Sized,
        H: FrameHost + ?Sized,
    {
        let State::Running(run) = &mut self.state else {
            return;
        };

        // Whatever frame brought us here has been serviced; make sure no
        // stale request survives alongside the one scheduled below.
        if let Some(previous) = run.frame.take() {
            host.cancel_frame(previous);
        }

        surface.clear();

        let elapsed_ms = now.saturating_duration_since(run.started_at).as_secs_f64() * 1000.0;
        for particle in &mut run.particles {
            particle.update(run.bounds, elapsed_ms, &mut self.rng);
            particle.draw(surface);
        }

        if run.flash.as_ref().is_some_and(|flash| flash.is_expired(now)) {
            run.flash = None;
        }

        let chance = if self.options.lightning_chance.is_finite() {
            self.options.lightning_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if run.config.condition == Condition::Thunderstorm && self.rng.random_bool(chance) {
            run.flash = Some(Flash::new(Bolt::strike(run.bounds, &mut self.rng), now));
        }

        if let Some(flash) = &run.flash {
            flash.draw(surface);
        }

        run.frame = Some(host.request_frame());
    }

    /// Draw the current state again without advancing the simulation.
    ///
    /// For hosts that repaint the whole surface between scheduled frames.
    /// A flash that has outlived its duration is no longer drawn.
    pub fn redraw<S: Surface + ?Sized>(&self, surface: &mut S, now: Instant) {
        let State::Running(run) = &self.state else {
            return;
        };

        surface.clear();
        for particle in &run.particles {
            particle.draw(surface);
        }
        if let Some(flash) = run.flash.as_ref().filter(|flash| !flash.is_expired(now)) {
            flash.draw(surface);
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// Handle of the active run, if any.
    #[must_use]
    pub fn current_run(&self) -> Option<RunHandle> {
        match &self.state {
            State::Running(run) => Some(run.handle),
            State::Idle => None,
        }
    }

    /// Configuration of the active run, if any.
    #[must_use]
    pub fn config(&self) -> Option<RunConfig> {
        match &self.state {
            State::Running(run) => Some(run.config),
            State::Idle => None,
        }
    }

    /// Particles of the active run, in draw order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        match &self.state {
            State::Running(run) => &run.particles,
            State::Idle => &[],
        }
    }

    /// Bounds the active run simulates within.
    #[must_use]
    pub fn bounds(&self) -> Option<Size> {
        match &self.state {
            State::Running(run) => Some(run.bounds),
            State::Idle => None,
        }
    }

    /// Whether a lightning flash is currently on screen.
    #[must_use]
    pub fn flash_active(&self) -> bool {
        matches!(&self.state, State::Running(run) if run.flash.is_some())
    }

    /// Time left until the current flash should be cleared.
    ///
    /// Hosts that repaint lazily use this to wake up in time to remove it.
    #[must_use]
    pub fn flash_remaining(&self, now: Instant) -> Option<Duration> {
        match &self.state {
            State::Running(Run { flash: Some(flash), .. }) if !flash.is_expired(now) => {
                Some(FLASH_DURATION.saturating_sub(flash.age(now)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockHost;
    use crate::surface::recording::{DrawCall, RecordingSurface};

    fn renderer(lightning_chance: f64) -> Renderer {
        Renderer::with_rng(RendererOptions { lightning_chance }, StdRng::seed_from_u64(1234))
    }

    fn config(condition: Condition, is_day: bool) -> RunConfig {
        RunConfig {
            condition,
            is_day,
            dark_mode: false,
        }
    }

    #[test]
    fn test_start_allocates_condition_population() {
        let cases = [
            (Condition::Rain, true, 200),
            (Condition::Drizzle, true, 200),
            (Condition::Snow, true, 100),
            (Condition::Sleet, false, 100),
            (Condition::Thunderstorm, true, 250),
            (Condition::Sunny, true, 30),
            (Condition::Sunny, false, 100),
            (Condition::Cloudy, true, 50),
            (Condition::Overcast, false, 50),
        ];

        for (condition, is_day, expected) in cases {
            let mut host = MockHost::with_size(800.0, 600.0);
            let mut renderer = renderer(0.0);
            let handle = renderer.start(config(condition, is_day), &mut host, Instant::now());

            assert!(handle.is_some());
            assert_eq!(renderer.particles().len(), expected, "{condition} day={is_day}");
            assert_eq!(host.pending_frames.len(), 1);
            assert_eq!(host.listeners.len(), 1);
        }
    }

    #[test]
    fn test_restart_replaces_population() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(0.0);
        let now = Instant::now();

        renderer.start(config(Condition::Rain, true), &mut host, now);
        assert_eq!(renderer.particles().len(), 200);

        renderer.stop(&mut host);
        assert!(!renderer.is_running());
        assert!(renderer.particles().is_empty());

        renderer.start(config(Condition::Snow, true), &mut host, now);
        assert_eq!(renderer.particles().len(), 100);
        assert!(renderer.particles().iter().all(|p| matches!(p, Particle::Snow(_))));
    }

    #[test]
    fn test_double_start_keeps_one_frame_loop() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(0.0);
        let now = Instant::now();

        let first = renderer.start(config(Condition::Rain, true), &mut host, now).unwrap();
        let first_frame = *host.pending_frames.iter().next().unwrap();

        let second = renderer.start(config(Condition::Thunderstorm, true), &mut host, now).unwrap();

        assert_ne!(first, second);
        assert_eq!(host.cancelled, vec![first_frame]);
        assert_eq!(host.pending_frames.len(), 1);
        assert!(!host.pending_frames.contains(&first_frame));
        assert_eq!(host.listeners.len(), 1);
        assert_eq!(renderer.particles().len(), 250);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(0.0);

        renderer.start(config(Condition::Snow, false), &mut host, Instant::now());
        renderer.stop(&mut host);
        renderer.stop(&mut host);

        assert!(host.pending_frames.is_empty());
        assert!(host.listeners.is_empty());
        assert_eq!(host.cancelled.len(), 1);
        assert!(renderer.current_run().is_none());
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let mut host = MockHost::without_surface();
        let mut renderer = renderer(0.0);
        let mut surface = RecordingSurface::new(0.0, 0.0);

        assert!(renderer.start(config(Condition::Rain, true), &mut host, Instant::now()).is_none());
        assert!(!renderer.is_running());
        assert!(host.pending_frames.is_empty());
        assert!(host.listeners.is_empty());

        renderer.tick(&mut surface, &mut host, Instant::now());
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_ensure_only_restarts_on_change() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(0.0);
        let now = Instant::now();

        let a = renderer.ensure(config(Condition::Cloudy, true), &mut host, now);
        let b = renderer.ensure(config(Condition::Cloudy, true), &mut host, now);
        assert_eq!(a, b);
        assert!(host.cancelled.is_empty());

        let dark = RunConfig {
            dark_mode: true,
            ..config(Condition::Cloudy, true)
        };
        let c = renderer.ensure(dark, &mut host, now);
        assert_ne!(a, c);
        assert_eq!(host.cancelled.len(), 1);
        assert_eq!(host.listeners.len(), 1);
    }

    #[test]
    fn test_tick_draws_every_particle_and_reschedules() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(0.0);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let now = Instant::now();

        renderer.start(config(Condition::Rain, true), &mut host, now);
        host.fire();
        renderer.tick(&mut surface, &mut host, now + Duration::from_millis(16));

        assert_eq!(surface.calls[0], DrawCall::Clear);
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Line { .. })), 200);
        assert_eq!(host.pending_frames.len(), 1);
    }

    #[test]
    fn test_falling_particles_never_escape_bottom() {
        let mut host = MockHost::with_size(400.0, 300.0);
        let mut renderer = renderer(0.0);
        let mut surface = RecordingSurface::new(400.0, 300.0);
        let start = Instant::now();

        renderer.start(config(Condition::Thunderstorm, true), &mut host, start);
        for frame in 1..=600u64 {
            host.fire();
            renderer.tick(&mut surface, &mut host, start + Duration::from_millis(frame * 16));
            for particle in renderer.particles() {
                assert!(particle.position().y <= 300.0 + f32::EPSILON);
            }
        }
    }

    #[test]
    fn test_lightning_flash_is_cleared_quickly() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(1.0);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let start = Instant::now();

        renderer.start(config(Condition::Thunderstorm, true), &mut host, start);
        renderer.tick(&mut surface, &mut host, start);
        assert!(renderer.flash_active());
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Fill(_))), 1);
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Polyline { .. })), 1);
        assert_eq!(renderer.flash_remaining(start), Some(FLASH_DURATION));

        // Stop striking; the existing flash must clear on its own.
        renderer.options.lightning_chance = 0.0;
        renderer.tick(&mut surface, &mut host, start + Duration::from_millis(20));
        assert!(renderer.flash_active());

        renderer.tick(&mut surface, &mut host, start + FLASH_DURATION);
        assert!(!renderer.flash_active());
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Fill(_))), 0);
        assert!(renderer.flash_remaining(start + FLASH_DURATION).is_none());
    }

    #[test]
    fn test_redraw_hides_expired_flash() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(1.0);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let start = Instant::now();

        renderer.start(config(Condition::Thunderstorm, true), &mut host, start);
        renderer.tick(&mut surface, &mut host, start);

        renderer.redraw(&mut surface, start + Duration::from_millis(10));
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Fill(_))), 1);

        renderer.redraw(&mut surface, start + FLASH_DURATION);
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Fill(_))), 0);
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Line { .. })), 250);
    }

    #[test]
    fn test_no_lightning_outside_storms() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(1.0);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let start = Instant::now();

        renderer.start(config(Condition::Rain, true), &mut host, start);
        for frame in 0..50u64 {
            renderer.tick(&mut surface, &mut host, start + Duration::from_millis(frame * 16));
            assert!(!renderer.flash_active());
        }
    }

    #[test]
    fn test_redraw_does_not_advance() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(0.0);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let now = Instant::now();

        renderer.start(config(Condition::Rain, true), &mut host, now);
        let before: Vec<_> = renderer.particles().iter().map(Particle::position).collect();

        renderer.redraw(&mut surface, now);
        let after: Vec<_> = renderer.particles().iter().map(Particle::position).collect();

        assert_eq!(before, after);
        assert_eq!(surface.count(|c| matches!(c, DrawCall::Line { .. })), 200);
        assert_eq!(host.pending_frames.len(), 1);
    }

    #[test]
    fn test_resize_reflows_bounds() {
        let mut host = MockHost::with_size(800.0, 600.0);
        let mut renderer = renderer(0.0);
        let mut surface = RecordingSurface::new(400.0, 200.0);
        let start = Instant::now();

        renderer.start(config(Condition::Snow, true), &mut host, start);
        renderer.resize(Size::new(400.0, 200.0));
        assert_eq!(renderer.bounds(), Some(Size::new(400.0, 200.0)));

        // Flakes spawned below the new bottom edge are recycled on the next tick.
        renderer.tick(&mut surface, &mut host, start);
        for particle in renderer.particles() {
            assert!(particle.position().y <= 200.0 + f32::EPSILON);
        }
        assert_eq!(host.listeners.len(), 1);
    }
}
