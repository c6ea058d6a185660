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

use chrono::{Local, Timelike};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use weather_fx::{Backdrop, Condition, FrameHost, Renderer, RendererOptions, RunConfig, Size};

use crate::config::AppConfig;
use crate::status::{self, SharedWeatherStatus, WeatherStatus};
use crate::status_pane::{BackdropInfo, StatusPane};
use crate::ui::{Dashboard, DashboardAction, DashboardView, EguiFrameHost, EguiSurface};
use crate::weather::{WeatherReport, WeatherWorker};

/// Session-only choices that take precedence over live data and saved
/// preferences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub condition: Option<Condition>,
    pub is_day: Option<bool>,
    pub dark_mode: Option<bool>,
    pub location: Option<String>,
}

/// Daytime when no report says otherwise
fn is_daytime_hour(hour: u32) -> bool {
    (6..18).contains(&hour)
}

/// Pick what the backdrop shows: overrides first, then the live report,
/// then the configured fallback and local clock.
pub fn resolve_run_config(
    overrides: &Overrides,
    report: Option<&WeatherReport>,
    config: &AppConfig,
    local_hour: u32,
) -> RunConfig {
    RunConfig {
        condition: overrides
            .condition
            .or(report.map(|r| r.condition))
            .unwrap_or(config.fallback_condition),
        is_day: overrides
            .is_day
            .or(report.map(|r| r.is_day))
            .unwrap_or_else(|| is_daytime_hour(local_hour)),
        dark_mode: overrides.dark_mode.unwrap_or(config.dark_mode),
    }
}

/// Keep the renderer on `run_config` once the viewport has area.
///
/// A minimised window reports an empty rect; the current run, if any, is
/// left as it is until the viewport comes back.
fn sync_renderer(renderer: &mut Renderer, host: &mut EguiFrameHost, run_config: RunConfig, now: Instant) {
    if host.surface_size().is_some_and(|size| !size.is_empty()) {
        renderer.ensure(run_config, host, now);
    }
}

#[derive(Debug)]
pub struct SkycastApp {
    /// Saved preferences; CLI tuning is not part of this
    config: AppConfig,
    overrides: Overrides,
    status: SharedWeatherStatus,
    worker: WeatherWorker,
    renderer: Renderer,
    host: EguiFrameHost,
    started: Instant,
    dashboard: Dashboard,
    status_pane: StatusPane,
}

impl SkycastApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, overrides: Overrides, tuning: &AppConfig) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let location = overrides.location.clone().unwrap_or_else(|| config.location.clone());
        let status = Arc::new(Mutex::new(WeatherStatus::new(location.clone())));

        let ctx = cc.egui_ctx.clone();
        let worker = WeatherWorker::spawn(
            config.resolve_api_key(),
            location.clone(),
            config.refresh_interval(),
            status.clone(),
            Box::new(move || ctx.request_repaint()),
        );

        let frame_interval = tuning.frame_interval_ms.map(Duration::from_millis);
        let renderer = Renderer::new(RendererOptions {
            lightning_chance: tuning.lightning_chance,
        });

        info!(
            "SkyCast ready: location '{}', lightning chance {:.3}, frames {}",
            location,
            tuning.lightning_chance,
            frame_interval.map_or_else(|| "every refresh".to_string(), |d| format!("every {} ms", d.as_millis()))
        );

        Self {
            dashboard: Dashboard::new(&location),
            config,
            overrides,
            status,
            worker,
            renderer,
            host: EguiFrameHost::new(cc.egui_ctx.clone(), frame_interval),
            started: Instant::now(),
            status_pane: StatusPane::new(),
        }
    }

    fn current_run_config(&self) -> RunConfig {
        let status = status::lock(&self.status);
        resolve_run_config(&self.overrides, status.report.as_ref(), &self.config, Local::now().hour())
    }

    fn paint_backdrop(&mut self, ui: &egui::Ui, now: Instant) {
        let rect = ui.max_rect();
        let observed = self.host.observe_viewport(Size::new(rect.width(), rect.height()));
        if let Some(size) = observed.filter(|size| !size.is_empty()) {
            self.renderer.resize(size);
        }

        let run_config = self.current_run_config();
        sync_renderer(&mut self.renderer, &mut self.host, run_config, now);

        let painter = ui.painter_at(rect);
        let mut surface = EguiSurface::new(&painter, rect);

        Backdrop::for_sky(run_config.condition, run_config.is_day, run_config.dark_mode)
            .paint(&mut surface, now.saturating_duration_since(self.started));

        if self.host.frame_due(now) {
            self.renderer.tick(&mut surface, &mut self.host, now);
        } else {
            self.renderer.redraw(&mut surface, now);
        }

        // Wake up in time to take the flash down when frames are spaced out
        if let Some(remaining) = self.renderer.flash_remaining(now) {
            ui.ctx().request_repaint_after(remaining);
        }
    }

    fn apply(&mut self, action: DashboardAction) {
        debug!("Dashboard action: {action:?}");

        match action {
            DashboardAction::SetConditionOverride(condition) => self.overrides.condition = condition,
            DashboardAction::SetDayOverride(is_day) => self.overrides.is_day = is_day,
            DashboardAction::SetDarkMode(dark_mode) => {
                self.overrides.dark_mode = None;
                self.config.dark_mode = dark_mode;
                self.save_config();
            }
            DashboardAction::SetTemperatureUnit(unit) => {
                self.config.temperature_unit = unit;
                self.save_config();
            }
            DashboardAction::SetWindSpeedUnit(unit) => {
                self.config.wind_speed_unit = unit;
                self.save_config();
            }
            DashboardAction::SetLocation(location) => {
                self.overrides.location = None;
                self.config.location = location.clone();
                self.worker.set_location(location);
                self.save_config();
            }
            DashboardAction::Refresh => self.worker.refresh_now(),
        }
    }

    fn save_config(&self) {
        match self.config.save() {
            Ok(()) => debug!("Configuration saved"),
            Err(e) => warn!("Failed to save configuration: {e}"),
        }
    }
}

impl eframe::App for SkycastApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.paint_backdrop(ui, now);
            });

        let backdrop = BackdropInfo {
            run: self.renderer.config(),
            particles: self.renderer.particles().len(),
            flash_active: self.renderer.flash_active(),
        };
        let dark_mode = self.overrides.dark_mode.unwrap_or(self.config.dark_mode);

        let actions = {
            let status = status::lock(&self.status);
            let view = DashboardView {
                status: &status,
                config: &self.config,
                overrides: &self.overrides,
                active: backdrop.run,
                dark_mode,
            };
            let actions = self.dashboard.render(ctx, &view);
            self.status_pane.render(ctx, &status, backdrop);
            actions
        };

        for action in actions {
            self.apply(action);
        }
    }
}

impl Drop for SkycastApp {
    fn drop(&mut self) {
        self.worker.shutdown();
        self.renderer.stop(&mut self.host);
        info!("SkyCast shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report(condition: Condition, is_day: bool) -> WeatherReport {
        WeatherReport {
            location: "Oslo".to_string(),
            region: String::new(),
            country: "Norway".to_string(),
            latitude: 59.91,
            longitude: 10.75,
            local_time: String::new(),
            temp_c: -2.0,
            feels_like_c: -6.0,
            condition_text: "Light snow".to_string(),
            condition_code: 1213,
            condition,
            is_day,
            wind_kph: 10.0,
            wind_dir: "N".to_string(),
            humidity: 80,
            uv: 0.0,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_report_drives_backdrop() {
        let config = AppConfig::default();
        let run = resolve_run_config(&Overrides::default(), Some(&report(Condition::Snow, false)), &config, 12);
        assert_eq!(run.condition, Condition::Snow);
        assert!(!run.is_day);
        assert!(!run.dark_mode);
    }

    #[test]
    fn test_overrides_win() {
        let config = AppConfig::default();
        let overrides = Overrides {
            condition: Some(Condition::Thunderstorm),
            is_day: Some(true),
            dark_mode: Some(true),
            location: None,
        };
        let run = resolve_run_config(&overrides, Some(&report(Condition::Snow, false)), &config, 0);
        assert_eq!(
            run,
            RunConfig {
                condition: Condition::Thunderstorm,
                is_day: true,
                dark_mode: true,
            }
        );
    }

    #[test]
    fn test_renderer_waits_for_viewport_area() {
        let mut renderer = Renderer::new(RendererOptions::default());
        let mut host = EguiFrameHost::new(egui::Context::default(), None);
        let run = RunConfig {
            condition: Condition::Rain,
            is_day: true,
            dark_mode: false,
        };

        host.observe_viewport(Size::new(0.0, 0.0));
        sync_renderer(&mut renderer, &mut host, run, Instant::now());
        assert!(!renderer.is_running());
        assert!(!host.has_pending_frame());

        host.observe_viewport(Size::new(800.0, 600.0));
        sync_renderer(&mut renderer, &mut host, run, Instant::now());
        assert!(renderer.is_running());
        assert_eq!(renderer.particles().len(), 200);

        // Minimising keeps the existing run instead of restarting it
        let current = renderer.current_run();
        host.observe_viewport(Size::new(0.0, 0.0));
        sync_renderer(&mut renderer, &mut host, run, Instant::now());
        assert_eq!(renderer.current_run(), current);
    }

    #[test]
    fn test_offline_fallback_uses_local_clock() {
        let config = AppConfig {
            fallback_condition: Condition::Cloudy,
            dark_mode: true,
            ..AppConfig::default()
        };
        let noon = resolve_run_config(&Overrides::default(), None, &config, 12);
        assert_eq!(noon.condition, Condition::Cloudy);
        assert!(noon.is_day);
        assert!(noon.dark_mode);

        let midnight = resolve_run_config(&Overrides::default(), None, &config, 23);
        assert!(!midnight.is_day);
    }
}
