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

use chrono::Utc;
use weather_fx::{Backdrop, RunConfig};

use crate::status::{DiagnosticLevel, FetchState, WeatherStatus};

/// Snapshot of the renderer shown in the status pane
#[derive(Debug, Clone, Copy)]
pub struct BackdropInfo {
    pub run: Option<RunConfig>,
    pub particles: usize,
    pub flash_active: bool,
}

#[derive(Debug)]
pub struct StatusPane {
    pub visible: bool,
    pub collapsed: bool,
}

impl Default for StatusPane {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPane {
    pub fn new() -> Self {
        Self {
            visible: false,
            collapsed: false,
        }
    }

    /// Render the status pane as a floating window
    pub fn render(&mut self, ctx: &egui::Context, status: &WeatherStatus, backdrop: BackdropInfo) {
        if !self.visible {
            // Show a small button to re-open the status pane when hidden
            egui::Window::new("show_status")
                .title_bar(false)
                .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
                .fixed_size(egui::vec2(120.0, 30.0))
                .resizable(false)
                .frame(egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 200))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                    .corner_radius(6.0))
                .show(ctx, |ui| {
                    if ui.button(egui::RichText::new("📊 Status")
                        .color(egui::Color32::from_rgb(150, 200, 220))
                        .size(11.0))
                        .clicked() {
                        self.visible = true;
                    }
                });
            return;
        }

        egui::Window::new("Status")
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(10.0, -10.0))
            .fixed_size(egui::vec2(280.0, if self.collapsed { 40.0 } else { 320.0 }))
            .resizable(false)
            .collapsible(false)
            .title_bar(false)
            .frame(egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 230))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                .corner_radius(6.0))
            .show(ctx, |ui| {
                // Header with collapse and close buttons
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("◈ STATUS")
                        .color(egui::Color32::from_rgb(100, 180, 220))
                        .size(12.0)
                        .strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(egui::RichText::new("✕")
                            .size(12.0)
                            .color(egui::Color32::from_rgb(200, 100, 100)))
                            .on_hover_text("Hide status pane")
                            .clicked() {
                            self.visible = false;
                        }

                        ui.add_space(4.0);

                        let collapse_icon = if self.collapsed { "▼" } else { "▲" };
                        if ui.button(egui::RichText::new(collapse_icon).size(10.0))
                            .on_hover_text(if self.collapsed { "Expand" } else { "Collapse" })
                            .clicked() {
                            self.collapsed = !self.collapsed;
                        }
                    });
                });

                if self.collapsed {
                    return;
                }

                ui.separator();

                Self::render_feed_section(ui, status);
                ui.add_space(6.0);
                Self::render_backdrop_section(ui, backdrop);
                ui.add_space(6.0);
                Self::render_diagnostics_section(ui, status);
            });
    }

    fn render_feed_section(ui: &mut egui::Ui, status: &WeatherStatus) {
        section_title(ui, "FEED");

        ui.horizontal(|ui| {
            let (color, icon) = match status.state {
                FetchState::Ready => (egui::Color32::from_rgb(100, 255, 100), "●"),
                FetchState::Fetching => (egui::Color32::from_rgb(255, 200, 100), "◐"),
                FetchState::Idle | FetchState::Offline => (egui::Color32::from_rgb(150, 150, 150), "○"),
                FetchState::Error => (egui::Color32::from_rgb(255, 100, 100), "✕"),
            };
            ui.label(egui::RichText::new(icon).color(color).size(10.0));
            ui.label(egui::RichText::new(status.state.label().to_uppercase())
                .color(color)
                .size(10.0)
                .monospace()
                .strong());
        });

        value_row(ui, "Location:", &status.location);

        let now = Utc::now();
        if let Some(success) = status.last_success {
            let age = u64::try_from((now - success).num_seconds()).unwrap_or(0);
            value_row(ui, "Updated:", &format!("{} ago", format_duration(age)));
        }
        if let Some(attempt) = status.last_attempt {
            value_row(ui, "Last try:", &attempt.format("%H:%M:%S UTC").to_string());
        }
    }

    fn render_backdrop_section(ui: &mut egui::Ui, backdrop: BackdropInfo) {
        section_title(ui, "BACKDROP");

        match backdrop.run {
            Some(run) => {
                value_row(ui, "Sky:", &sky_summary(run));
                value_row(ui, "Particles:", &backdrop.particles.to_string());
                if backdrop.flash_active {
                    value_row(ui, "Lightning:", "⚡");
                }
            }
            None => {
                ui.label(egui::RichText::new("Not running")
                    .color(egui::Color32::from_rgb(100, 100, 100))
                    .size(8.0)
                    .italics());
            }
        }
    }

    fn render_diagnostics_section(ui: &mut egui::Ui, status: &WeatherStatus) {
        section_title(ui, "DIAGNOSTICS");

        if status.diagnostics.is_empty() {
            ui.label(egui::RichText::new("No messages")
                .color(egui::Color32::from_rgb(100, 100, 100))
                .size(8.0)
                .italics());
            return;
        }

        // Scrollable area for diagnostics (max 6 lines visible)
        let line_height = 14.0;
        let max_visible_lines = 6.0;

        egui::ScrollArea::vertical()
            .max_height(line_height * max_visible_lines)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                // Newest first
                for diagnostic in status.diagnostics.iter().rev() {
                    ui.horizontal(|ui| {
                        let (icon, color) = match diagnostic.level {
                            DiagnosticLevel::Info => ("ℹ", egui::Color32::from_rgb(100, 180, 255)),
                            DiagnosticLevel::Warning => ("⚠", egui::Color32::from_rgb(255, 200, 100)),
                            DiagnosticLevel::Error => ("✕", egui::Color32::from_rgb(255, 100, 100)),
                        };

                        ui.label(egui::RichText::new(icon).color(color).size(9.0));

                        ui.label(egui::RichText::new(diagnostic.timestamp.format("%H:%M:%S").to_string())
                            .color(egui::Color32::from_rgb(100, 100, 100))
                            .size(8.0)
                            .monospace());

                        ui.label(egui::RichText::new(truncate(&diagnostic.message, 34))
                            .color(egui::Color32::from_rgb(180, 180, 180))
                            .size(8.0))
                            .on_hover_text(diagnostic.message.as_str());
                    });
                }
            });
    }
}

/// Condition, day or night, and the sky palette drawn behind it
fn sky_summary(run: RunConfig) -> String {
    let sky = Backdrop::for_sky(run.condition, run.is_day, run.dark_mode).sky();
    format!(
        "{} / {} / {}{}",
        run.condition,
        if run.is_day { "day" } else { "night" },
        sky.as_str(),
        if run.dark_mode { " (dark)" } else { "" }
    )
}

fn section_title(ui: &mut egui::Ui, title: &str) {
    ui.label(egui::RichText::new(title)
        .color(egui::Color32::from_rgb(150, 150, 150))
        .size(10.0)
        .strong());
    ui.add_space(2.0);
}

fn value_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label)
            .color(egui::Color32::from_rgb(130, 130, 130))
            .size(9.0));
        ui.label(egui::RichText::new(value)
            .color(egui::Color32::from_rgb(200, 200, 200))
            .size(9.0)
            .monospace());
    });
}

fn truncate(message: &str, max_chars: usize) -> String {
    if message.chars().count() > max_chars {
        format!("{}...", message.chars().take(max_chars).collect::<String>())
    } else {
        message.to_string()
    }
}

fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
