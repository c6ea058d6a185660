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

use chrono::Local;
use weather_fx::{Condition, RunConfig};

use crate::app::Overrides;
use crate::config::AppConfig;
use crate::status::{FetchState, WeatherStatus};
use crate::units::{TemperatureUnit, WindSpeedUnit};
use crate::weather::WeatherReport;

const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(130, 130, 130);
const VALUE_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 220, 220);
const HEADER_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 180, 220);

/// Changes requested from the dashboard during one frame
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    SetConditionOverride(Option<Condition>),
    SetDayOverride(Option<bool>),
    SetDarkMode(bool),
    SetTemperatureUnit(TemperatureUnit),
    SetWindSpeedUnit(WindSpeedUnit),
    SetLocation(String),
    Refresh,
}

/// Everything the dashboard displays for one frame
#[derive(Debug)]
pub struct DashboardView<'a> {
    pub status: &'a WeatherStatus,
    pub config: &'a AppConfig,
    pub overrides: &'a Overrides,
    pub active: Option<RunConfig>,
    pub dark_mode: bool,
}

/// Floating weather card with display controls
#[derive(Debug)]
pub struct Dashboard {
    location_input: String,
    show_controls: bool,
}

impl Dashboard {
    pub fn new(location: &str) -> Self {
        Self {
            location_input: location.to_string(),
            show_controls: false,
        }
    }

    pub fn render(&mut self, ctx: &egui::Context, view: &DashboardView<'_>) -> Vec<DashboardAction> {
        let mut actions = Vec::new();

        egui::Window::new("Weather")
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(16.0, 16.0))
            .default_width(280.0)
            .resizable(false)
            .collapsible(false)
            .title_bar(false)
            .frame(egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 170))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                .corner_radius(8.0))
            .show(ctx, |ui| {
                self.render_header(ui, view.status);
                ui.add_space(4.0);

                match &view.status.report {
                    Some(report) => Self::render_report(ui, report, view.config),
                    None => Self::render_placeholder(ui, view),
                }

                if let Some(error) = &view.status.last_error {
                    ui.add_space(4.0);
                    ui.label(egui::RichText::new(error)
                        .color(egui::Color32::from_rgb(255, 140, 120))
                        .size(10.0)
                        .italics());
                }

                ui.add_space(6.0);
                ui.separator();

                ui.horizontal(|ui| {
                    let icon = if self.show_controls { "▲" } else { "▼" };
                    if ui.button(egui::RichText::new(format!("{icon} Display")).size(11.0)).clicked() {
                        self.show_controls = !self.show_controls;
                    }
                    if ui.button(egui::RichText::new("⟳ Refresh").size(11.0))
                        .on_hover_text("Fetch current conditions now")
                        .clicked() {
                        actions.push(DashboardAction::Refresh);
                    }
                });

                if self.show_controls {
                    ui.add_space(4.0);
                    self.render_controls(ui, view, &mut actions);
                }
            });

        actions
    }

    fn render_header(&self, ui: &mut egui::Ui, status: &WeatherStatus) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("◈ WEATHER")
                .color(HEADER_COLOR)
                .size(12.0)
                .strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let color = match status.state {
                    FetchState::Ready => egui::Color32::from_rgb(100, 255, 100),
                    FetchState::Fetching | FetchState::Idle => egui::Color32::from_rgb(255, 200, 100),
                    FetchState::Offline => egui::Color32::from_rgb(150, 150, 150),
                    FetchState::Error => egui::Color32::from_rgb(255, 100, 100),
                };
                ui.label(egui::RichText::new(status.state.label().to_uppercase())
                    .color(color)
                    .size(9.0)
                    .monospace());
                ui.label(egui::RichText::new("●").color(color).size(9.0));
            });
        });
    }

    fn render_report(ui: &mut egui::Ui, report: &WeatherReport, config: &AppConfig) {
        ui.label(egui::RichText::new(report.place_name())
            .color(VALUE_COLOR)
            .size(15.0)
            .strong());

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(config.temperature_unit.format(report.temp_c))
                .color(egui::Color32::WHITE)
                .size(34.0));
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(&report.condition_text)
                    .color(VALUE_COLOR)
                    .size(12.0));
                ui.label(egui::RichText::new(format!(
                    "Feels like {}",
                    config.temperature_unit.format(report.feels_like_c)
                ))
                    .color(LABEL_COLOR)
                    .size(10.0));
            });
        });

        ui.add_space(4.0);

        egui::Grid::new("weather_details")
            .num_columns(2)
            .spacing([12.0, 2.0])
            .show(ui, |ui| {
                detail_row(ui, "Wind", &format!(
                    "{} {}",
                    config.wind_speed_unit.format(report.wind_kph),
                    report.wind_dir
                ));
                detail_row(ui, "Humidity", &format!("{}%", report.humidity));
                detail_row(ui, "UV index", &format!("{:.0}", report.uv));
                detail_row(ui, "Local time", &report.local_time);
                detail_row(
                    ui,
                    "Updated",
                    &report.fetched_at.with_timezone(&Local).format("%H:%M").to_string(),
                );
            });
    }

    fn render_placeholder(ui: &mut egui::Ui, view: &DashboardView<'_>) {
        ui.label(egui::RichText::new(&view.status.location)
            .color(VALUE_COLOR)
            .size(15.0)
            .strong());

        let text = match view.status.state {
            FetchState::Offline => format!("Showing {}", view.config.fallback_condition.display_name()),
            FetchState::Error => "Weather data not available".to_string(),
            _ => "Loading current conditions...".to_string(),
        };
        ui.label(egui::RichText::new(text)
            .color(LABEL_COLOR)
            .size(11.0)
            .italics());
    }

    fn render_controls(&mut self, ui: &mut egui::Ui, view: &DashboardView<'_>, actions: &mut Vec<DashboardAction>) {
        egui::Grid::new("weather_controls")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Location").color(LABEL_COLOR).size(10.0));
                ui.horizontal(|ui| {
                    let response = ui.add(egui::TextEdit::singleline(&mut self.location_input)
                        .desired_width(140.0)
                        .hint_text("City, postcode or lat,lon"));
                    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if submitted || ui.button("Go").clicked() {
                        let location = self.location_input.trim();
                        if !location.is_empty() && location != view.status.location {
                            actions.push(DashboardAction::SetLocation(location.to_string()));
                        }
                    }
                });
                ui.end_row();

                ui.label(egui::RichText::new("Sky").color(LABEL_COLOR).size(10.0));
                let current = view.overrides.condition;
                let selected_text = current.map_or("Live", |c| c.display_name());
                egui::ComboBox::from_id_salt("condition_override")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(current.is_none(), "Live").clicked() && current.is_some() {
                            actions.push(DashboardAction::SetConditionOverride(None));
                        }
                        for condition in Condition::ALL {
                            if ui.selectable_label(current == Some(condition), condition.display_name()).clicked()
                                && current != Some(condition)
                            {
                                actions.push(DashboardAction::SetConditionOverride(Some(condition)));
                            }
                        }
                    });
                ui.end_row();

                ui.label(egui::RichText::new("Time of day").color(LABEL_COLOR).size(10.0));
                ui.horizontal(|ui| {
                    for (value, label) in [(None, "Auto"), (Some(true), "Day"), (Some(false), "Night")] {
                        if ui.selectable_label(view.overrides.is_day == value, label).clicked()
                            && view.overrides.is_day != value
                        {
                            actions.push(DashboardAction::SetDayOverride(value));
                        }
                    }
                });
                ui.end_row();

                ui.label(egui::RichText::new("Dark sky").color(LABEL_COLOR).size(10.0));
                let mut dark_mode = view.dark_mode;
                if ui.checkbox(&mut dark_mode, "").changed() {
                    actions.push(DashboardAction::SetDarkMode(dark_mode));
                }
                ui.end_row();

                ui.label(egui::RichText::new("Temperature").color(LABEL_COLOR).size(10.0));
                ui.horizontal(|ui| {
                    for unit in [TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit] {
                        if ui.selectable_label(view.config.temperature_unit == unit, unit.symbol()).clicked()
                            && view.config.temperature_unit != unit
                        {
                            actions.push(DashboardAction::SetTemperatureUnit(unit));
                        }
                    }
                });
                ui.end_row();

                ui.label(egui::RichText::new("Wind").color(LABEL_COLOR).size(10.0));
                ui.horizontal(|ui| {
                    for unit in WindSpeedUnit::ALL {
                        if ui.selectable_label(view.config.wind_speed_unit == unit, unit.label()).clicked()
                            && view.config.wind_speed_unit != unit
                        {
                            actions.push(DashboardAction::SetWindSpeedUnit(unit));
                        }
                    }
                });
                ui.end_row();
            });

        if let Some(active) = view.active {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(format!(
                "Backdrop: {} ({})",
                active.condition.display_name(),
                if active.is_day { "day" } else { "night" }
            ))
                .color(LABEL_COLOR)
                .size(9.0)
                .monospace());
        }
    }
}

fn detail_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(egui::RichText::new(label).color(LABEL_COLOR).size(10.0));
    ui.label(egui::RichText::new(value).color(VALUE_COLOR).size(10.0).monospace());
    ui.end_row();
}
