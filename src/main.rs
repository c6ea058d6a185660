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

mod app;
mod cli;
mod config;
mod status;
mod status_pane;
mod ui;
mod units;
mod weather;

use clap::Parser;

use app::SkycastApp;
use cli::Args;
use config::AppConfig;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting SkyCast Desktop {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default();
    if let Ok(path) = AppConfig::get_config_path() {
        log::info!("Configuration: {}", path.display());
    }

    let overrides = args.overrides();
    let tuning = args.apply_tuning(&config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("SkyCast Desktop"),
        ..Default::default()
    };

    eframe::run_native(
        "SkyCast Desktop",
        options,
        Box::new(move |cc| Ok(Box::new(SkycastApp::new(cc, config, overrides, &tuning)))),
    )
}
