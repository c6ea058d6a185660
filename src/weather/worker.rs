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

use log::{error, info, warn};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::{WeatherApiClient, WeatherError};
use crate::status::{self, SharedWeatherStatus};

/// Callback used to wake the UI after the status changes
pub type Notify = Box<dyn Fn() + Send + 'static>;

/// Background refresh loop for current conditions.
///
/// Runs on its own thread with a private tokio runtime. The location can be
/// hot-swapped and a refresh forced without restarting the thread.
#[derive(Debug)]
pub struct WeatherWorker {
    /// Cancellation token for clean shutdown
    cancel_token: CancellationToken,

    /// Watch sender for hot-reloading the location
    location_tx: watch::Sender<String>,

    /// Bumped to request an immediate refresh
    refresh_tx: watch::Sender<u64>,
}

impl WeatherWorker {
    /// Start refreshing `location` every `interval`.
    ///
    /// Without an API key no thread is started and the status is put in
    /// offline mode so the fallback condition drives the backdrop.
    pub fn spawn(
        api_key: Option<String>,
        location: String,
        interval: Duration,
        status: SharedWeatherStatus,
        notify: Notify,
    ) -> Self {
        let (location_tx, location_rx) = watch::channel(location);
        let (refresh_tx, refresh_rx) = watch::channel(0u64);
        let cancel_token = CancellationToken::new();

        let worker = Self {
            cancel_token: cancel_token.clone(),
            location_tx,
            refresh_tx,
        };

        let Some(api_key) = api_key else {
            warn!("No WeatherAPI key configured (set WEATHERAPI_KEY); running offline");
            status::lock(&status).record_offline(WeatherError::MissingApiKey.to_string());
            notify();
            return worker;
        };

        info!("Starting weather updates every {} min", interval.as_secs() / 60);

        let thread_status = status.clone();
        let spawned = std::thread::Builder::new()
            .name("weather".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to start weather runtime: {e}");
                        status::lock(&thread_status).record_error(e.to_string());
                        notify();
                        return;
                    }
                };
                let client = match WeatherApiClient::new(api_key) {
                    Ok(client) => client,
                    Err(e) => {
                        error!("Failed to create weather client: {e}");
                        status::lock(&thread_status).record_error(e.to_string());
                        notify();
                        return;
                    }
                };
                rt.block_on(run(
                    client,
                    location_rx,
                    refresh_rx,
                    interval,
                    thread_status,
                    notify,
                    cancel_token,
                ));
            });

        if let Err(e) = spawned {
            error!("Failed to spawn weather thread: {e}");
            status::lock(&status).record_error(e.to_string());
        }

        worker
    }

    /// Track a different location (hot-reload)
    pub fn set_location(&self, location: String) {
        self.location_tx.send_if_modified(|current| {
            if *current == location {
                false
            } else {
                info!("Weather location changed: {current} -> {location}");
                *current = location;
                true
            }
        });
    }

    /// Refresh now instead of waiting for the next interval
    pub fn refresh_now(&self) {
        self.refresh_tx.send_modify(|n| *n = n.wrapping_add(1));
    }

    /// Stop the refresh loop
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for WeatherWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run(
    client: WeatherApiClient,
    mut location_rx: watch::Receiver<String>,
    mut refresh_rx: watch::Receiver<u64>,
    interval: Duration,
    status: SharedWeatherStatus,
    notify: Notify,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("Weather updates cancelled");
                return;
            }

            // The first tick completes immediately
            _ = ticker.tick() => {}

            changed = location_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                ticker.reset();
            }

            changed = refresh_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                ticker.reset();
            }
        }

        let location = location_rx.borrow_and_update().clone();
        status::lock(&status).begin_fetch(&location);
        notify();

        let result = tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("Weather updates cancelled");
                return;
            }
            result = client.current(&location) => result,
        };

        // Drop results for a location that was replaced mid-request
        if location_rx.has_changed().unwrap_or(false) {
            continue;
        }

        match result {
            Ok(report) => {
                info!(
                    "Weather for {}: {} (code {}, {})",
                    report.place_name(),
                    report.condition_text,
                    report.condition_code,
                    if report.is_day { "day" } else { "night" }
                );
                status::lock(&status).record_report(report);
            }
            Err(e) => {
                warn!("Weather update for '{location}' failed: {e}");
                status::lock(&status).record_error(e.to_string());
            }
        }
        notify();
    }
}
