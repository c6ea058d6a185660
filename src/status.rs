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

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::weather::WeatherReport;

const MAX_DIAGNOSTICS: usize = 50;

/// Progress of the weather feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// Nothing requested yet
    Idle,
    Fetching,
    /// Latest request succeeded
    Ready,
    /// No API key; the fallback condition is shown
    Offline,
    Error,
}

impl FetchState {
    pub fn label(self) -> &'static str {
        match self {
            FetchState::Idle => "Waiting",
            FetchState::Fetching => "Updating",
            FetchState::Ready => "Live",
            FetchState::Offline => "Offline",
            FetchState::Error => "Error",
        }
    }
}

/// Diagnostic message with timestamp
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub timestamp: DateTime<Utc>,
    pub level: DiagnosticLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

/// Weather feed status shared between the worker and the UI
#[derive(Debug)]
pub struct WeatherStatus {
    pub state: FetchState,
    /// Location currently being tracked
    pub location: String,
    /// Most recent successful report; kept across failed refreshes
    pub report: Option<WeatherReport>,
    pub last_error: Option<String>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,

    // Diagnostic messages (keep last 50)
    pub diagnostics: VecDeque<DiagnosticMessage>,
}

impl WeatherStatus {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            state: FetchState::Idle,
            location: location.into(),
            report: None,
            last_error: None,
            last_attempt: None,
            last_success: None,
            diagnostics: VecDeque::with_capacity(MAX_DIAGNOSTICS),
        }
    }

    /// Mark the start of a request
    pub fn begin_fetch(&mut self, location: &str) {
        if self.location != location {
            // A report for another place must not drive the backdrop.
            self.report = None;
            self.location = location.to_string();
        }
        self.state = FetchState::Fetching;
        self.last_attempt = Some(Utc::now());
    }

    /// Store a successful report
    pub fn record_report(&mut self, report: WeatherReport) {
        self.add_diagnostic(
            DiagnosticLevel::Info,
            format!(
                "{}: {} ({})",
                report.place_name(),
                report.condition_text,
                report.condition_code
            ),
        );
        self.state = FetchState::Ready;
        self.last_error = None;
        self.last_success = Some(report.fetched_at);
        self.report = Some(report);
    }

    /// Record a failed request. The previous report stays visible.
    pub fn record_error(&mut self, error: String) {
        self.state = FetchState::Error;
        self.add_diagnostic(DiagnosticLevel::Error, format!("Weather update failed: {error}"));
        self.last_error = Some(error);
    }

    /// Switch to offline mode, e.g. when no API key is configured
    pub fn record_offline(&mut self, reason: String) {
        if self.state != FetchState::Offline {
            self.add_diagnostic(DiagnosticLevel::Warning, reason.clone());
        }
        self.state = FetchState::Offline;
        self.report = None;
        self.last_error = Some(reason);
    }

    /// Add a diagnostic message
    pub fn add_diagnostic(&mut self, level: DiagnosticLevel, message: String) {
        self.diagnostics.push_back(DiagnosticMessage {
            timestamp: Utc::now(),
            level,
            message,
        });

        while self.diagnostics.len() > MAX_DIAGNOSTICS {
            self.diagnostics.pop_front();
        }
    }
}

/// Thread-safe wrapper for WeatherStatus
pub type SharedWeatherStatus = Arc<Mutex<WeatherStatus>>;

/// Lock the shared status, recovering the data if a writer panicked
pub fn lock(status: &SharedWeatherStatus) -> MutexGuard<'_, WeatherStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}
