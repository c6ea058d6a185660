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

//! WeatherAPI.com current-conditions client.

use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use weather_fx::Condition;

use super::WeatherReport;

const BASE_URL: &str = "https://api.weatherapi.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from fetching current conditions
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("no weather API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("weather data not available ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    feelslike_c: f64,
    condition: ApiCondition,
    wind_kph: f64,
    #[serde(default)]
    wind_dir: String,
    humidity: u8,
    uv: f64,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    code: u16,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Decode a `current.json` response body
pub fn parse_current(body: &str) -> Result<WeatherReport, WeatherError> {
    let response: ApiResponse = serde_json::from_str(body)?;
    let ApiResponse { location, current } = response;

    Ok(WeatherReport {
        location: location.name,
        region: location.region,
        country: location.country,
        latitude: location.lat,
        longitude: location.lon,
        local_time: location.localtime,
        temp_c: current.temp_c,
        feels_like_c: current.feelslike_c,
        condition_text: current.condition.text,
        condition_code: current.condition.code,
        condition: Condition::from_code(current.condition.code),
        is_day: current.is_day != 0,
        wind_kph: current.wind_kph,
        wind_dir: current.wind_dir,
        humidity: current.humidity,
        uv: current.uv,
        fetched_at: Utc::now(),
    })
}

/// Extract the provider's error message, or fall back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect())
}

/// Client for the WeatherAPI.com REST API
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("skycast-desktop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Fetch current conditions for a location query
    pub async fn current(&self, query: &str) -> Result<WeatherReport, WeatherError> {
        let url = format!("{}/current.json", self.base_url);
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("q", query), ("aqi", "no")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_current(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "location": {
            "name": "San Francisco",
            "region": "California",
            "country": "United States of America",
            "lat": 37.78,
            "lon": -122.42,
            "localtime": "2025-02-17 21:04"
        },
        "current": {
            "temp_c": 11.1,
            "temp_f": 52.0,
            "is_day": 0,
            "condition": { "text": "Light rain", "icon": "//cdn.weatherapi.com/night/296.png", "code": 1183 },
            "wind_kph": 19.1,
            "wind_dir": "SSW",
            "humidity": 89,
            "feelslike_c": 9.0,
            "feelslike_f": 48.2,
            "uv": 0.0
        }
    }"#;

    #[test]
    fn test_parse_current() {
        let report = parse_current(SAMPLE).unwrap();
        assert_eq!(report.location, "San Francisco");
        assert_eq!(report.region, "California");
        assert_eq!(report.condition_code, 1183);
        assert_eq!(report.condition, Condition::Rain);
        assert!(!report.is_day);
        assert_eq!(report.humidity, 89);
        assert_eq!(report.wind_dir, "SSW");
        assert!((report.temp_c - 11.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_client_builds_with_defaults() {
        let client = WeatherApiClient::new("key".to_string()).unwrap();
        assert_eq!(client.base_url, BASE_URL);
        assert_eq!(client.api_key, "key");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_current("not json"), Err(WeatherError::Decode(_))));
        assert!(matches!(parse_current(r#"{"location": {}}"#), Err(WeatherError::Decode(_))));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        assert_eq!(error_message(body), "No matching location found.");
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
