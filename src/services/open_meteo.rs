//! Open-Meteo forecast client.
//!
//! Fetches current conditions plus a daily series for one location.
//! See: https://open-meteo.com/en/docs

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::{Coordinates, WeatherSnapshot};

/// Variables requested in the `current` block. Values are read back by
/// position in this list.
pub const CURRENT_VARIABLES: [&str; 7] = [
    "temperature_2m",
    "relative_humidity_2m",
    "wind_speed_10m",
    "precipitation",
    "rain",
    "pressure_msl",
    "surface_pressure",
];

/// Variables requested in the `daily` block.
pub const DAILY_VARIABLES: [&str; 7] = [
    "temperature_2m_mean",
    "cloud_cover_mean",
    "precipitation_probability_mean",
    "relative_humidity_2m_mean",
    "pressure_msl_mean",
    "surface_pressure_mean",
    "wind_speed_10m_mean",
];

const CURRENT_TEMPERATURE: usize = 0;
const CURRENT_WIND_SPEED: usize = 2;
const CURRENT_PRECIPITATION: usize = 3;
const CURRENT_PRESSURE_MSL: usize = 5;
const CURRENT_SURFACE_PRESSURE: usize = 6;

/// Client for the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    forecast_url: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// Location metadata echoed back by Open-Meteo.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherMeta {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: Option<f64>,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub utc_offset_seconds: i32,
}

/// Daily mean series over the requested date range. Kept alongside the
/// snapshot; the dashboard does not render it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub cloud_cover_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub pressure_msl_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub surface_pressure_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m_mean: Vec<Option<f64>>,
}

impl DailySeries {
    /// Number of days in the series.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// A parsed forecast response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub meta: WeatherMeta,
    pub snapshot: WeatherSnapshot,
    pub daily: DailySeries,
}

// --- Open-Meteo JSON response types ---

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
    timezone: Option<String>,
    timezone_abbreviation: Option<String>,
    #[serde(default)]
    utc_offset_seconds: i32,
    current: Option<Map<String, Value>>,
    daily: Option<DailySeries>,
}

impl OpenMeteoClient {
    pub fn new(
        forecast_url: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            forecast_url: forecast_url.to_string(),
            start_date,
            end_date,
        })
    }

    /// Build the full request URL for a location.
    pub fn forecast_request_url(&self, coords: Coordinates) -> String {
        format!(
            "{}?latitude={}&longitude={}&daily={}&current={}&timezone=auto&start_date={}&end_date={}",
            self.forecast_url,
            coords.lat,
            coords.lng,
            DAILY_VARIABLES.join(","),
            CURRENT_VARIABLES.join(","),
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
        )
    }

    /// Fetch current conditions and the daily series for `coords`.
    pub async fn fetch_forecast(&self, coords: Coordinates) -> Result<WeatherReport, AppError> {
        let url = self.forecast_request_url(coords);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Open-Meteo request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Open-Meteo returned HTTP {}",
                response.status()
            )));
        }

        let raw_json: Value = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Open-Meteo JSON parse error: {}", e))
        })?;

        parse_forecast(&raw_json)
    }
}

/// Parse an Open-Meteo forecast response.
///
/// Pure function (no I/O). Current values are read by their position in
/// `CURRENT_VARIABLES`; a missing or null value reads as 0.
pub fn parse_forecast(raw_json: &Value) -> Result<WeatherReport, AppError> {
    let response: ForecastResponse = serde_json::from_value(raw_json.clone()).map_err(|e| {
        AppError::ExternalServiceError(format!("Open-Meteo response structure error: {}", e))
    })?;

    let current = response.current.unwrap_or_default();
    let values = current_values(&current);

    let snapshot = WeatherSnapshot {
        temperature: values[CURRENT_TEMPERATURE],
        precipitation: values[CURRENT_PRECIPITATION],
        wind_speed: values[CURRENT_WIND_SPEED],
        // The pressure slot mirrors precipitation.
        pressure: values[CURRENT_PRECIPITATION],
        pressure_msl: values[CURRENT_PRESSURE_MSL],
        surface_pressure: values[CURRENT_SURFACE_PRESSURE],
        observed_at: current
            .get("time")
            .and_then(Value::as_str)
            .map(|s| s.to_string()),
    };

    Ok(WeatherReport {
        meta: WeatherMeta {
            latitude: response.latitude,
            longitude: response.longitude,
            elevation_m: response.elevation,
            timezone: response.timezone,
            timezone_abbreviation: response.timezone_abbreviation,
            utc_offset_seconds: response.utc_offset_seconds,
        },
        snapshot,
        daily: response.daily.unwrap_or_default(),
    })
}

/// Values of the `current` block in `CURRENT_VARIABLES` order.
fn current_values(current: &Map<String, Value>) -> [f64; 7] {
    CURRENT_VARIABLES.map(|name| current.get(name).and_then(Value::as_f64).unwrap_or(0.0))
}
