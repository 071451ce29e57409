use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::Coordinates;
use crate::services::geolocation::GeolocationMode;

const DEFAULT_WEATHER_API_URL: &str = "https://api.open-meteo.com/v1/forecast";
const DEFAULT_PREDICTION_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_FORECAST_START_DATE: &str = "2025-09-13";
const DEFAULT_FORECAST_END_DATE: &str = "2025-09-27";

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub weather_api_url: String,
    /// Base URL of the prediction service (`/predict`, `/train-location`).
    pub prediction_url: String,
    pub forecast_start_date: NaiveDate,
    pub forecast_end_date: NaiveDate,
    /// Position the device reports when access is granted.
    pub device_position: Option<Coordinates>,
    pub geolocation: GeolocationMode,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Unset and empty values
    /// take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let forecast_start_date = parse_date(
            "FLOODEX_FORECAST_START_DATE",
            get("FLOODEX_FORECAST_START_DATE").as_deref(),
            DEFAULT_FORECAST_START_DATE,
        )?;
        let forecast_end_date = parse_date(
            "FLOODEX_FORECAST_END_DATE",
            get("FLOODEX_FORECAST_END_DATE").as_deref(),
            DEFAULT_FORECAST_END_DATE,
        )?;
        if forecast_end_date < forecast_start_date {
            return Err(AppError::Config(format!(
                "forecast end date {} is before start date {}",
                forecast_end_date, forecast_start_date
            )));
        }

        let device_position = match (
            get("FLOODEX_DEVICE_LATITUDE"),
            get("FLOODEX_DEVICE_LONGITUDE"),
        ) {
            (Some(lat), Some(lng)) => Some(Coordinates {
                lat: parse_degrees("FLOODEX_DEVICE_LATITUDE", &lat, 90.0)?,
                lng: parse_degrees("FLOODEX_DEVICE_LONGITUDE", &lng, 180.0)?,
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::Config(
                    "FLOODEX_DEVICE_LATITUDE and FLOODEX_DEVICE_LONGITUDE must be set together"
                        .to_string(),
                ))
            }
        };

        let geolocation = match get("FLOODEX_GEOLOCATION").as_deref() {
            None | Some("granted") => GeolocationMode::Granted,
            Some("denied") => GeolocationMode::Denied,
            Some("unsupported") => GeolocationMode::Unsupported,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "FLOODEX_GEOLOCATION must be granted, denied or unsupported, got '{}'",
                    other
                )))
            }
        };

        let log_json = matches!(
            get("FLOODEX_LOG_JSON").as_deref(),
            Some("1") | Some("true")
        );

        Ok(Self {
            weather_api_url: get("FLOODEX_WEATHER_API_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
            prediction_url: get("FLOODEX_PREDICTION_URL")
                .unwrap_or_else(|| DEFAULT_PREDICTION_URL.to_string()),
            forecast_start_date,
            forecast_end_date,
            device_position,
            geolocation,
            log_json,
        })
    }
}

fn parse_date(key: &str, value: Option<&str>, default: &str) -> Result<NaiveDate, AppError> {
    let raw = value.unwrap_or(default);
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::Config(format!("{} must be YYYY-MM-DD, got '{}': {}", key, raw, e)))
}

fn parse_degrees(key: &str, raw: &str, limit: f64) -> Result<f64, AppError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", key, raw)))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(AppError::Config(format!(
            "{} must be within ±{}, got {}",
            key, limit, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config(&[]).unwrap();
        assert_eq!(config.weather_api_url, "https://api.open-meteo.com/v1/forecast");
        assert_eq!(config.prediction_url, "http://127.0.0.1:8000");
        assert_eq!(
            config.forecast_start_date,
            NaiveDate::from_ymd_opt(2025, 9, 13).unwrap()
        );
        assert_eq!(
            config.forecast_end_date,
            NaiveDate::from_ymd_opt(2025, 9, 27).unwrap()
        );
        assert_eq!(config.device_position, None);
        assert_eq!(config.geolocation, GeolocationMode::Granted);
        assert!(!config.log_json);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("FLOODEX_PREDICTION_URL", "http://models.local:9000/"),
            ("FLOODEX_DEVICE_LATITUDE", "19.076"),
            ("FLOODEX_DEVICE_LONGITUDE", " 72.8777 "),
            ("FLOODEX_GEOLOCATION", "denied"),
            ("FLOODEX_LOG_JSON", "1"),
        ])
        .unwrap();
        assert_eq!(config.prediction_url, "http://models.local:9000/");
        assert_eq!(
            config.device_position,
            Some(Coordinates {
                lat: 19.076,
                lng: 72.8777
            })
        );
        assert_eq!(config.geolocation, GeolocationMode::Denied);
        assert!(config.log_json);
    }

    #[test]
    fn test_empty_value_takes_default() {
        let config = config(&[("FLOODEX_WEATHER_API_URL", "  ")]).unwrap();
        assert_eq!(config.weather_api_url, DEFAULT_WEATHER_API_URL);
    }

    #[test]
    fn test_half_a_position_is_rejected() {
        let err = config(&[("FLOODEX_DEVICE_LATITUDE", "19.0")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_out_of_range_latitude_is_rejected() {
        let err = config(&[
            ("FLOODEX_DEVICE_LATITUDE", "91"),
            ("FLOODEX_DEVICE_LONGITUDE", "0"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("FLOODEX_DEVICE_LATITUDE"));
    }

    #[test]
    fn test_bad_dates_are_rejected() {
        assert!(config(&[("FLOODEX_FORECAST_START_DATE", "13/09/2025")]).is_err());
        let err = config(&[
            ("FLOODEX_FORECAST_START_DATE", "2025-09-27"),
            ("FLOODEX_FORECAST_END_DATE", "2025-09-13"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("before start date"));
    }

    #[test]
    fn test_unknown_geolocation_mode_is_rejected() {
        assert!(config(&[("FLOODEX_GEOLOCATION", "maybe")]).is_err());
    }
}
