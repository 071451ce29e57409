//! Chart data derived from the latest weather snapshot.
//!
//! Pure functions, recomputed on every render:
//! - share breakdown (pie): temperature, precipitation, wind
//! - multi-axis profile (radar): five scaled axes on a fixed 0–100 domain
//! - tabular readings: rainfall, river water level, soil moisture

use crate::helpers::round_2dp;
use crate::models::WeatherSnapshot;

/// Upper bound of the profile chart's display domain.
pub const PROFILE_FULL_MARK: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShareSlice {
    pub name: &'static str,
    pub value: f64,
    /// Hex display color.
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileAxis {
    pub subject: &'static str,
    /// Scaled value; may lie outside the display domain.
    pub value: f64,
    pub full_mark: f64,
}

impl ProfileAxis {
    /// The value as drawn: clipped to `0..=full_mark`, never re-scaled.
    pub fn display_value(&self) -> f64 {
        self.value.clamp(0.0, self.full_mark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub parameter: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

pub fn share_breakdown(w: &WeatherSnapshot) -> Vec<ShareSlice> {
    vec![
        ShareSlice {
            name: "Temperature",
            value: round_2dp(w.temperature),
            color: "#3B82F6",
        },
        ShareSlice {
            name: "Precipitation",
            value: round_2dp(w.precipitation),
            color: "#06B6D4",
        },
        ShareSlice {
            name: "Wind",
            value: round_2dp(w.wind_speed),
            color: "#10B981",
        },
    ]
}

pub fn profile(w: &WeatherSnapshot) -> Vec<ProfileAxis> {
    let axis = |subject, value: f64| ProfileAxis {
        subject,
        value: round_2dp(value),
        full_mark: PROFILE_FULL_MARK,
    };
    vec![
        axis("Temperature", w.temperature),
        axis("Precipitation", w.precipitation * 500.0),
        axis("Wind", w.wind_speed * 10.0),
        axis("Pressure", w.pressure * 200.0),
        axis("Surface Pressure", w.surface_pressure / 50.0),
    ]
}

pub fn readings(w: &WeatherSnapshot) -> Vec<Reading> {
    vec![
        Reading {
            parameter: "Rainfall",
            value: round_2dp(w.precipitation),
            unit: "mm",
        },
        // No water-level source exists; this row shows the pressure slot.
        Reading {
            parameter: "River Water Level",
            value: round_2dp(w.pressure),
            unit: "m",
        },
        Reading {
            parameter: "Soil Moisture",
            value: round_2dp(w.surface_pressure / 100.0),
            unit: "%",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 25.4321,
            precipitation: 0.002,
            wind_speed: 3.1,
            pressure: 0.002,
            pressure_msl: 1006.4,
            surface_pressure: 981.2,
            observed_at: None,
        }
    }

    #[test]
    fn test_share_breakdown_rounds_to_two_decimals() {
        let values: Vec<f64> = share_breakdown(&snapshot()).iter().map(|s| s.value).collect();
        assert_eq!(values, vec![25.43, 0.0, 3.10]);
    }

    #[test]
    fn test_share_breakdown_colors() {
        let colors: Vec<&str> = share_breakdown(&snapshot()).iter().map(|s| s.color).collect();
        assert_eq!(colors, vec!["#3B82F6", "#06B6D4", "#10B981"]);
    }

    #[test]
    fn test_profile_axes() {
        let axes = profile(&snapshot());
        let subjects: Vec<&str> = axes.iter().map(|a| a.subject).collect();
        assert_eq!(
            subjects,
            vec!["Temperature", "Precipitation", "Wind", "Pressure", "Surface Pressure"]
        );
        assert_eq!(axes[0].value, 25.43);
        assert_eq!(axes[1].value, 1.0);
        assert_eq!(axes[2].value, 31.0);
        assert_eq!(axes[3].value, 0.4);
        assert_eq!(axes[4].value, 19.62);
    }

    #[test]
    fn test_profile_display_clips_without_rescaling() {
        let storm = WeatherSnapshot {
            precipitation: 1.2,
            pressure: 1.2,
            ..snapshot()
        };
        let axes = profile(&storm);
        assert_eq!(axes[1].value, 600.0);
        assert_eq!(axes[1].display_value(), PROFILE_FULL_MARK);
        assert_eq!(axes[3].value, 240.0);
        assert_eq!(axes[3].display_value(), PROFILE_FULL_MARK);
        assert_eq!(axes[2].display_value(), 31.0);

        let below = ProfileAxis {
            subject: "Temperature",
            value: -12.5,
            full_mark: PROFILE_FULL_MARK,
        };
        assert_eq!(below.display_value(), 0.0);
    }

    #[test]
    fn test_readings() {
        let rows = readings(&snapshot());
        assert_eq!(rows[0].parameter, "Rainfall");
        assert_eq!(rows[0].value, 0.0);
        assert_eq!(rows[0].unit, "mm");
        assert_eq!(rows[1].parameter, "River Water Level");
        assert_eq!(rows[1].value, 0.0);
        assert_eq!(rows[1].unit, "m");
        assert_eq!(rows[2].parameter, "Soil Moisture");
        assert_eq!(rows[2].value, 9.81);
        assert_eq!(rows[2].unit, "%");
    }

    #[test]
    fn test_defaults_are_zero() {
        let w = WeatherSnapshot::default();
        assert!(share_breakdown(&w).iter().all(|s| s.value == 0.0));
        assert!(profile(&w).iter().all(|a| a.value == 0.0));
        assert!(readings(&w).iter().all(|r| r.value == 0.0));
    }
}
