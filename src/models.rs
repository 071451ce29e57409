use rand::Rng;

/// Fallback reference point (New Delhi) used when no device position was detected.
pub const REFERENCE_POINT: Coordinates = Coordinates {
    lat: 28.6139,
    lng: 77.2090,
};

/// Half-width of the jitter window applied around [`REFERENCE_POINT`] (degrees).
pub const JITTER_DEGREES: f64 = 0.05;

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Four-decimal rendering, e.g. `"28.6139, 77.2090"`.
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }

    /// A coordinate drawn uniformly within ±[`JITTER_DEGREES`] of `center` on both axes.
    pub fn jittered_around<R: Rng + ?Sized>(center: Coordinates, rng: &mut R) -> Self {
        Self {
            lat: center.lat + rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES),
            lng: center.lng + rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES),
        }
    }
}

/// The logged-in user. Lives only as long as the session holding it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    /// Free-text location label as typed (or as filled in by detection).
    pub location: String,
    pub lat: f64,
    pub lng: f64,
}

impl User {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Current conditions taken from the weather API's `current` block.
///
/// All readings default to zero until the first fetch resolves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    /// Air temperature at 2 m (°C)
    pub temperature: f64,
    /// Precipitation (mm)
    pub precipitation: f64,
    /// Wind speed at 10 m (km/h)
    pub wind_speed: f64,
    /// Value of the pressure slot. It is fed from the precipitation
    /// reading (mm), not from a barometric source.
    pub pressure: f64,
    /// Mean sea level pressure (hPa); logged, not charted.
    pub pressure_msl: f64,
    /// Surface pressure (hPa)
    pub surface_pressure: f64,
    /// Observation time in the location's local timezone, when reported.
    pub observed_at: Option<String>,
}
