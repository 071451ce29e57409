//! Landing / registration screen.
//!
//! Collects name, password and location. The location is typed in or filled
//! from the device position. Submitting resolves the final coordinates and
//! produces the `User` that starts a session.

use std::time::Duration;

use rand::Rng;

use crate::errors::AppError;
use crate::models::{Coordinates, User, REFERENCE_POINT};
use crate::services::geolocation::{Geolocator, PositionOptions};

/// Simulated processing delay between submit and login.
pub const SUBMIT_DELAY: Duration = Duration::from_secs(2);

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

/// Feature highlights shown on the landing screen: (title, description).
pub const FEATURES: [(&str, &str); 4] = [
    (
        "Live Rainfall & Water Level Monitoring",
        "Real-time data from weather stations and sensors across your region",
    ),
    (
        "Interactive Dashboard with Charts",
        "Visual analytics and trends to understand flood patterns",
    ),
    (
        "Automatic Flood Alerts",
        "Instant notifications when flood risk exceeds safe thresholds",
    ),
    (
        "Location-based Predictions",
        "Hyper-local flood forecasting for your specific area",
    ),
];

/// "How it works" steps: (number, title, description).
pub const STEPS: [(&str, &str, &str); 3] = [
    (
        "01",
        "Enter Your Details",
        "Provide your name, password, and location for personalized monitoring",
    ),
    (
        "02",
        "Location Processing",
        "Your location is automatically converted to precise coordinates",
    ),
    (
        "03",
        "Get Predictions",
        "Access your personalized flood prediction dashboard instantly",
    ),
];

/// Registration form fields. The password is never checked or stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub password: String,
    pub location: String,
}

impl RegistrationForm {
    /// True when every field is filled, i.e. `submit` will not reject it.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.password.is_empty() && !self.location.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct LandingScreen {
    form: RegistrationForm,
    detected: Option<Coordinates>,
}

impl LandingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    /// Coordinates from the last successful detection, if any.
    pub fn detected(&self) -> Option<Coordinates> {
        self.detected
    }

    /// Ask the device for its position and fill the location field with it.
    ///
    /// A failure leaves the form untouched and is not retried.
    pub async fn detect_location<G: Geolocator>(
        &mut self,
        geolocator: &G,
    ) -> Result<Coordinates, AppError> {
        match geolocator.current_position(&PositionOptions::LANDING).await {
            Ok(coords) => {
                self.detected = Some(coords);
                self.form.location = coords.label();
                tracing::info!("Detected device location {}", coords.label());
                Ok(coords)
            }
            Err(e) => {
                tracing::error!("Error getting location: {}", e);
                Err(e.into())
            }
        }
    }

    /// Validate the form and, after the simulated delay, produce the user.
    ///
    /// Without a detected position the coordinates are jittered around the
    /// reference point.
    pub async fn submit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<User, AppError> {
        if !self.form.is_complete() {
            tracing::warn!("Registration rejected: missing fields");
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }

        let coords = match self.detected {
            Some(coords) => coords,
            None => {
                let simulated = Coordinates::jittered_around(REFERENCE_POINT, rng);
                tracing::debug!(
                    "No detected location, simulating {}",
                    simulated.label()
                );
                simulated
            }
        };

        tokio::time::sleep(SUBMIT_DELAY).await;

        Ok(User {
            name: self.form.name.clone(),
            location: self.form.location.clone(),
            lat: coords.lat,
            lng: coords.lng,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JITTER_DEGREES;
    use crate::services::geolocation::{DeviceGeolocator, GeolocationError, GeolocationMode};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled() -> LandingScreen {
        let mut screen = LandingScreen::new();
        let form = screen.form_mut();
        form.name = "Asha".to_string();
        form.password = "secret".to_string();
        form.location = "Connaught Place".to_string();
        screen
    }

    #[test]
    fn test_form_is_complete_only_with_every_field() {
        assert!(filled().form().is_complete());
        assert!(!LandingScreen::new().form().is_complete());

        let mut screen = filled();
        screen.form_mut().password.clear();
        assert!(!screen.form().is_complete());
    }

    #[tokio::test]
    async fn test_detect_location_fills_label() {
        let mut screen = LandingScreen::new();
        let geo = DeviceGeolocator::fixed(Coordinates {
            lat: 19.07598,
            lng: 72.87766,
        });
        screen.detect_location(&geo).await.unwrap();
        assert_eq!(screen.form().location, "19.0760, 72.8777");
        assert!(screen.detected().is_some());
    }

    #[tokio::test]
    async fn test_detect_location_failure_leaves_form() {
        let mut screen = filled();
        let geo = DeviceGeolocator::new(GeolocationMode::Denied, None);
        let err = screen.detect_location(&geo).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Geolocation(GeolocationError::PermissionDenied)
        ));
        assert_eq!(err.to_string(), "Location access denied by user");
        assert_eq!(screen.form().location, "Connaught Place");
        assert!(screen.detected().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_requires_every_field() {
        let mut rng = StdRng::seed_from_u64(1);
        for blank in ["name", "password", "location"] {
            let mut screen = filled();
            match blank {
                "name" => screen.form_mut().name.clear(),
                "password" => screen.form_mut().password.clear(),
                _ => screen.form_mut().location.clear(),
            }
            let err = screen.submit(&mut rng).await.unwrap_err();
            assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE, "blank {}", blank);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_rejects_immediately() {
        let mut rng = StdRng::seed_from_u64(1);
        let started = tokio::time::Instant::now();
        let _ = LandingScreen::new().submit(&mut rng).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_waits_then_falls_back_near_reference_point() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut screen = filled();
        let started = tokio::time::Instant::now();
        let user = screen.submit(&mut rng).await.unwrap();

        assert!(started.elapsed() >= SUBMIT_DELAY);
        assert_eq!(user.name, "Asha");
        assert_eq!(user.location, "Connaught Place");
        assert!((user.lat - REFERENCE_POINT.lat).abs() <= JITTER_DEGREES);
        assert!((user.lng - REFERENCE_POINT.lng).abs() <= JITTER_DEGREES);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_uses_detected_coordinates() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut screen = filled();
        let mumbai = Coordinates {
            lat: 19.076,
            lng: 72.8777,
        };
        screen
            .detect_location(&DeviceGeolocator::fixed(mumbai))
            .await
            .unwrap();
        screen.form_mut().name = "Ravi".to_string();

        let user = screen.submit(&mut rng).await.unwrap();
        assert_eq!(user.coordinates(), mumbai);
        assert_eq!(user.location, "19.0760, 72.8777");
    }
}
