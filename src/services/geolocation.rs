//! Device geolocation.
//!
//! `Geolocator` is the seam standing in for the platform's position API.
//! `DeviceGeolocator` answers from the configured device position;
//! `CachedGeolocator` wraps any geolocator and applies `PositionOptions`
//! (cached-fix tolerance and acquisition timeout).

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::models::Coordinates;

/// Position request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Longest time to wait for a fix before failing with `Timeout`.
    pub timeout: Duration,
    /// Oldest cached fix that may be returned instead of a fresh one.
    /// Zero always requests a fresh fix.
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// Options used by the registration screen's "detect location" action.
    pub const LANDING: Self = Self {
        enable_high_accuracy: true,
        timeout: Duration::from_secs(10),
        maximum_age: Duration::from_secs(60),
    };

    /// Options used once when the dashboard mounts.
    pub const DASHBOARD: Self = Self {
        enable_high_accuracy: false,
        timeout: Duration::from_secs(10),
        maximum_age: Duration::ZERO,
    };
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::LANDING
    }
}

/// Why a position could not be obtained. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported by this device")]
    Unsupported,

    #[error("Location access denied by user")]
    PermissionDenied,

    #[error("Location information unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Unable to detect location")]
    Unknown,
}

/// Source of device positions.
pub trait Geolocator: Send + Sync {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// What the device allows when asked for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationMode {
    Granted,
    Denied,
    Unsupported,
}

/// Device position taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceGeolocator {
    mode: GeolocationMode,
    position: Option<Coordinates>,
}

impl DeviceGeolocator {
    pub fn new(mode: GeolocationMode, position: Option<Coordinates>) -> Self {
        Self { mode, position }
    }

    /// A device that grants access and reports `position`.
    pub fn fixed(position: Coordinates) -> Self {
        Self::new(GeolocationMode::Granted, Some(position))
    }
}

impl Geolocator for DeviceGeolocator {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send {
        let result = match self.mode {
            GeolocationMode::Unsupported => Err(GeolocationError::Unsupported),
            GeolocationMode::Denied => Err(GeolocationError::PermissionDenied),
            GeolocationMode::Granted => self.position.ok_or(GeolocationError::PositionUnavailable),
        };
        tracing::debug!(
            "Device position requested (high accuracy: {}): {:?}",
            options.enable_high_accuracy,
            result
        );
        std::future::ready(result)
    }
}

/// Applies the timeout and cached-fix tolerance of `PositionOptions` on top
/// of another geolocator.
#[derive(Debug)]
pub struct CachedGeolocator<G> {
    inner: G,
    last_fix: Mutex<Option<(Coordinates, Instant)>>,
}

impl<G: Geolocator> CachedGeolocator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            last_fix: Mutex::new(None),
        }
    }
}

impl<G: Geolocator> Geolocator for CachedGeolocator<G> {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send {
        let options = *options;
        async move {
            let cached = *self.last_fix.lock().await;
            if let Some((coords, acquired_at)) = cached {
                if acquired_at.elapsed() < options.maximum_age {
                    tracing::debug!("Reusing cached position {}", coords.label());
                    return Ok(coords);
                }
            }

            match tokio::time::timeout(options.timeout, self.inner.current_position(&options)).await
            {
                Ok(Ok(coords)) => {
                    *self.last_fix.lock().await = Some((coords, Instant::now()));
                    Ok(coords)
                }
                Ok(Err(e)) => Err(e),
                Err(_) => Err(GeolocationError::Timeout),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const ZURICH: Coordinates = Coordinates {
        lat: 47.3769,
        lng: 8.5417,
    };

    /// Counts calls and answers with a fixed position.
    struct CountingGeolocator {
        calls: Arc<AtomicUsize>,
    }

    impl Geolocator for CountingGeolocator {
        fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(ZURICH))
        }
    }

    /// Never produces a fix.
    struct StalledGeolocator;

    impl Geolocator for StalledGeolocator {
        fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send {
            std::future::pending()
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GeolocationError::PermissionDenied.to_string(),
            "Location access denied by user"
        );
        assert_eq!(
            GeolocationError::PositionUnavailable.to_string(),
            "Location information unavailable"
        );
        assert_eq!(
            GeolocationError::Timeout.to_string(),
            "Location request timed out"
        );
        assert_eq!(
            GeolocationError::Unknown.to_string(),
            "Unable to detect location"
        );
    }

    #[test]
    fn test_landing_options() {
        let opts = PositionOptions::default();
        assert!(opts.enable_high_accuracy);
        assert_eq!(opts.timeout, Duration::from_secs(10));
        assert_eq!(opts.maximum_age, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_device_geolocator_modes() {
        let opts = PositionOptions::LANDING;
        assert_eq!(
            DeviceGeolocator::fixed(ZURICH).current_position(&opts).await,
            Ok(ZURICH)
        );
        assert_eq!(
            DeviceGeolocator::new(GeolocationMode::Granted, None)
                .current_position(&opts)
                .await,
            Err(GeolocationError::PositionUnavailable)
        );
        assert_eq!(
            DeviceGeolocator::new(GeolocationMode::Denied, Some(ZURICH))
                .current_position(&opts)
                .await,
            Err(GeolocationError::PermissionDenied)
        );
        assert_eq!(
            DeviceGeolocator::new(GeolocationMode::Unsupported, None)
                .current_position(&opts)
                .await,
            Err(GeolocationError::Unsupported)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_fix_reused_within_maximum_age() {
        let calls = Arc::new(AtomicUsize::new(0));
        let geo = CachedGeolocator::new(CountingGeolocator {
            calls: calls.clone(),
        });

        geo.current_position(&PositionOptions::LANDING).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        geo.current_position(&PositionOptions::LANDING).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        geo.current_position(&PositionOptions::LANDING).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_maximum_age_always_refreshes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let geo = CachedGeolocator::new(CountingGeolocator {
            calls: calls.clone(),
        });

        geo.current_position(&PositionOptions::DASHBOARD).await.unwrap();
        geo.current_position(&PositionOptions::DASHBOARD).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_device_times_out() {
        let geo = CachedGeolocator::new(StalledGeolocator);
        let started = Instant::now();
        let result = geo.current_position(&PositionOptions::LANDING).await;
        assert_eq!(result, Err(GeolocationError::Timeout));
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let geo = CachedGeolocator::new(DeviceGeolocator::new(GeolocationMode::Denied, None));
        let result = geo.current_position(&PositionOptions::LANDING).await;
        assert_eq!(result, Err(GeolocationError::PermissionDenied));
    }
}
