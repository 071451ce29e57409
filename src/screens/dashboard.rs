//! Dashboard screen.
//!
//! Lifecycle (single linear path):
//! 1. Loading: waits `MOUNT_DELAY`, then asks the device for its position once.
//!    If that fails, the session user's coordinates are used instead.
//! 2. Ready: weather and prediction fetches run concurrently; each writes
//!    its own slice of state when it resolves. Until then readings are zero.
//!
//! Every background task lives in the screen's `TaskScope`, so dropping the
//! screen (logout) cancels anything still in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Coordinates, User, WeatherSnapshot};
use crate::services::charts::{self, ProfileAxis, Reading, ShareSlice};
use crate::services::geolocation::{Geolocator, PositionOptions};
use crate::services::open_meteo::{DailySeries, OpenMeteoClient};
use crate::services::prediction::PredictionClient;
use crate::services::risk::{alert_enabled, RiskAssessment, RiskBand, ALERT_THRESHOLD_PERCENT};
use crate::session::Session;
use crate::tasks::TaskScope;

/// Delay between mounting and the position request.
pub const MOUNT_DELAY: Duration = Duration::from_secs(2);

/// How long a sent alert stays shown.
pub const ALERT_RESET_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPhase {
    Loading,
    Ready,
}

/// Where the dashboard's coordinates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSource {
    Device,
    /// Device position failed; using the coordinates resolved at login.
    Session,
}

/// Mutable dashboard state. Each background task writes disjoint fields.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: DashboardPhase,
    pub coordinates: Option<Coordinates>,
    pub source: Option<CoordinateSource>,
    pub weather: WeatherSnapshot,
    pub daily: DailySeries,
    pub risk: RiskAssessment,
    pub alert_sent: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            phase: DashboardPhase::Loading,
            coordinates: None,
            source: None,
            weather: WeatherSnapshot::default(),
            daily: DailySeries::default(),
            risk: RiskAssessment::default(),
            alert_sent: false,
        }
    }
}

/// Shared dashboard state handle.
pub type SharedDashboardState = Arc<RwLock<DashboardState>>;

/// Alert button state as rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertButton {
    pub enabled: bool,
    pub sent: bool,
}

/// Everything the dashboard renders, derived from one state snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub user: User,
    pub phase: DashboardPhase,
    pub coordinates: Option<Coordinates>,
    pub source: Option<CoordinateSource>,
    pub risk: RiskAssessment,
    pub band: RiskBand,
    pub share: Vec<ShareSlice>,
    pub profile: Vec<ProfileAxis>,
    pub readings: Vec<Reading>,
    pub observed_at: Option<String>,
    pub alert: AlertButton,
}

impl DashboardState {
    pub fn view(&self, user: &User) -> DashboardView {
        DashboardView {
            user: user.clone(),
            phase: self.phase,
            coordinates: self.coordinates,
            source: self.source,
            risk: self.risk,
            band: self.risk.band(),
            share: charts::share_breakdown(&self.weather),
            profile: charts::profile(&self.weather),
            readings: charts::readings(&self.weather),
            observed_at: self.weather.observed_at.clone(),
            alert: AlertButton {
                enabled: alert_enabled(self.risk, self.alert_sent),
                sent: self.alert_sent,
            },
        }
    }
}

/// HTTP clients the dashboard fetches from.
#[derive(Debug, Clone)]
pub struct DashboardServices {
    pub weather: OpenMeteoClient,
    pub prediction: PredictionClient,
}

#[derive(Debug)]
pub struct DashboardScreen {
    session: Session,
    state: SharedDashboardState,
    tasks: TaskScope,
}

impl DashboardScreen {
    /// Mount the dashboard for `session` and start the loading sequence.
    pub fn mount<G>(session: Session, geolocator: Arc<G>, services: DashboardServices) -> Self
    where
        G: Geolocator + 'static,
    {
        let state = SharedDashboardState::default();
        let mut tasks = TaskScope::new("dashboard");
        tasks.spawn(
            "mount sequence",
            run_mount(session.clone(), geolocator, services, state.clone()),
        );
        Self {
            session,
            state,
            tasks,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn view(&self) -> DashboardView {
        self.state.read().await.view(&self.session.user)
    }

    /// Show the alert as sent and schedule its reset.
    ///
    /// No network call is made. Fails while risk is below the threshold or
    /// an alert is already shown.
    pub async fn send_alert(&mut self) -> Result<(), AppError> {
        let risk = {
            let mut state = self.state.write().await;
            if state.alert_sent {
                return Err(AppError::AlertUnavailable(
                    "an alert was just sent".to_string(),
                ));
            }
            if !alert_enabled(state.risk, state.alert_sent) {
                return Err(AppError::AlertUnavailable(format!(
                    "flood risk {}% is below {}%",
                    state.risk.probability_percent, ALERT_THRESHOLD_PERCENT
                )));
            }
            state.alert_sent = true;
            state.risk
        };

        tracing::info!(
            "Session {}: flood alert sent (risk {}%)",
            self.session.id,
            risk.probability_percent
        );

        let state = self.state.clone();
        self.tasks.spawn("alert reset", async move {
            tokio::time::sleep(ALERT_RESET_DELAY).await;
            state.write().await.alert_sent = false;
        });
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn with_state(session: Session, state: DashboardState) -> Self {
        Self {
            session,
            state: Arc::new(RwLock::new(state)),
            tasks: TaskScope::new("dashboard"),
        }
    }

    #[cfg(test)]
    pub(crate) fn shared_state(&self) -> SharedDashboardState {
        self.state.clone()
    }
}

// ---------------------------------------------------------------------------
// Background tasks
// ---------------------------------------------------------------------------

async fn run_mount<G: Geolocator>(
    session: Session,
    geolocator: Arc<G>,
    services: DashboardServices,
    state: SharedDashboardState,
) {
    tokio::time::sleep(MOUNT_DELAY).await;

    let (coords, source) = match geolocator
        .current_position(&PositionOptions::DASHBOARD)
        .await
    {
        Ok(coords) => (coords, CoordinateSource::Device),
        Err(e) => {
            tracing::warn!(
                "Session {}: device position unavailable ({}), using login coordinates",
                session.id,
                e
            );
            (session.user.coordinates(), CoordinateSource::Session)
        }
    };

    {
        let mut s = state.write().await;
        s.phase = DashboardPhase::Ready;
        s.coordinates = Some(coords);
        s.source = Some(source);
    }
    tracing::info!(
        "Session {}: dashboard ready at {} ({:?})",
        session.id,
        coords.label(),
        source
    );

    futures::future::join(
        refresh_weather(&services.weather, coords, &state, session.id),
        refresh_risk(&services.prediction, coords, &state, session.id),
    )
    .await;
}

async fn refresh_weather(
    client: &OpenMeteoClient,
    coords: Coordinates,
    state: &SharedDashboardState,
    session_id: Uuid,
) {
    match client.fetch_forecast(coords).await {
        Ok(report) => {
            let meta = &report.meta;
            tracing::debug!(
                "Session {}: weather for {}°N {}°E, elevation {:?} m, timezone {:?} {:?}, UTC offset {}s, MSL pressure {} hPa, {} daily rows",
                session_id,
                meta.latitude,
                meta.longitude,
                meta.elevation_m,
                meta.timezone,
                meta.timezone_abbreviation,
                meta.utc_offset_seconds,
                report.snapshot.pressure_msl,
                report.daily.len()
            );
            if report.daily.is_empty() {
                tracing::warn!("Session {}: weather response had no daily series", session_id);
            }
            let mut s = state.write().await;
            s.weather = report.snapshot;
            s.daily = report.daily;
        }
        Err(e) => tracing::error!("Session {}: error fetching weather: {}", session_id, e),
    }
}

async fn refresh_risk(
    client: &PredictionClient,
    coords: Coordinates,
    state: &SharedDashboardState,
    session_id: Uuid,
) {
    match client.predict(coords).await {
        Ok(response) => {
            let risk = RiskAssessment::from_flood_probability(response.flood_probability);
            tracing::debug!(
                "Session {}: flood probability {} (likely: {:?}) → {}%",
                session_id,
                response.flood_probability,
                response.flood_likely,
                risk.probability_percent
            );
            state.write().await.risk = risk;
        }
        Err(e) => tracing::error!("Session {}: error calling /predict: {}", session_id, e),
    }
}
