//! Top-level wiring: the session decides which screen is shown.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::errors::AppError;
use crate::models::{Coordinates, User};
use crate::screens::dashboard::{DashboardScreen, DashboardServices, DashboardView};
use crate::screens::landing::LandingScreen;
use crate::services::geolocation::Geolocator;
use crate::services::prediction::train_model;
use crate::session::{Session, SessionHolder};
use crate::tasks::TaskScope;

/// The screen currently shown.
#[derive(Debug)]
pub enum Screen {
    Landing(LandingScreen),
    Dashboard(DashboardScreen),
}

pub struct App<G> {
    geolocator: Arc<G>,
    services: DashboardServices,
    sessions: SessionHolder,
    screen: Screen,
    /// Application-lifetime tasks (model training requests).
    background: TaskScope,
    rng: StdRng,
}

impl<G: Geolocator + 'static> App<G> {
    pub fn new(geolocator: G, services: DashboardServices) -> Self {
        Self::with_rng(geolocator, services, StdRng::from_entropy())
    }

    pub fn with_rng(geolocator: G, services: DashboardServices, rng: StdRng) -> Self {
        Self {
            geolocator: Arc::new(geolocator),
            services,
            sessions: SessionHolder::new(),
            screen: Screen::Landing(LandingScreen::new()),
            background: TaskScope::new("app"),
            rng,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.sessions.current()
    }

    /// The landing screen, when it is the one shown.
    pub fn landing_mut(&mut self) -> Result<&mut LandingScreen, AppError> {
        match &mut self.screen {
            Screen::Landing(landing) => Ok(landing),
            Screen::Dashboard(_) => Err(AppError::InternalError(
                "landing screen is not shown".to_string(),
            )),
        }
    }

    pub async fn detect_location(&mut self) -> Result<Coordinates, AppError> {
        let geolocator = self.geolocator.clone();
        self.landing_mut()?.detect_location(geolocator.as_ref()).await
    }

    /// Handle the registration button: fire the training request, then
    /// submit the form and log in on success.
    ///
    /// The training request goes out whether or not the form validates.
    pub async fn submit_registration(&mut self) -> Result<Session, AppError> {
        let Screen::Landing(landing) = &mut self.screen else {
            return Err(AppError::InternalError(
                "landing screen is not shown".to_string(),
            ));
        };

        self.background.spawn(
            "train-location request",
            train_model(self.services.prediction.clone(), landing.detected()),
        );

        let user = landing.submit(&mut self.rng).await?;
        Ok(self.login(user))
    }

    fn login(&mut self, user: User) -> Session {
        let session = self.sessions.login(user).clone();
        let dashboard =
            DashboardScreen::mount(session.clone(), self.geolocator.clone(), self.services.clone());
        self.screen = Screen::Dashboard(dashboard);
        session
    }

    /// End the session and return to the landing screen. The dashboard's
    /// outstanding fetches are cancelled with it.
    pub fn logout(&mut self) {
        self.sessions.logout();
        self.screen = Screen::Landing(LandingScreen::new());
    }

    pub async fn dashboard_view(&self) -> Option<DashboardView> {
        match &self.screen {
            Screen::Dashboard(dashboard) => Some(dashboard.view().await),
            Screen::Landing(_) => None,
        }
    }

    pub async fn send_alert(&mut self) -> Result<(), AppError> {
        match &mut self.screen {
            Screen::Dashboard(dashboard) => dashboard.send_alert().await,
            Screen::Landing(_) => Err(AppError::InternalError(
                "dashboard is not shown".to_string(),
            )),
        }
    }

    #[cfg(test)]
    async fn drain_background(&mut self) {
        self.background.drain().await;
    }
}
