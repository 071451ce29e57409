//! Client for the local flood prediction service.
//!
//! - POST /predict         {latitude, longitude} → {flood_probability, flood_likely}
//! - POST /train-location  {latitude, longitude} → training summary (logged only)

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Coordinates;

/// Client for the prediction service.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: reqwest::Client,
    base_url: String,
}

/// Request body shared by both endpoints. Coordinates may be absent when
/// training is requested before any location was detected.
#[derive(Debug, Serialize)]
struct LocationPayload {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<Option<Coordinates>> for LocationPayload {
    fn from(coords: Option<Coordinates>) -> Self {
        Self {
            latitude: coords.map(|c| c.lat),
            longitude: coords.map(|c| c.lng),
        }
    }
}

/// Response of `/predict`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    /// Raw model output.
    pub flood_probability: f64,
    #[serde(default)]
    pub flood_likely: Option<bool>,
}

/// Response of `/train-location`. Every field is optional; the body is only logged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrainingResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub best_val_loss: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request a flood probability for `coords`.
    pub async fn predict(&self, coords: Coordinates) -> Result<PredictionResponse, AppError> {
        let url = format!("{}/predict", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LocationPayload::from(Some(coords)))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("/predict request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "/predict returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<PredictionResponse>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("/predict JSON parse error: {}", e)))
    }

    /// Ask the service to train its model for `coords`.
    ///
    /// A non-2xx status is logged and the body still parsed, since the
    /// caller only logs the outcome.
    pub async fn train_location(
        &self,
        coords: Option<Coordinates>,
    ) -> Result<TrainingResponse, AppError> {
        let url = format!("{}/train-location", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LocationPayload::from(coords))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("/train-location request failed: {}", e))
            })?;

        if !response.status().is_success() {
            tracing::warn!("/train-location returned HTTP {}", response.status());
        }

        response.json::<TrainingResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("/train-location JSON parse error: {}", e))
        })
    }
}

/// Fire-and-forget training request: the outcome is only logged.
pub async fn train_model(client: PredictionClient, coords: Option<Coordinates>) {
    match client.train_location(coords).await {
        Ok(response) => tracing::info!("Training response: {:?}", response),
        Err(e) => tracing::error!("Error calling /train-location: {}", e),
    }
}
