use crate::services::geolocation::GeolocationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// Displayed verbatim, the message is what the user sees.
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    /// Form validation failure; the message is shown as a notification.
    #[error("{0}")]
    Validation(String),

    #[error("Alert unavailable: {0}")]
    AlertUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
