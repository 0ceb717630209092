use thiserror::Error;

/// Failure to obtain the device position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Failure to build or execute a weather request.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid weather query: {0}")]
    InvalidQuery(String),
    #[error("Weather request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Weather service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
}
