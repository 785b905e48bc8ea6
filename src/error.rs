use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Faults raised by data collaborators.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream could not be reached
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {0}")]
    Status(u16),

    /// Upstream answered with a payload we could not use
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Social corpus could not be read
    #[error("Corpus error: {0}")]
    Corpus(#[from] csv::Error),

    /// Collaborator gave up without a fallback
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// A hard fault that stopped an assessment. Never partially aggregated.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("weather provider failed: {0}")]
    Weather(#[source] ProviderError),

    #[error("air-quality provider failed: {0}")]
    AirQuality(#[source] ProviderError),

    #[error("social-signal provider failed: {0}")]
    Social(#[source] ProviderError),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Assessment failed
    #[error("{0}")]
    Aggregation(#[from] AggregationError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Aggregation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("lat out of range".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );

        let failure = AggregationError::Weather(ProviderError::Status(503));
        assert_eq!(
            ApiError::from(failure).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn aggregation_message_keeps_original_cause() {
        let failure = AggregationError::Social(ProviderError::Unavailable("feed offline".into()));
        assert_eq!(
            ApiError::from(failure).to_string(),
            "social-signal provider failed: Provider unavailable: feed offline"
        );
    }
}
