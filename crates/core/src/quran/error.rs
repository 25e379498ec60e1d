//! Quran content API error types.

use madrasah_shared::AppError;
use thiserror::Error;

/// Errors returned by the Quran content API client.
#[derive(Debug, Clone, Error)]
pub enum QuranApiError {
    /// Client credentials are missing from configuration.
    #[error("Quran API credentials are not configured")]
    NotConfigured,

    /// Token exchange failed.
    #[error("Quran API authentication failed: {0}")]
    Auth(String),

    /// The request could not be sent or timed out.
    #[error("Quran API request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("Quran API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to decode Quran API response: {0}")]
    Decode(String),
}

impl QuranApiError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "QURAN_API_NOT_CONFIGURED",
            Self::Auth(_) => "QURAN_API_AUTH_FAILED",
            Self::Request(_) => "QURAN_API_REQUEST_FAILED",
            Self::Status { .. } => "QURAN_API_STATUS",
            Self::Decode(_) => "QURAN_API_DECODE_FAILED",
        }
    }

    /// Returns true for transient failures (network errors and 5xx).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::NotConfigured | Self::Auth(_) | Self::Decode(_) => false,
        }
    }
}

impl From<QuranApiError> for AppError {
    fn from(err: QuranApiError) -> Self {
        match err {
            QuranApiError::NotConfigured => Self::Internal(err.to_string()),
            _ => Self::ExternalService(err.to_string()),
        }
    }
}
