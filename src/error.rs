use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

/// Shown to users for any failed round trip to the analysis service.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "An error occurred during analysis. The website may be inaccessible or the API may be unavailable.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported analysis category: {0}")]
    UnsupportedCategory(String),

    #[error("Analysis service request failed: {0}")]
    TransportFailure(String),

    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// True for failures of the remote round trip, which users see as one generic failure.
    pub fn is_analysis_failure(&self) -> bool {
        matches!(self, AppError::TransportFailure(_) | AppError::MalformedResponse(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::UnsupportedCategory(_) => StatusCode::BAD_REQUEST,
            AppError::TransportFailure(_) | AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message safe to put in front of an end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::UnsupportedCategory(_) => self.to_string(),
            AppError::TransportFailure(_) | AppError::MalformedResponse(_) => {
                ANALYSIS_FAILED_MESSAGE.to_string()
            }
            AppError::ConfigError(_) => "The server is not configured correctly".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::TransportFailure(msg) => tracing::error!("transport failure: {}", msg),
            AppError::MalformedResponse(msg) => tracing::error!("malformed response: {}", msg),
            AppError::ConfigError(msg) => tracing::error!("config error: {}", msg),
            AppError::InvalidInput(msg) => tracing::debug!("rejected input: {}", msg),
            AppError::UnsupportedCategory(cat) => tracing::debug!("rejected category: {}", cat),
        }

        response::error::<()>(self.status_code(), self.user_message()).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::TransportFailure(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
