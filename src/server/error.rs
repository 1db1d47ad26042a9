//! API error responses and flash messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sweetshop_common::Error;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Error,
}

/// User-facing result message of an admin action.
#[derive(Debug, Clone, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Flash {
    pub fn new<S: Into<String>>(level: FlashLevel, message: S) -> Self {
        Self {
            level,
            message: message.into(),
            data: None,
        }
    }

    pub fn success<S: Into<String>>(message: S) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self::new(FlashLevel::Warning, message)
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self::new(FlashLevel::Error, message)
    }

    /// Success, or a warning carrying `warning` when one is present.
    pub fn with_warning(message: String, warning: Option<String>) -> Self {
        match warning {
            Some(w) => Self::warning(format!("{}. {}", message, w)),
            None => Self::success(message),
        }
    }

    /// Attach a serializable payload.
    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }
}

impl IntoResponse for Flash {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Error returned by API handlers, rendered as an error flash.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if !err.is_client_error() {
            tracing::error!("Request failed: {}", err);
        }

        let status = match &err {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) | Error::InvalidFormat { .. } => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Database(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Flash::error(self.message))).into_response()
    }
}
