use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinylink_core::ShortenerError;
use tracing::{debug, error, warn};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

/// Category of a failed request. Each kind owns exactly one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// An error on its way to becoming a `{"error": ...}` response.
///
/// `message` is what the client sees, so it never carries storage details.
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

const INTERNAL_MESSAGE: &str = "internal server error";
const NOT_FOUND_MESSAGE: &str = "short link not found";

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    pub fn internal() -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: INTERNAL_MESSAGE.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::InvalidUrl(_)
            | ShortenerError::InvalidExpiration(_)
            | ShortenerError::InvalidShortCode(_) => Self::validation(err.to_string()),
            ShortenerError::NotFound(code) => {
                debug!(code = %code, "lookup of unknown short code");
                Self::not_found()
            }
            ShortenerError::Expired(code) => {
                debug!(code = %code, "lookup of expired short code");
                Self::not_found()
            }
            ShortenerError::GenerationExhausted { attempts } => {
                warn!(attempts, "short code space under pressure");
                Self {
                    kind: ErrorKind::Internal,
                    message: "could not allocate a short link, try again".to_string(),
                }
            }
            ShortenerError::Storage(detail) => {
                error!(error = %detail, "storage failure");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        if status.is_client_error() {
            debug!(status = status.as_u16(), error = %self.message, "request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
