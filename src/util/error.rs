use axum::{response::{IntoResponse, Response}, http::StatusCode};
use serde_json::json;

use crate::repository::repository_error::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
    Internal,
}

impl HandlerErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Forbidden => StatusCode::FORBIDDEN,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::BadRequest => "BadRequest",
            HandlerErrorKind::Unauthorized => "Unauthorized",
            HandlerErrorKind::Forbidden => "Forbidden",
            HandlerErrorKind::Internal => "Internal",
        };
        write!(f, "{}", s)
    }
}

/// Error returned by every handler and middleware.
///
/// Renders as `{ "success": false, "error": "<message>" }` with the status
/// matching its kind.
#[derive(Debug)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn new<T: Into<String>>(error: HandlerErrorKind, message: T) -> Self {
        HandlerError { error, message: message.into() }
    }

    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::BadRequest, message)
    }

    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Unauthorized, message)
    }

    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Forbidden, message)
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::NotFound, message)
    }

    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Internal, message)
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let body = axum::Json(json!({
            "success": false,
            "error": self.message,
        }));
        (self.error.status(), body).into_response()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InternalError(String),
    /// A collaborator outside the process (SMTP, geocoder, disk) failed
    #[error("{0}")]
    Upstream(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) | RepositoryError::InvalidId(_) => {
                ServiceError::NotFound("Resource not found".to_string())
            }
            RepositoryError::AlreadyExists(_) => {
                ServiceError::InvalidInput("Duplicate field value entered".to_string())
            }
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::DatabaseError(msg)
            | RepositoryError::ConnectionError(msg)
            | RepositoryError::SerializationError(msg) => ServiceError::InternalError(msg),
            RepositoryError::Generic(e) => ServiceError::InternalError(e.to_string()),
        }
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => HandlerError::not_found(msg),
            ServiceError::InvalidInput(msg) => HandlerError::bad_request(msg),
            ServiceError::Unauthorized(msg) => HandlerError::unauthorized(msg),
            ServiceError::Forbidden(msg) => HandlerError::forbidden(msg),
            ServiceError::InternalError(msg) | ServiceError::Upstream(msg) => HandlerError::internal(msg),
        }
    }
}
