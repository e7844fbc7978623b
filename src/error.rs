//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unsupported verb: {0}")]
    UnsupportedVerb(String),
    #[error("authentication required for {verbs} but no decision function was supplied")]
    MissingAuthDecision { verbs: String },
    #[error("function evaluation route '{path}' overlaps a collection or instance route")]
    EvalCollision { path: String },
    #[error("invalid collection name: '{0}'")]
    InvalidCollectionName(String),
    #[error("invalid relation name: '{0}'")]
    InvalidRelationName(String),
    #[error("invalid url prefix: '{0}' (must be empty or start with '/')")]
    InvalidUrlPrefix(String),
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum NamingError {
    #[error("malformed registry entry '{entry}' for base name '{base}'")]
    MalformedEntry { base: String, entry: String },
    #[error("name registry unavailable (lock poisoned)")]
    RegistryUnavailable,
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("route group '{0}' is already registered with the host")]
    DuplicateGroup(String),
    #[error("{verb} {path} is already bound by another route group")]
    ConflictingRoute { path: String, verb: String },
    #[error("route host unavailable (lock poisoned)")]
    Unavailable,
}

/// Failure of a single registration call. Never retried internally.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Naming(#[from] NamingError),
    /// Computed name was already present at insertion time. Indicates a locking bug.
    #[error("group name collision: '{0}'")]
    Collision(String),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("registration state unavailable (lock poisoned)")]
    StateUnavailable,
}

/// Request-path errors returned by handler capabilities.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("internal: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::MethodNotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
