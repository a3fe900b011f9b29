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
    #[error("config load: {0}")]
    Load(String),
    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate operation: {0}")]
    DuplicateOperation(String),
    #[error("operation '{operation}' declares more than one request body parameter")]
    MultipleBodies { operation: String },
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),
    #[error("invalid http method: '{0}'")]
    InvalidMethod(String),
    #[error("invalid path template '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("validation: {0}")]
    Validation(String),
}

/// Failures while building a handler surface from descriptors. Fatal at startup.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("no backing store bound")]
    UnresolvedBackend,
    #[error("operation '{operation}' delegates to unknown store operation '{delegate}'")]
    UnknownDelegate { operation: String, delegate: String },
    #[error("operation '{operation}' delegates to '{delegate}', which the backing store does not provide")]
    UnsupportedDelegate { operation: String, delegate: String },
    #[error("operation '{operation}' parameters {found:?} do not match '{delegate}' signature {expected:?}")]
    SignatureMismatch {
        operation: String,
        delegate: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("operation '{operation}' declares result '{found}' but '{delegate}' returns '{expected}'")]
    ResultMismatch {
        operation: String,
        delegate: String,
        expected: String,
        found: String,
    },
    #[error("operation '{operation}' updates unknown field '{field}'")]
    UnknownField { operation: String, field: String },
    #[error("surface type '{0}' has already been constructed")]
    DuplicateTypeName(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures while publishing a surface into the routing table. Fatal at startup.
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("surface '{surface}' has no method {operation}({signature})")]
    MethodNotFound {
        surface: String,
        operation: String,
        signature: String,
    },
    #[error("route already registered: {method} {path}")]
    RouteCollision { method: String, path: String },
    #[error("path template '{path}' differs from '{existing}' only in placeholder names")]
    AmbiguousTemplate { path: String, existing: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
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
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Synthesis(_) => (StatusCode::INTERNAL_SERVER_ERROR, "synthesis_error"),
            AppError::Registration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "registration_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::UnsupportedMediaType(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
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
