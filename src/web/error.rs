//! API error handling for the board routes.
//!
//! Errors are answered as plain text: clients match on the message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::BoardError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400). Covers invalid input and unknown ids.
    BadRequest,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the response message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create a bad request error from validator::ValidationErrors.
    ///
    /// Only the first message is reported, taking fields in name order so
    /// the response is stable.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        let message = fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {}", field))
                })
            })
            .unwrap_or_else(|| "invalid request".to_string());

        Self::bad_request(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status_code(), self.message).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match &err {
            BoardError::NotFound(entity) => ApiError::bad_request(format!("unknown {entity} id")),
            BoardError::Validation(msg) => ApiError::bad_request(msg.clone()),
            BoardError::Hashing(_) => {
                tracing::error!("Password hashing failed: {}", err);
                ApiError::bad_request("Password encryption error")
            }
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal("internal error")
            }
        }
    }
}
