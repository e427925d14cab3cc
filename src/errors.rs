//! # Error Handling
//!
//! Every failure leaves a handler as an [`ApiError`] and reaches the client as
//! the standard envelope with a sanitized message:
//!
//! ```json
//! { "content": null, "message": "Validation failed", "errors": ["page: Must be at least 1"] }
//! ```
//!
//! Database details are logged through `tracing` and never sent
//! to the client.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use std::fmt;

use crate::bulk_delete::BatchIdsError;
use crate::models::ApiResponse;
use crate::query::QueryError;
use crate::validation::ValidationErrors;

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - Resource doesn't exist
    NotFound {
        /// Resource type (e.g., "Shift")
        resource: String,
        /// Optional ID that wasn't found
        id: Option<String>,
    },

    /// 400 Bad Request - Invalid input from user
    BadRequest {
        message: String,
        /// Extra lines for the `errors` array
        details: Vec<String>,
    },

    /// 401 Unauthorized - Missing or unknown token
    Unauthorized { message: String },

    /// 403 Forbidden - Authenticated but lacks the role
    Forbidden { message: String },

    /// 400 Bad Request - Query parameters failed validation, one line per field
    ValidationFailed { errors: Vec<String> },

    /// 500 Internal Server Error - Database error (details logged, not exposed)
    Database { message: String, internal: DbErr },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn bad_request_with(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// The database error is logged but NOT sent to the user.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } | Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::ValidationFailed { .. } => "Validation failed".to_string(),
            Self::BadRequest { message, .. }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Database { message, .. } => message.clone(),
        }
    }

    fn error_lines(&self) -> Vec<String> {
        match self {
            Self::ValidationFailed { errors } => errors.clone(),
            Self::BadRequest { details, .. } => details.clone(),
            _ => Vec::new(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();
        let body = ApiResponse::error(self.user_message(), self.error_lines());
        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// `DbErr::RecordNotFound` becomes 404; every other variant is a logged 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.strip_suffix(" not found").unwrap_or("Resource");
                Self::not_found(resource, None)
            }
            _ => Self::database(err),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation_failed(errors.errors().iter().map(ToString::to_string).collect())
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Validation(errors) => errors.into(),
            QueryError::Store(e) => e.into(),
        }
    }
}

/// A query string that does not deserialize is a validation failure.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation_failed(vec![format!("query: {}", rejection.body_text())])
    }
}

impl From<BatchIdsError> for ApiError {
    fn from(err: BatchIdsError) -> Self {
        let detail = err.detail();
        Self::bad_request_with(err.to_string(), vec![detail])
    }
}
