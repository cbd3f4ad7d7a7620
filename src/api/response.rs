//! Response types for the Leave Converter API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ConverterError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an internal error response.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    /// Creates a failed login response.
    pub fn invalid_login() -> Self {
        Self::new("INVALID_LOGIN", "Invalid username or password")
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status code.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<ConverterError> for ApiErrorResponse {
    fn from(error: ConverterError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            ConverterError::ConfigNotFound { .. } | ConverterError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            ConverterError::MissingColumns { missing, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details("MISSING_COLUMNS", message, missing.join(", ")),
            ),
            ConverterError::InvalidCell { column, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "INVALID_CELL",
                    message,
                    format!("Check the '{}' column of the uploaded file", column),
                ),
            ),
            ConverterError::Workbook { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_WORKBOOK",
                    message,
                    "The upload must be an .xlsx workbook",
                ),
            ),
            ConverterError::Export { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("EXPORT_ERROR", message),
            ),
            ConverterError::Storage { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("STORAGE_ERROR", message),
            ),
            ConverterError::EmployeeNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            ConverterError::DuplicateEmployee { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_EMPLOYEE", message),
            ),
            ConverterError::InvalidEmployee { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_EMPLOYEE",
                    message,
                    "The employee data contains invalid information",
                ),
            ),
            ConverterError::UserNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("USER_NOT_FOUND", message),
            ),
            ConverterError::DuplicateUser { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_USER", message),
            ),
            ConverterError::WeakPassword { .. } | ConverterError::PasswordUnchanged => (
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(message),
            ),
            ConverterError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, ApiError::invalid_login())
            }
            ConverterError::InvalidUser { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(message),
            ),
            ConverterError::NotAuthorized { .. } => (
                StatusCode::FORBIDDEN,
                ApiError::new("NOT_AUTHORIZED", message),
            ),
            ConverterError::SelfModification { .. } => (
                StatusCode::FORBIDDEN,
                ApiError::new("SELF_MODIFICATION", message),
            ),
            ConverterError::LastActiveAdmin { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("LAST_ACTIVE_ADMIN", message),
            ),
            ConverterError::PasswordHash { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CREDENTIAL_ERROR", "Stored credentials are unreadable"),
            ),
        };
        ApiErrorResponse { status, error }
    }
}
