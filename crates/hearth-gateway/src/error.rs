// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping engine errors onto HTTP responses.
//!
//! Every failure is returned as
//! `{"error": {"code": "...", "message": "..."}}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hearth_core::HearthError;
use serde::Serialize;

/// Machine-readable error code carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    AlreadyCompleted,
    Validation,
    InsufficientGold,
    ConsumableAlreadyActive,
    Unauthorized,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyCompleted => StatusCode::CONFLICT,
            Self::Validation | Self::InsufficientGold | Self::ConsumableAlreadyActive => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: ErrorCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// An error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl From<HearthError> for ApiError {
    fn from(err: HearthError) -> Self {
        let code = match &err {
            HearthError::NotFound { .. } => ErrorCode::NotFound,
            HearthError::AlreadyCompleted { .. } => ErrorCode::AlreadyCompleted,
            HearthError::Validation(_) => ErrorCode::Validation,
            HearthError::InsufficientGold { .. } => ErrorCode::InsufficientGold,
            HearthError::ConsumableActive(_) => ErrorCode::ConsumableAlreadyActive,
            HearthError::Config(_) | HearthError::Storage { .. } | HearthError::Internal(_) => {
                ErrorCode::Internal
            }
        };
        if code == ErrorCode::Internal {
            tracing::error!(error = %err, "request failed");
            // Storage details stay in the log.
            return Self::new(code, "internal error");
        }
        Self::new(code, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(ErrorCode::Validation, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };
        (self.code.status(), Json(body)).into_response()
    }
}
