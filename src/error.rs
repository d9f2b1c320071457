// src/error.rs

use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use std::fmt;

use crate::views;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// Public pages answer failures with `202 Accepted` and a rendered error page;
/// the detail only ever reaches the log.
#[derive(Debug)]
pub enum AppError {
    /// Database failure, with the message shown to the visitor.
    Store {
        message: &'static str,
        source: sqlx::Error,
    },

    /// A quiz submission failed validation. Holds the reason for the log.
    InvalidSubmission(String),

    /// A question bank upload was refused (400, plain text `reason`).
    UploadRejected {
        reason: &'static str,
        detail: String,
    },

    /// Missing or wrong admin credentials.
    Unauthorized,
}

impl AppError {
    pub fn store(message: &'static str, source: sqlx::Error) -> Self {
        AppError::Store { message, source }
    }

    pub fn upload(reason: &'static str, detail: impl Into<String>) -> Self {
        AppError::UploadRejected {
            reason,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store { message, source } => write!(f, "{}: {}", message, source),
            AppError::InvalidSubmission(detail) => write!(f, "invalid quiz response: {}", detail),
            AppError::UploadRejected { reason, detail } => write!(f, "{}: {}", reason, detail),
            AppError::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Store { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Store { message, source } => {
                tracing::error!("{}: {:?}", message, source);
                error_page(message)
            }
            AppError::InvalidSubmission(detail) => {
                tracing::error!("quiz validation error: {}", detail);
                error_page("Invalid quiz response")
            }
            AppError::UploadRejected { reason, detail } => {
                tracing::error!("question upload rejected: {}: {}", reason, detail);
                (StatusCode::BAD_REQUEST, reason).into_response()
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Restricted\"")],
            )
                .into_response(),
        }
    }
}

fn error_page(message: &str) -> Response {
    (
        StatusCode::ACCEPTED,
        Html(views::error_page(message).into_string()),
    )
        .into_response()
}
