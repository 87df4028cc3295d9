//! Application error type with HTTP response conversion.
//!
//! [`AppError`] covers every failure the authentication layer surfaces.
//! Handlers and middleware return `Result<_, AppError>` and let
//! [`IntoResponse`] turn the error into a JSON body:
//!
//! ```text
//! HTTP/1.1 403 Forbidden
//! content-type: application/json
//!
//! {"error":"credential type 'service' is not allowed"}
//! ```
//!
//! Authentication failures are never recovered into an anonymous identity;
//! they travel to the request boundary and reject the request.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// Discriminant of [`AppError`], convenient for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidToken,
    IssuanceError,
    Unauthenticated,
    Forbidden,
    MissingContext,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The token is malformed, expired, or fails its integrity checks.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// A token could not be minted for the given credentials.
    #[error("failed to issue token: {0}")]
    Issuance(String),

    /// No acceptable credentials were presented.
    #[error("{0}")]
    Unauthenticated(String),

    /// Credentials were presented but are not permitted here.
    #[error("{0}")]
    Forbidden(String),

    /// A client handle was requested from a context that never received one.
    /// This is a wiring mistake, not a runtime condition.
    #[error("{0} not found in context")]
    MissingContext(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken(message.into())
    }

    pub fn issuance(message: impl Into<String>) -> Self {
        Self::Issuance(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidToken(_) => ErrorKind::InvalidToken,
            Self::Issuance(_) => ErrorKind::IssuanceError,
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::MissingContext(_) => ErrorKind::MissingContext,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidToken | ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::IssuanceError | ErrorKind::MissingContext | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, kind = ?self.kind(), error = %message, "request failed");
        } else {
            tracing::warn!(%status, kind = ?self.kind(), error = %message, "request rejected");
        }

        let mut response = (status, Json(json!({ "error": message }))).into_response();

        if self.kind() == ErrorKind::Unauthenticated {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}
