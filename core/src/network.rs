//! Transport-level failures and response decoding.
//!
//! # Design
//! `NetworkError` is the single descriptor the classifier looks at. It is
//! produced either by a `Transport` (no response at all) or by
//! `decode_response` when a response arrives but cannot be used: a non-2xx
//! status, an API error body, or a 2xx body that does not match the
//! expected shape.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpOutcome;

/// Broad category of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericErrorType {
    Timeout,
    NoConnection,
    NetworkError,
    NotFound,
    ServerError,
    HttpAuthError,
    InvalidResponse,
    NotAuthenticated,
    Unknown,
}

impl GenericErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            GenericErrorType::Timeout => "timeout",
            GenericErrorType::NoConnection => "no_connection",
            GenericErrorType::NetworkError => "network_error",
            GenericErrorType::NotFound => "not_found",
            GenericErrorType::ServerError => "server_error",
            GenericErrorType::HttpAuthError => "http_auth_error",
            GenericErrorType::InvalidResponse => "invalid_response",
            GenericErrorType::NotAuthenticated => "not_authenticated",
            GenericErrorType::Unknown => "unknown",
        }
    }

    /// Category for a non-2xx status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => GenericErrorType::NotAuthenticated,
            403 => GenericErrorType::HttpAuthError,
            404 => GenericErrorType::NotFound,
            408 => GenericErrorType::Timeout,
            500..=599 => GenericErrorType::ServerError,
            _ => GenericErrorType::Unknown,
        }
    }
}

impl fmt::Display for GenericErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure reported by the HTTP layer.
///
/// `api_error` carries the API's own error code (`"unauthorized"`,
/// `"unknown_blog"`, ...) when the server sent one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {}", .message.as_deref().unwrap_or("no details"))]
pub struct NetworkError {
    pub kind: GenericErrorType,
    pub api_error: Option<String>,
    pub message: Option<String>,
    pub status: Option<u16>,
}

impl NetworkError {
    /// A failure with no response, as reported by a transport.
    pub fn generic(kind: GenericErrorType, message: impl Into<String>) -> Self {
        Self {
            kind,
            api_error: None,
            message: Some(message.into()),
            status: None,
        }
    }

    /// A response arrived but its body could not be used.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::generic(GenericErrorType::InvalidResponse, message)
    }

    /// Whether the failure falls into a known generic category.
    pub fn is_generic(&self) -> bool {
        self.kind != GenericErrorType::Unknown
    }

    /// Build an error from a non-2xx response, reading the API error body
    /// when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let api_body = serde_json::from_str::<ApiErrorBody>(body).ok();
        let (api_error, message) = match api_body {
            Some(b) => (b.error, b.message),
            None if body.trim().is_empty() => (None, None),
            None => (None, Some(body.to_string())),
        };
        Self {
            kind: GenericErrorType::from_status(status),
            api_error,
            message,
            status: Some(status),
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Turn a transport outcome into the expected wire type.
pub fn decode_response<T: DeserializeOwned>(outcome: HttpOutcome) -> Result<T, NetworkError> {
    let response = outcome?;
    if !response.is_success() {
        return Err(NetworkError::from_status(response.status, &response.body));
    }
    serde_json::from_str(&response.body).map_err(|e| NetworkError::invalid_response(e.to_string()))
}
