use serde_json::Value;
use thiserror::Error;

use crate::infrastructure::transport::{RequestConfig, TransportError};

/// Failure of a single API call.
///
/// Every variant that got as far as sending keeps the originating
/// [`RequestConfig`], so callers can inspect or replay it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The response policy already acted on this failure (logout or redirect).
    #[error(
        "{} {} handled by response policy (status {status}, redirected to {redirect})",
        .request.method,
        .request.path
    )]
    Intercepted {
        status: u16,
        redirect: String,
        request: RequestConfig,
    },

    #[error("{} {} failed with status {status}: {detail}", .request.method, .request.path)]
    Status {
        status: u16,
        detail: String,
        request: RequestConfig,
    },

    #[error("{} {} failed: {source}", .request.method, .request.path)]
    Transport {
        #[source]
        source: TransportError,
        request: RequestConfig,
    },

    #[error(
        "unexpected response body from {} {} (status {status})",
        .request.method,
        .request.path
    )]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
        request: RequestConfig,
    },

    #[error("failed to encode request body for {path}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status of the response, if one was received.
    pub fn response_status(&self) -> Option<u16> {
        match self {
            ApiError::Intercepted { status, .. }
            | ApiError::Status { status, .. }
            | ApiError::Decode { status, .. } => Some(*status),
            ApiError::Transport { .. } | ApiError::Encode { .. } => None,
        }
    }

    /// The request that produced this error.
    pub fn request_config(&self) -> Option<&RequestConfig> {
        match self {
            ApiError::Intercepted { request, .. }
            | ApiError::Status { request, .. }
            | ApiError::Transport { request, .. }
            | ApiError::Decode { request, .. } => Some(request),
            ApiError::Encode { .. } => None,
        }
    }

    /// Server-provided human readable message, for status errors.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn is_intercepted(&self) -> bool {
        matches!(self, ApiError::Intercepted { .. })
    }
}

/// Pulls the user-facing message out of an error body.
///
/// The API reports errors as `{"detail": "..."}`; validation failures send
/// `{"detail": [{"msg": "..."}]}`. Anything else falls back to the raw text.
pub fn extract_detail(status: u16, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        let message = match &value {
            Value::Object(map) => match map.get("detail").or_else(|| map.get("message")) {
                Some(Value::String(text)) => Some(text.clone()),
                Some(Value::Array(items)) => items
                    .first()
                    .and_then(|item| item.get("msg"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            },
            Value::String(text) => Some(text.clone()),
            _ => None,
        };
        if let Some(message) = message {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        format!("HTTP {status}")
    } else {
        text.to_string()
    }
}
