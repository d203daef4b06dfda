//! Action-level error types.

use thiserror::Error;

use crate::infrastructure::api_error::ApiError;

/// Error surfaced by write-path and session actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// The server (or the connection) rejected the action. `message` is the
    /// server's human readable detail when it sent one; `cause` is the HTTP
    /// status, absent for transport failures.
    #[error("{message}")]
    Failed { message: String, cause: Option<u16> },

    /// The global response policy already redirected away (or logged out).
    #[error("redirected to {redirect} after status {cause}")]
    Redirected { redirect: String, cause: u16 },

    #[error("not authenticated")]
    Unauthenticated,
}

impl ActionError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ActionError::Failed { cause, .. } => *cause,
            ActionError::Redirected { cause, .. } => Some(*cause),
            ActionError::Unauthenticated => None,
        }
    }
}

impl From<ApiError> for ActionError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Intercepted {
                status, redirect, ..
            } => ActionError::Redirected {
                redirect,
                cause: status,
            },
            ApiError::Status { status, detail, .. } => ActionError::Failed {
                message: detail,
                cause: Some(status),
            },
            ApiError::Decode { status, .. } => ActionError::Failed {
                message: "unexpected response from server".to_string(),
                cause: Some(status),
            },
            ApiError::Transport { source, .. } => ActionError::Failed {
                message: source.to_string(),
                cause: None,
            },
            ApiError::Encode { source, .. } => ActionError::Failed {
                message: source.to_string(),
                cause: None,
            },
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;

/// Outcome of a read-path action. Failures are logged and swallowed at the
/// store boundary; only the status is kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Loaded(T),
    Failed { status: Option<u16> },
}

impl<T> Fetch<T> {
    pub fn failed(error: &ApiError) -> Self {
        Fetch::Failed {
            status: error.response_status(),
        }
    }

    pub fn loaded(self) -> Option<T> {
        match self {
            Fetch::Loaded(value) => Some(value),
            Fetch::Failed { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Fetch::Loaded(_))
    }
}
