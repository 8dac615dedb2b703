//! Error types for Groupscope.
//!
//! [`GroupscopeError`] is the single error type surfaced by the gateway, the
//! snapshot cache and the query facade. Every variant carries a context string
//! naming the collection or identifier involved so a caller can tell which
//! upstream call failed without inspecting logs.
//!
//! The type is `Clone`: a failed cache refresh is delivered to every caller
//! that was waiting on it.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`GroupscopeError`].
pub type GroupscopeResult<T> = Result<T, GroupscopeError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Network or connection failure talking to the upstream API.
    Transport,
    /// The upstream API answered with a non-success status.
    Upstream,
    /// The upstream body did not have the expected JSON shape.
    Decode,
    /// A named lookup yielded no match.
    NotFound,
    /// Missing or invalid caller input.
    Configuration,
    /// The originating request was cancelled.
    Cancelled,
    /// The originating request's deadline passed.
    Timeout,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Transport | Self::Upstream | Self::Decode => StatusCode::BAD_GATEWAY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Configuration => StatusCode::BAD_REQUEST,
            // 499 is not a registered code; 408 is the closest standard one.
            Self::Cancelled => StatusCode::REQUEST_TIMEOUT,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Returns the category name used in error envelopes and metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Upstream => "upstream",
            Self::Decode => "decode",
            Self::NotFound => "not_found",
            Self::Configuration => "configuration",
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard error type for Groupscope.
///
/// # Example
///
/// ```
/// use groupscope_core::{ErrorCategory, GroupscopeError};
///
/// let err = GroupscopeError::upstream("list users", 401, "invalid api key");
/// assert_eq!(err.category(), ErrorCategory::Upstream);
/// assert_eq!(err.upstream_status(), Some(401));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GroupscopeError {
    /// Network or connection failure.
    #[error("transport error during {context}: {message}")]
    Transport {
        /// Which call failed (e.g. "list users").
        context: String,
        /// Underlying failure description.
        message: String,
    },

    /// Non-success HTTP status from the upstream API.
    #[error("upstream {context} failed with status {status}: {body}")]
    Upstream {
        /// Which call failed.
        context: String,
        /// HTTP status code returned by the upstream API.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// Malformed or unexpected JSON shape.
    #[error("failed to decode {context} response: {message}")]
    Decode {
        /// Which call produced the body.
        context: String,
        /// Decoder message.
        message: String,
    },

    /// A named lookup yielded no match.
    #[error("{resource} '{identifier}' not found")]
    NotFound {
        /// Resource kind (e.g. "workspace", "user").
        resource: String,
        /// Identifier or name that was looked up.
        identifier: String,
    },

    /// Missing or invalid caller input.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of what is missing or invalid.
        message: String,
    },

    /// The originating request was cancelled.
    #[error("{context} cancelled")]
    Cancelled {
        /// Operation that was in flight.
        context: String,
    },

    /// The originating request's deadline passed.
    #[error("{context} exceeded its deadline")]
    Timeout {
        /// Operation that was in flight.
        context: String,
    },
}

impl GroupscopeError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Creates an upstream status error.
    #[must_use]
    pub fn upstream(context: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            context: context.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Creates a not found error for a resource kind and identifier.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            identifier: identifier.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled(context: impl Into<String>) -> Self {
        Self::Cancelled {
            context: context.into(),
        }
    }

    /// Creates a deadline error.
    #[must_use]
    pub fn timeout(context: impl Into<String>) -> Self {
        Self::Timeout {
            context: context.into(),
        }
    }

    /// Fails with a configuration error when a required identifier is blank.
    pub fn require(name: &str, value: &str) -> GroupscopeResult<()> {
        if value.trim().is_empty() {
            return Err(Self::configuration(format!("{name} is required")));
        }
        Ok(())
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Cancelled { .. } => ErrorCategory::Cancelled,
            Self::Timeout { .. } => ErrorCategory::Timeout,
        }
    }

    /// Returns the HTTP status code a UI layer should answer with.
    ///
    /// Upstream 404s stay 404; other upstream statuses map to 502.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream { status: 404, .. } => StatusCode::NOT_FOUND,
            other => other.category().default_status_code(),
        }
    }

    /// Returns the upstream HTTP status, if this is an upstream error.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the failure came from cancellation or a deadline.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::Timeout { .. })
    }
}

/// Serializable error body handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category name.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Upstream status, when the failure came from the upstream API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            upstream_status: None,
        }
    }
}

impl From<&GroupscopeError> for ErrorResponse {
    fn from(err: &GroupscopeError) -> Self {
        Self {
            error: err.category().as_str().to_string(),
            message: err.to_string(),
            upstream_status: err.upstream_status(),
        }
    }
}

impl From<GroupscopeError> for ErrorResponse {
    fn from(err: GroupscopeError) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error, self.message)
    }
}
