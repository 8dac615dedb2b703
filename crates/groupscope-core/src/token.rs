//! Upstream API credentials.

use std::fmt;

use crate::error::{GroupscopeError, GroupscopeResult};

/// Caller-supplied bearer token for the upstream API.
///
/// The token is forwarded on every upstream request and never persisted.
/// `Debug` and `Display` redact it so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a token, rejecting blank input.
    pub fn new(token: impl Into<String>) -> GroupscopeResult<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(GroupscopeError::configuration("api token is required"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the raw token for building the authorization header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
