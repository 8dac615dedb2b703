//! Success/failure envelope handed to the UI layer.

use groupscope_core::{ErrorResponse, GroupscopeResult};
use serde::{Deserialize, Serialize};

/// Result of one directory query, serialized as
/// `{"status":"success","data":..}` or `{"status":"error","error":{..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome<T> {
    /// The query succeeded.
    Success {
        /// Query result.
        data: T,
    },
    /// The query failed.
    Error {
        /// Category and message of the failure.
        error: ErrorResponse,
    },
}

impl<T> Outcome<T> {
    /// True for [`Outcome::Success`].
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The data of a successful outcome.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }
}

impl<T> From<GroupscopeResult<T>> for Outcome<T> {
    fn from(result: GroupscopeResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(err) => Self::Error {
                error: ErrorResponse::from(&err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupscope_core::GroupscopeError;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let outcome = Outcome::from(Ok::<_, GroupscopeError>(vec![1, 2]));
        assert!(outcome.is_success());
        assert_eq!(outcome.data(), Some(&vec![1, 2]));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"status": "success", "data": [1, 2]})
        );
    }

    #[test]
    fn test_error_envelope() {
        let outcome: Outcome<()> = Err(GroupscopeError::not_found("user", "u-9")).into();
        assert!(!outcome.is_success());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["error"], "not_found");
        assert!(json["error"]["message"].as_str().unwrap().contains("u-9"));
        assert!(json["error"].get("upstream_status").is_none());
    }

    #[test]
    fn test_upstream_status_is_reported() {
        let outcome: Outcome<()> = Err(GroupscopeError::upstream("list users", 401, "bad key")).into();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["error"]["upstream_status"], 401);
    }
}
