//! Team members.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::serde_util::{non_empty, null_default};

/// Team-level role of a user.
///
/// Known roles decode case-insensitively. Anything else is kept verbatim in
/// [`UserRole::Other`] and serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Team administrator.
    Admin,
    /// Editor seat.
    Editor,
    /// Contributor seat.
    Contributor,
    /// A role this crate does not know about, as sent upstream.
    Other(String),
}

impl UserRole {
    /// Returns the wire name of this role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Contributor => "contributor",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Maps a wire value onto a role, ignoring case for the known ones.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "editor" => Self::Editor,
            "contributor" => Self::Contributor,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Invitation and seat flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserState {
    /// The invitation has not been accepted yet.
    pub pending: bool,
    /// The user holds no paid seat.
    pub unseated: bool,
}

/// A member of the team, as returned by `GET /team/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub user_id: String,
    /// Team the user belongs to.
    #[serde(default, deserialize_with = "null_default")]
    pub team_id: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_default")]
    pub full_name: String,
    /// Email address.
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    /// Team role.
    #[serde(default, deserialize_with = "null_default")]
    pub role: UserRole,
    /// Invitation / seat flags, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<UserState>,
    /// Whether this user created the team.
    #[serde(default, deserialize_with = "null_default")]
    pub is_team_creator: bool,
    /// Whether the account is disabled.
    #[serde(default, deserialize_with = "null_default")]
    pub disabled: bool,
    /// Whether the email address is verified.
    #[serde(default, deserialize_with = "null_default")]
    pub email_verified: bool,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    /// True while the invitation is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.is_some_and(|s| s.pending)
    }

    /// True when the user holds no seat.
    #[must_use]
    pub fn is_unseated(&self) -> bool {
        self.state.is_some_and(|s| s.unseated)
    }
}
