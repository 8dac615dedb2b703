//! Permission levels and per-user grant maps.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GroupscopeError;

/// Access level on a workspace or workspace group.
///
/// Levels are totally ordered: `read < comment < write < full`. Merging two
/// grants keeps the higher one.
///
/// # Example
///
/// ```
/// use groupscope_core::Permission;
///
/// assert!(Permission::Read < Permission::Full);
/// assert_eq!(Permission::Comment.merge(Permission::Write), Permission::Write);
/// assert_eq!("write".parse::<Permission>().unwrap(), Permission::Write);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// View only. The floor of every resolution.
    #[default]
    Read,
    /// View and comment.
    Comment,
    /// Edit items.
    Write,
    /// Full control, including sharing.
    Full,
}

impl Permission {
    /// All levels, lowest first.
    pub const ALL: [Self; 4] = [Self::Read, Self::Comment, Self::Write, Self::Full];

    /// Returns the wire name of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Comment => "comment",
            Self::Write => "write",
            Self::Full => "full",
        }
    }

    /// Returns the higher of the two levels.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }

    /// Merges an optional grant into this level.
    #[must_use]
    pub fn merge_opt(self, other: Option<Self>) -> Self {
        other.map_or(self, |other| self.merge(other))
    }

    /// True for levels that can edit (`write` or `full`).
    #[must_use]
    pub const fn is_editor(&self) -> bool {
        matches!(self, Self::Write | Self::Full)
    }

    /// True for `full`.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Full)
    }

    /// Parses a wire value, returning `None` for blank or unknown strings.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match value.parse() {
            Ok(permission) => Some(permission),
            Err(_) => {
                tracing::warn!(permission = %value, "ignoring unknown permission value");
                None
            }
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = GroupscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "comment" => Ok(Self::Comment),
            "write" => Ok(Self::Write),
            "full" => Ok(Self::Full),
            other => Err(GroupscopeError::decode(
                "permission",
                format!("unknown permission '{other}'"),
            )),
        }
    }
}

/// Deserializes an optional permission where blank or unknown values mean
/// "no permission configured".
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Permission>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Permission::parse_lenient))
}

/// Explicit grants keyed by user identifier.
///
/// Iteration order carries no meaning. Entries whose value is not a known
/// permission are dropped while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMap(HashMap<String, Permission>);

impl PermissionMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the explicit grant for `user_id`, if any.
    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<Permission> {
        self.0.get(user_id).copied()
    }

    /// Returns true if `user_id` has an explicit grant.
    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.0.contains_key(user_id)
    }

    /// Sets the grant for `user_id`, returning the previous one.
    pub fn insert(&mut self, user_id: impl Into<String>, permission: Permission) -> Option<Permission> {
        self.0.insert(user_id.into(), permission)
    }

    /// Iterates over `(user_id, permission)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Permission)> {
        self.0.iter().map(|(user, perm)| (user.as_str(), *perm))
    }

    /// Number of explicit grants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no explicit grants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Permission)> for PermissionMap {
    fn from_iter<I: IntoIterator<Item = (K, Permission)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for PermissionMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw
            .into_iter()
            .filter_map(|(user, value)| Permission::parse_lenient(&value).map(|perm| (user, perm)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_total_order() {
        assert!(Permission::Read < Permission::Comment);
        assert!(Permission::Comment < Permission::Write);
        assert!(Permission::Write < Permission::Full);
        assert_eq!(Permission::default(), Permission::Read);
    }

    #[test]
    fn test_merge_keeps_maximum() {
        assert_eq!(Permission::Full.merge(Permission::Read), Permission::Full);
        assert_eq!(Permission::Read.merge_opt(None), Permission::Read);
        assert_eq!(
            Permission::Read.merge_opt(Some(Permission::Comment)),
            Permission::Comment
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("FULL".parse::<Permission>().unwrap(), Permission::Full);
        assert!("owner".parse::<Permission>().is_err());
        assert_eq!(Permission::parse_lenient(""), None);
        assert_eq!(Permission::parse_lenient("owner"), None);
        assert_eq!(Permission::parse_lenient("comment"), Some(Permission::Comment));
    }

    #[test]
    fn test_editor_admin() {
        assert!(Permission::Write.is_editor());
        assert!(Permission::Full.is_editor());
        assert!(!Permission::Comment.is_editor());
        assert!(Permission::Full.is_admin());
        assert!(!Permission::Write.is_admin());
    }

    #[test]
    fn test_map_drops_unknown_values() {
        let map: PermissionMap =
            serde_json::from_str(r#"{"u1":"write","u2":"owner","u3":""}"#).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("u1"), Some(Permission::Write));
        assert!(!map.contains("u2"));
    }

    #[test]
    fn test_map_null_is_empty() {
        let map: PermissionMap = serde_json::from_str("null").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_map_serializes_as_object() {
        let map: PermissionMap = [("u1", Permission::Full)].into_iter().collect();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({"u1": "full"}));
    }

    proptest! {
        #[test]
        fn merge_is_commutative_and_monotone(a in 0usize..4, b in 0usize..4) {
            let (a, b) = (Permission::ALL[a], Permission::ALL[b]);
            prop_assert_eq!(a.merge(b), b.merge(a));
            prop_assert!(a.merge(b) >= a);
            prop_assert!(a.merge(b) >= b);
        }
    }
}
