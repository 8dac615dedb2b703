//! Team license and seat usage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::serde_util::{non_empty, null_default};

/// Seats of one type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatCount {
    /// Seats the license grants.
    pub total: usize,
    /// Seats held by members.
    pub used: usize,
    /// Seats still available.
    pub free: usize,
}

/// Seat counts per seat type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seats {
    /// Administrator seats.
    pub admin: SeatCount,
    /// Editor seats.
    pub editor: SeatCount,
    /// Contributor seats.
    pub contributor: SeatCount,
    /// Seats of any type.
    pub any: SeatCount,
}

/// Workspace allowance of the license.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceAllowance {
    /// Workspaces the team may create.
    pub total: usize,
}

/// Subscription plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    /// Plan name.
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
}

/// Current license state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseState {
    /// Enabled feature keys.
    #[serde(deserialize_with = "null_default")]
    pub features: Vec<String>,
    /// Seat usage.
    #[serde(deserialize_with = "null_default")]
    pub seats: Seats,
    /// Workspace allowance.
    #[serde(deserialize_with = "null_default")]
    pub workspaces: WorkspaceAllowance,
    /// Subscription plan.
    #[serde(deserialize_with = "null_default")]
    pub subscription: Subscription,
}

/// A team setting such as `enableAi` or `requirePortalLogin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamFlag {
    /// Effective value.
    pub value: bool,
    /// The value is enforced by the plan.
    pub enforced: bool,
    /// The value was set explicitly.
    pub explicit: bool,
}

/// The team record returned by `GET /team`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLicense {
    /// Team identifier.
    #[serde(default, deserialize_with = "null_default")]
    pub team_id: String,
    /// URL slug.
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
    /// Team name.
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    /// License state.
    #[serde(default, deserialize_with = "null_default")]
    pub state: LicenseState,
    /// Team settings by name.
    #[serde(default, deserialize_with = "null_default")]
    pub flags: BTreeMap<String, TeamFlag>,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl TeamLicense {
    /// Seat usage.
    #[must_use]
    pub const fn seats(&self) -> &Seats {
        &self.state.seats
    }

    /// Returns true if the named flag is on.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(|flag| flag.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_team_license() {
        let json = r#"{
            "teamId": "t-1",
            "slug": "acme",
            "name": "Acme",
            "state": {
                "features": ["okr"],
                "seats": {
                    "admin": {"total": 2, "used": 1, "free": 1},
                    "editor": {"total": 5, "used": 3, "free": 2},
                    "contributor": {"total": 10, "used": 0, "free": 10},
                    "any": {"total": 17, "used": 4, "free": 13}
                },
                "workspaces": {"total": 50},
                "subscription": {"type": "pro"}
            },
            "flags": {
                "enableAi": {"value": true, "enforced": false, "explicit": true},
                "requirePortalLogin": {"value": false}
            },
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": ""
        }"#;
        let license: TeamLicense = serde_json::from_str(json).unwrap();
        assert_eq!(license.name, "Acme");
        assert_eq!(license.seats().editor.used, 3);
        assert_eq!(license.seats().any.free, 13);
        assert_eq!(license.state.subscription.kind, "pro");
        assert_eq!(license.state.workspaces.total, 50);
        assert!(license.flag("enableAi"));
        assert!(!license.flag("requirePortalLogin"));
        assert!(!license.flag("removeBranding"));
        assert!(license.updated_at.is_none());
    }

    #[test]
    fn test_sparse_license() {
        let license: TeamLicense =
            serde_json::from_str(r#"{"teamId":"t","state":{"seats":null},"flags":null}"#).unwrap();
        assert_eq!(*license.seats(), Seats::default());
        assert!(license.flags.is_empty());
    }
}
