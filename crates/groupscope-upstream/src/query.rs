//! Request and response bodies of the upstream search endpoints.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// `{"direction": ..}` under a workspace sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSort {
    /// Sort direction.
    pub direction: Direction,
}

/// Workspace search sort: `{"type":"name","name":{"direction":"asc"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSort {
    /// Sort key, always `name`.
    #[serde(rename = "type")]
    pub sort_type: String,
    /// Direction of the name sort.
    pub name: NameSort,
}

impl Default for WorkspaceSort {
    fn default() -> Self {
        Self {
            sort_type: "name".to_string(),
            name: NameSort::default(),
        }
    }
}

/// Name filter for workspace search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFilter {
    /// Filter kind, always `name`.
    #[serde(rename = "type")]
    pub filter_type: String,
    /// Match mode, `contain` for substring matches.
    pub mode: String,
    /// Text to match.
    pub text: String,
    /// Whether matching is case-sensitive.
    pub case_sensitive: bool,
}

impl WorkspaceFilter {
    /// Case-insensitive substring match on the workspace name.
    pub fn name_contains(text: impl Into<String>) -> Self {
        Self {
            filter_type: "name".to_string(),
            mode: "contain".to_string(),
            text: text.into(),
            case_sensitive: false,
        }
    }
}

/// Body of `POST /workspaces/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSearchQuery {
    /// Sort order.
    pub sort: WorkspaceSort,
    /// Include archived workspaces.
    pub archived: bool,
    /// Optional name filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<WorkspaceFilter>,
}

impl WorkspaceSearchQuery {
    /// All non-archived workspaces, by name.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Non-archived workspaces whose name contains `text`.
    pub fn by_name(text: impl Into<String>) -> Self {
        Self {
            filter: Some(WorkspaceFilter::name_contains(text)),
            ..Self::default()
        }
    }
}

/// Group search sort: `{"type":"name","direction":"asc"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSort {
    /// Sort key, always `name`.
    #[serde(rename = "type")]
    pub sort_type: String,
    /// Sort direction.
    pub direction: Direction,
}

impl Default for GroupSort {
    fn default() -> Self {
        Self {
            sort_type: "name".to_string(),
            direction: Direction::Asc,
        }
    }
}

/// Body of `POST /workspaces/groups/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSearchQuery {
    /// Sort order.
    pub sort: GroupSort,
}

/// Body of `POST /fields/search`. The default value selects every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSearchQuery {
    /// Restrict to team fields.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_team_field: bool,
    /// Restrict to fields used in these workspaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workspace_ids: Vec<String>,
}

/// Response envelope of the search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage<T> {
    /// Matching records.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Total number of matches reported upstream.
    #[serde(default)]
    pub total_items: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workspace_query_body() {
        assert_eq!(
            serde_json::to_value(WorkspaceSearchQuery::all()).unwrap(),
            json!({"sort": {"type": "name", "name": {"direction": "asc"}}, "archived": false})
        );
        assert_eq!(
            serde_json::to_value(WorkspaceSearchQuery::by_name("Road")).unwrap()["filter"],
            json!({"type": "name", "mode": "contain", "text": "Road", "caseSensitive": false})
        );
    }

    #[test]
    fn test_group_query_body() {
        assert_eq!(
            serde_json::to_value(GroupSearchQuery::default()).unwrap(),
            json!({"sort": {"type": "name", "direction": "asc"}})
        );
    }

    #[test]
    fn test_field_query_body() {
        assert_eq!(serde_json::to_value(FieldSearchQuery::default()).unwrap(), json!({}));
        let query = FieldSearchQuery {
            is_team_field: true,
            workspace_ids: vec!["w-1".into()],
        };
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({"isTeamField": true, "workspaceIds": ["w-1"]})
        );
    }

    #[test]
    fn test_search_page_defaults() {
        let page: SearchPage<String> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
    }
}
