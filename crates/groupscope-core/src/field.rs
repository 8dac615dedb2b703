//! Custom fields.
//!
//! The upstream `_embedded` block of a field has two shapes depending on
//! `isTeamField`: team fields list every workspace id they are used in,
//! workspace fields list their own per-workspace associations. [`Field`]
//! decodes the block into [`FieldScope`] according to the flag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GroupscopeError;
use crate::serde_util::{non_empty, null_default};
use crate::workspace::WorkspaceNames;

/// A field's association with one workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldWorkspace {
    /// Workspace the field is attached to.
    pub workspace_id: String,
    /// Display order within that workspace.
    #[serde(default, deserialize_with = "null_default")]
    pub order: i64,
}

/// Where a field applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldScope {
    /// Team-wide field.
    Team {
        /// Every workspace the field is used in.
        all_workspace_ids: Vec<String>,
    },
    /// Field owned by individual workspaces.
    Workspace {
        /// Per-workspace associations.
        workspaces: Vec<FieldWorkspace>,
    },
}

impl Default for FieldScope {
    fn default() -> Self {
        Self::Workspace {
            workspaces: Vec::new(),
        }
    }
}

impl FieldScope {
    /// Workspace ids the field is associated with, in upstream order.
    pub fn workspace_ids(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Team { all_workspace_ids } => {
                Box::new(all_workspace_ids.iter().map(String::as_str))
            }
            Self::Workspace { workspaces } => {
                Box::new(workspaces.iter().map(|ws| ws.workspace_id.as_str()))
            }
        }
    }

    /// True for team-wide fields.
    #[must_use]
    pub const fn is_team(&self) -> bool {
        matches!(self, Self::Team { .. })
    }
}

/// A custom field definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldRecord", into = "FieldRecord")]
pub struct Field {
    /// Unique field identifier.
    pub id: String,
    /// Field name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Upstream field type (e.g. `select`, `text`).
    pub field_type: String,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
    /// Team-wide or per-workspace association.
    pub scope: FieldScope,
}

impl Field {
    /// Creates a workspace-scoped field with no associations.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the given scope.
    #[must_use]
    pub fn with_scope(mut self, scope: FieldScope) -> Self {
        self.scope = scope;
        self
    }

    /// True for team-wide fields.
    #[must_use]
    pub const fn is_team_field(&self) -> bool {
        self.scope.is_team()
    }

    /// Number of workspaces the field is associated with.
    #[must_use]
    pub fn workspace_count(&self) -> usize {
        match &self.scope {
            FieldScope::Team { all_workspace_ids } => all_workspace_ids.len(),
            FieldScope::Workspace { workspaces } => workspaces.len(),
        }
    }

    /// True for fields created on a date starting with `created_prefix` and
    /// never updated since.
    #[must_use]
    pub fn is_placeholder(&self, created_prefix: &str) -> bool {
        self.updated_at.is_none()
            && self
                .created_at
                .as_deref()
                .is_some_and(|created| created.starts_with(created_prefix))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamEmbedded {
    #[serde(default, deserialize_with = "null_default")]
    all_workspace_ids: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WorkspaceEmbedded {
    #[serde(default, deserialize_with = "null_default")]
    workspaces: Vec<FieldWorkspace>,
}

/// Wire shape of a field.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldRecord {
    id: String,
    #[serde(default, deserialize_with = "null_default")]
    name: String,
    #[serde(default, deserialize_with = "null_default")]
    description: String,
    #[serde(rename = "type", default, deserialize_with = "null_default")]
    field_type: String,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    is_team_field: bool,
    #[serde(rename = "_embedded", default)]
    embedded: Value,
}

impl TryFrom<FieldRecord> for Field {
    type Error = GroupscopeError;

    fn try_from(record: FieldRecord) -> Result<Self, Self::Error> {
        let embedded = if record.embedded.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            record.embedded
        };
        let context = format!("field {}", record.id);
        let scope = if record.is_team_field {
            let team: TeamEmbedded =
                serde_json::from_value(embedded).map_err(|e| GroupscopeError::decode(&context, e))?;
            FieldScope::Team {
                all_workspace_ids: team.all_workspace_ids,
            }
        } else {
            let ws: WorkspaceEmbedded =
                serde_json::from_value(embedded).map_err(|e| GroupscopeError::decode(&context, e))?;
            FieldScope::Workspace {
                workspaces: ws.workspaces,
            }
        };

        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            field_type: record.field_type,
            created_at: record.created_at,
            updated_at: record.updated_at,
            scope,
        })
    }
}

impl From<Field> for FieldRecord {
    fn from(field: Field) -> Self {
        let (is_team_field, embedded) = match field.scope {
            FieldScope::Team { all_workspace_ids } => (
                true,
                serde_json::to_value(TeamEmbedded { all_workspace_ids }),
            ),
            FieldScope::Workspace { workspaces } => (
                false,
                serde_json::to_value(WorkspaceEmbedded { workspaces }),
            ),
        };
        Self {
            id: field.id,
            name: field.name,
            description: field.description,
            field_type: field.field_type,
            created_at: field.created_at,
            updated_at: field.updated_at,
            is_team_field,
            embedded: embedded.unwrap_or(Value::Null),
        }
    }
}

/// A field decorated with the names of the workspaces it is used in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedField {
    /// The field itself.
    #[serde(flatten)]
    pub field: Field,
    /// Names of the associated workspaces that are currently known.
    #[serde(default)]
    pub workspace_names: Vec<String>,
}

impl NamedField {
    /// Decorates `field` with workspace names.
    ///
    /// Ids missing from `names` are skipped without error.
    #[must_use]
    pub fn resolve(field: Field, names: &WorkspaceNames) -> Self {
        let workspace_names = field
            .scope
            .workspace_ids()
            .filter_map(|id| names.get(id).cloned())
            .collect();
        Self {
            field,
            workspace_names,
        }
    }

    /// Number of workspaces the field is associated with.
    #[must_use]
    pub fn workspace_count(&self) -> usize {
        self.field.workspace_count()
    }
}
