//! The query facade.

use std::collections::BTreeMap;

use groupscope_cache::{CacheConfig, SnapshotCache};
use groupscope_config::GroupscopeConfig;
use groupscope_core::{
    workspace_names, ApiToken, GroupscopeError, GroupscopeResult, NamedField, RequestContext,
    TeamLicense, User, Workspace, WorkspaceGroup,
};
use groupscope_resolver::{
    build_tree, GroupAccess, GroupHierarchy, GroupNode, PermissionResolver, UserWorkspace,
};
use groupscope_upstream::{CollectionSource, UpstreamClient};

use crate::views::{FieldFilter, TeamRoleStats, WorkspaceRef, WorkspaceUser, WorkspaceUserStats};

/// Workspaces, fields, users and permissions for one API token.
///
/// Every query first makes sure the snapshot is fresh, then answers from it.
/// Queries that need data the snapshot does not hold (a workspace's own
/// permission map, a name search) go to the upstream API directly.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use groupscope::Directory;
/// use groupscope_cache::CacheConfig;
/// use groupscope_core::{ApiToken, RequestContext};
/// use groupscope_upstream::MemorySource;
///
/// # tokio_test::block_on(async {
/// let directory = Directory::new(
///     Arc::new(MemorySource::from_fixtures()),
///     ApiToken::new("token").unwrap(),
///     CacheConfig::default(),
/// );
/// let users = directory.list_users(&RequestContext::new()).await.unwrap();
/// assert_eq!(users[0].full_name, "Ada Lovelace");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Directory<S> {
    cache: SnapshotCache<S>,
}

impl Directory<UpstreamClient> {
    /// A directory talking to the API described by `config`.
    pub fn connect(config: &GroupscopeConfig, token: ApiToken) -> GroupscopeResult<Self> {
        let client = UpstreamClient::new(&config.upstream)?;
        Ok(Self::new(client, token, CacheConfig::from(&config.cache)))
    }
}

impl<S> Directory<S>
where
    S: CollectionSource + 'static,
{
    /// A directory over `source` with an empty cache.
    pub fn new(source: S, token: ApiToken, config: CacheConfig) -> Self {
        Self {
            cache: SnapshotCache::new(source, token, config),
        }
    }

    /// The snapshot cache.
    pub const fn cache(&self) -> &SnapshotCache<S> {
        &self.cache
    }

    /// Workspaces annotated with their group id and name.
    pub async fn list_workspaces(&self, ctx: &RequestContext) -> GroupscopeResult<Vec<Workspace>> {
        let snapshot = self.cache.ensure_fresh(ctx).await?;
        Ok(GroupHierarchy::new(&snapshot.groups).annotate_workspaces(&snapshot.workspaces))
    }

    /// Fields passing `filter`, with the names of their workspaces.
    pub async fn list_fields(
        &self,
        ctx: &RequestContext,
        filter: &FieldFilter,
    ) -> GroupscopeResult<Vec<NamedField>> {
        let snapshot = self.cache.ensure_fresh(ctx).await?;
        let names = workspace_names(&snapshot.workspaces);
        Ok(snapshot
            .fields
            .iter()
            .filter(|field| filter.matches(field))
            .map(|field| NamedField::resolve(field.clone(), &names))
            .collect())
    }

    /// Team members sorted case-insensitively by display name.
    pub async fn list_users(&self, ctx: &RequestContext) -> GroupscopeResult<Vec<User>> {
        let snapshot = self.cache.ensure_fresh(ctx).await?;
        let mut users = snapshot.users.clone();
        users.sort_by_cached_key(|user| user.full_name.to_lowercase());
        Ok(users)
    }

    /// One team member.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: &str) -> GroupscopeResult<User> {
        GroupscopeError::require("user id", user_id)?;
        let snapshot = self.cache.ensure_fresh(ctx).await?;
        snapshot
            .users
            .iter()
            .find(|user| user.user_id == user_id)
            .cloned()
            .ok_or_else(|| GroupscopeError::not_found("user", user_id))
    }

    /// Holders of explicit grants on a workspace, sorted by name.
    ///
    /// The permission map is read from the live workspace record. Grant
    /// holders missing from the user list are reported as
    /// [`UNKNOWN_USER`](crate::UNKNOWN_USER).
    pub async fn get_workspace_users(
        &self,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> GroupscopeResult<Vec<WorkspaceUser>> {
        GroupscopeError::require("workspace id", workspace_id)?;
        let (snapshot, workspace) = tokio::try_join!(
            self.cache.ensure_fresh(ctx),
            self.cache
                .source()
                .fetch_workspace(self.cache.token(), ctx, workspace_id),
        )?;

        let mut users: Vec<WorkspaceUser> = workspace
            .permissions()
            .iter()
            .map(|(user_id, permission)| {
                let user = snapshot.users.iter().find(|u| u.user_id == user_id);
                if user.is_none() {
                    tracing::debug!(
                        workspace_id,
                        user_id,
                        "grant holder is not a team member"
                    );
                }
                WorkspaceUser::resolve(user_id, permission, user)
            })
            .collect();
        users.sort_by(|a, b| {
            a.full_name
                .to_lowercase()
                .cmp(&b.full_name.to_lowercase())
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(users)
    }

    /// Grant counts on a workspace.
    pub async fn get_workspace_user_stats(
        &self,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> GroupscopeResult<WorkspaceUserStats> {
        let users = self.get_workspace_users(ctx, workspace_id).await?;
        Ok(WorkspaceUserStats::from_users(&users))
    }

    /// Workspaces where the user holds an explicit grant.
    pub async fn get_user_workspaces(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> GroupscopeResult<Vec<UserWorkspace>> {
        GroupscopeError::require("user id", user_id)?;
        let snapshot = self.cache.ensure_fresh(ctx).await?;
        let workspaces =
            PermissionResolver::new(&snapshot.groups, &snapshot.workspaces).user_workspaces(user_id);
        tracing::debug!(user_id, count = workspaces.len(), "resolved user workspaces");
        Ok(workspaces)
    }

    /// Every group with the user's effective permission, including inherited
    /// group defaults.
    pub async fn get_user_group_access(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> GroupscopeResult<Vec<GroupAccess>> {
        GroupscopeError::require("user id", user_id)?;
        let snapshot = self.cache.ensure_fresh(ctx).await?;
        let access = PermissionResolver::new(&snapshot.groups, &snapshot.workspaces)
            .user_group_access(user_id);
        tracing::debug!(user_id, groups = access.len(), "resolved user group access");
        Ok(access)
    }

    /// [`get_user_group_access`](Self::get_user_group_access) nested into a
    /// name-sorted tree.
    pub async fn get_user_group_tree(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> GroupscopeResult<Vec<GroupNode<GroupAccess>>> {
        let access = self.get_user_group_access(ctx, user_id).await?;
        Ok(build_tree(access))
    }

    /// Immediate children of every group, keyed by parent id (`root` for
    /// top-level groups).
    pub async fn workspace_hierarchy(
        &self,
        ctx: &RequestContext,
    ) -> GroupscopeResult<BTreeMap<String, Vec<WorkspaceGroup>>> {
        let snapshot = self.cache.ensure_fresh(ctx).await?;
        Ok(GroupHierarchy::new(&snapshot.groups).children_by_parent())
    }

    /// First workspace whose name contains `name`, case-insensitively.
    ///
    /// Surrounding double quotes are ignored. Searches the upstream API
    /// rather than the snapshot.
    pub async fn find_workspace_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> GroupscopeResult<WorkspaceRef> {
        let name = name.trim().trim_matches('"');
        GroupscopeError::require("workspace name", name)?;
        let found = self
            .cache
            .source()
            .search_workspaces_by_name(self.cache.token(), ctx, name)
            .await?;
        found
            .into_iter()
            .next()
            .map(|ws| WorkspaceRef {
                id: ws.id,
                alias: ws.alias,
            })
            .ok_or_else(|| GroupscopeError::not_found("workspace", name))
    }

    /// The field named `name`, ignoring case.
    pub async fn find_field_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> GroupscopeResult<NamedField> {
        let name = name.trim();
        GroupscopeError::require("field name", name)?;
        let wanted = name.to_lowercase();
        self.list_fields(ctx, &FieldFilter::default())
            .await?
            .into_iter()
            .find(|named| named.field.name.to_lowercase() == wanted)
            .ok_or_else(|| GroupscopeError::not_found("field", name))
    }

    /// License state and seat usage, read live from the upstream API.
    pub async fn team_license(&self, ctx: &RequestContext) -> GroupscopeResult<TeamLicense> {
        self.cache
            .source()
            .fetch_team_license(self.cache.token(), ctx)
            .await
    }

    /// Team members by role.
    ///
    /// Counts the cached users. When the user list is empty or cannot be
    /// loaded, the counts come from the license's used seats instead; if
    /// that fails too, the user list error is returned.
    pub async fn team_role_stats(&self, ctx: &RequestContext) -> GroupscopeResult<TeamRoleStats> {
        let users_err = match self.cache.ensure_fresh(ctx).await {
            Ok(snapshot) if !snapshot.users.is_empty() => {
                return Ok(TeamRoleStats::from_users(&snapshot.users));
            }
            Ok(_) => None,
            Err(err) if err.is_cancellation() => return Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "user list unavailable, counting license seats");
                Some(err)
            }
        };

        match self.team_license(ctx).await {
            Ok(license) => Ok(TeamRoleStats::from_seats(license.seats())),
            Err(err) => Err(users_err.unwrap_or(err)),
        }
    }
}
