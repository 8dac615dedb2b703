//! The seam between the snapshot cache and the upstream API.

use std::sync::Arc;

use async_trait::async_trait;
use groupscope_core::{
    ApiToken, Field, GroupscopeResult, RequestContext, TeamLicense, User, Workspace,
    WorkspaceGroup,
};

/// Fetches the upstream collections.
///
/// Every call is idempotent, performs no caching and honours the
/// cancellation and deadline of `ctx`. [`crate::UpstreamClient`] is the HTTP
/// implementation; tests substitute in-memory sources.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// `GET /team/users`.
    async fn fetch_users(&self, token: &ApiToken, ctx: &RequestContext)
        -> GroupscopeResult<Vec<User>>;

    /// `POST /workspaces/search` for every non-archived workspace.
    async fn fetch_workspaces(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<Workspace>>;

    /// `POST /workspaces/groups/search`.
    async fn fetch_workspace_groups(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<WorkspaceGroup>>;

    /// `POST /fields/search` for every field.
    async fn fetch_fields(&self, token: &ApiToken, ctx: &RequestContext)
        -> GroupscopeResult<Vec<Field>>;

    /// `GET /workspaces/{id}`. An unknown id is a not-found error.
    async fn fetch_workspace(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> GroupscopeResult<Workspace>;

    /// `POST /workspaces/search` with a case-insensitive name filter.
    async fn search_workspaces_by_name(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
        name: &str,
    ) -> GroupscopeResult<Vec<Workspace>>;

    /// `GET /team`: license state and seat usage.
    async fn fetch_team_license(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<TeamLicense>;
}

#[async_trait]
impl<S> CollectionSource for Arc<S>
where
    S: CollectionSource + ?Sized,
{
    async fn fetch_users(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<User>> {
        (**self).fetch_users(token, ctx).await
    }

    async fn fetch_workspaces(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<Workspace>> {
        (**self).fetch_workspaces(token, ctx).await
    }

    async fn fetch_workspace_groups(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<WorkspaceGroup>> {
        (**self).fetch_workspace_groups(token, ctx).await
    }

    async fn fetch_fields(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<Field>> {
        (**self).fetch_fields(token, ctx).await
    }

    async fn fetch_workspace(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> GroupscopeResult<Workspace> {
        (**self).fetch_workspace(token, ctx, workspace_id).await
    }

    async fn search_workspaces_by_name(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
        name: &str,
    ) -> GroupscopeResult<Vec<Workspace>> {
        (**self).search_workspaces_by_name(token, ctx, name).await
    }

    async fn fetch_team_license(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<TeamLicense> {
        (**self).fetch_team_license(token, ctx).await
    }
}
