//! In-memory collection source.
//!
//! Serves fixed collections without network access. Used by the cache and
//! facade tests, and handy for demos: calls are counted per collection, a
//! collection can be told to fail, and every call can be delayed to widen
//! race windows.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use groupscope_core::{
    fixtures, ApiToken, Field, GroupscopeError, GroupscopeResult, RequestContext, TeamLicense,
    User, Workspace, WorkspaceGroup,
};
use parking_lot::Mutex;

use crate::source::CollectionSource;

/// Upstream calls a [`MemorySource`] can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `fetch_users`.
    Users,
    /// `fetch_workspaces`.
    Workspaces,
    /// `fetch_workspace_groups`.
    Groups,
    /// `fetch_fields`.
    Fields,
    /// `fetch_workspace`.
    Workspace,
    /// `search_workspaces_by_name`.
    Search,
    /// `fetch_team_license`.
    License,
}

impl Collection {
    const ALL: [Self; 7] = [
        Self::Users,
        Self::Workspaces,
        Self::Groups,
        Self::Fields,
        Self::Workspace,
        Self::Search,
        Self::License,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Operation name used in errors.
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Users => "list users",
            Self::Workspaces => "list workspaces",
            Self::Groups => "list workspace groups",
            Self::Fields => "list fields",
            Self::Workspace => "get workspace",
            Self::Search => "search workspaces",
            Self::License => "get team license",
        }
    }
}

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    workspaces: Vec<Workspace>,
    groups: Vec<WorkspaceGroup>,
    fields: Vec<Field>,
    license: Option<TeamLicense>,
    failures: HashMap<Collection, GroupscopeError>,
    delay: Option<Duration>,
}

/// A [`CollectionSource`] backed by vectors.
#[derive(Debug, Default)]
pub struct MemorySource {
    state: Mutex<Collections>,
    calls: [AtomicUsize; Collection::ALL.len()],
}

impl MemorySource {
    /// An empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source serving the shared test team from
    /// [`groupscope_core::fixtures`].
    #[must_use]
    pub fn from_fixtures() -> Self {
        let source = Self::new();
        {
            let mut state = source.state.lock();
            state.users = fixtures::users();
            state.workspaces = fixtures::workspaces();
            state.groups = fixtures::groups();
            state.fields = fixtures::fields();
            state.license = Some(fixtures::team_license());
        }
        source
    }

    /// Replace the users.
    pub fn set_users(&self, users: Vec<User>) {
        self.state.lock().users = users;
    }

    /// Replace the workspaces.
    pub fn set_workspaces(&self, workspaces: Vec<Workspace>) {
        self.state.lock().workspaces = workspaces;
    }

    /// Replace the workspace groups.
    pub fn set_groups(&self, groups: Vec<WorkspaceGroup>) {
        self.state.lock().groups = groups;
    }

    /// Replace the fields.
    pub fn set_fields(&self, fields: Vec<Field>) {
        self.state.lock().fields = fields;
    }

    /// Replace the team license. `None` makes the call a not-found error.
    pub fn set_team_license(&self, license: Option<TeamLicense>) {
        self.state.lock().license = license;
    }

    /// Make every call for `collection` fail with `error`.
    pub fn fail(&self, collection: Collection, error: GroupscopeError) {
        self.state.lock().failures.insert(collection, error);
    }

    /// Stop failing.
    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Delay every call by `delay` before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state.lock().delay = delay;
    }

    /// Number of calls made for `collection`.
    pub fn calls(&self, collection: Collection) -> usize {
        self.calls[collection.index()].load(Ordering::SeqCst)
    }

    /// Number of calls across the four snapshot collections.
    pub fn snapshot_calls(&self) -> usize {
        [
            Collection::Users,
            Collection::Workspaces,
            Collection::Groups,
            Collection::Fields,
        ]
        .into_iter()
        .map(|c| self.calls(c))
        .sum()
    }

    async fn serve<T, F>(
        &self,
        collection: Collection,
        ctx: &RequestContext,
        read: F,
    ) -> GroupscopeResult<T>
    where
        F: FnOnce(&Collections) -> GroupscopeResult<T> + Send,
        T: Send,
    {
        self.calls[collection.index()].fetch_add(1, Ordering::SeqCst);
        let delay = self.state.lock().delay;

        ctx.run(collection.operation(), async {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let state = self.state.lock();
            if let Some(err) = state.failures.get(&collection) {
                return Err(err.clone());
            }
            read(&state)
        })
        .await
    }
}

#[async_trait]
impl CollectionSource for MemorySource {
    async fn fetch_users(
        &self,
        _token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<User>> {
        self.serve(Collection::Users, ctx, |s| Ok(s.users.clone()))
            .await
    }

    async fn fetch_workspaces(
        &self,
        _token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<Workspace>> {
        self.serve(Collection::Workspaces, ctx, |s| Ok(s.workspaces.clone()))
            .await
    }

    async fn fetch_workspace_groups(
        &self,
        _token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<WorkspaceGroup>> {
        self.serve(Collection::Groups, ctx, |s| Ok(s.groups.clone()))
            .await
    }

    async fn fetch_fields(
        &self,
        _token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<Field>> {
        self.serve(Collection::Fields, ctx, |s| Ok(s.fields.clone()))
            .await
    }

    async fn fetch_workspace(
        &self,
        _token: &ApiToken,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> GroupscopeResult<Workspace> {
        self.serve(Collection::Workspace, ctx, |s| {
            s.workspaces
                .iter()
                .find(|ws| ws.id == workspace_id)
                .cloned()
                .ok_or_else(|| GroupscopeError::not_found("workspace", workspace_id))
        })
        .await
    }

    async fn search_workspaces_by_name(
        &self,
        _token: &ApiToken,
        ctx: &RequestContext,
        name: &str,
    ) -> GroupscopeResult<Vec<Workspace>> {
        let needle = name.to_lowercase();
        self.serve(Collection::Search, ctx, move |s| {
            let mut found: Vec<Workspace> = s
                .workspaces
                .iter()
                .filter(|ws| !ws.archived && ws.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            found.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(found)
        })
        .await
    }

    async fn fetch_team_license(
        &self,
        _token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<TeamLicense> {
        self.serve(Collection::License, ctx, |s| {
            s.license
                .clone()
                .ok_or_else(|| GroupscopeError::not_found("team license", "team"))
        })
        .await
    }
}
