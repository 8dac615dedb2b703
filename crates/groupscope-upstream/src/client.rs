//! HTTP client for the upstream API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use groupscope_config::UpstreamSettings;
use groupscope_core::{
    ApiToken, Field, GroupscopeError, GroupscopeResult, NamedField, RequestContext, TeamLicense,
    User, Workspace, WorkspaceGroup, WorkspaceNames,
};
use groupscope_telemetry::metrics;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::query::{FieldSearchQuery, GroupSearchQuery, SearchPage, WorkspaceSearchQuery};
use crate::source::CollectionSource;

/// Authenticated client for the upstream API.
///
/// Holds no credentials: the token is supplied with every call. Cloning is
/// cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    /// HTTP client.
    client: Client,
    /// API root without a trailing slash.
    base_url: String,
}

impl UpstreamClient {
    /// Create a client from upstream settings.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the TLS backend cannot be initialised.
    pub fn new(settings: &UpstreamSettings) -> GroupscopeResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| GroupscopeError::transport("create http client", e))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// See [`UpstreamClient::new`].
    pub fn with_base_url(base_url: impl Into<String>) -> GroupscopeResult<Self> {
        let settings = UpstreamSettings {
            base_url: base_url.into(),
            ..UpstreamSettings::default()
        };
        Self::new(&settings)
    }

    /// Get the API root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every field and decorate it with workspace names from `names`.
    ///
    /// # Errors
    ///
    /// Same as [`CollectionSource::fetch_fields`].
    pub async fn search_fields_with_names(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
        names: &WorkspaceNames,
    ) -> GroupscopeResult<Vec<NamedField>> {
        let fields = self.fetch_fields(token, ctx).await?;
        Ok(fields
            .into_iter()
            .map(|field| NamedField::resolve(field, names))
            .collect())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> GroupscopeResult<RequestBuilder> {
        let body = serde_json::to_vec(body)
            .map_err(|e| GroupscopeError::decode(format!("encode {path} body"), e))?;
        Ok(self
            .client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(body))
    }

    /// Send `request` and decode a JSON body, under `ctx`'s cancellation.
    async fn execute<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        operation: &str,
        request: RequestBuilder,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<T> {
        let started = Instant::now();
        let request = request.header(AUTHORIZATION, token.bearer());

        let result = ctx
            .run(operation, async {
                let response = request
                    .send()
                    .await
                    .map_err(|e| GroupscopeError::transport(operation, e))?;

                let status = response.status();
                let body = response
                    .text()
                    .await
                    .map_err(|e| GroupscopeError::transport(operation, e))?;

                if !status.is_success() {
                    return Err(GroupscopeError::upstream(operation, status.as_u16(), body));
                }

                serde_json::from_str(&body).map_err(|e| GroupscopeError::decode(operation, e))
            })
            .await;

        let elapsed = started.elapsed();
        record(collection, operation, ctx, &result, elapsed);
        result
    }
}

fn record<T>(
    collection: &'static str,
    operation: &str,
    ctx: &RequestContext,
    result: &GroupscopeResult<T>,
    elapsed: Duration,
) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(_) => {
            metrics::record_upstream_request(collection, "success", elapsed);
            tracing::debug!(
                request_id = %ctx.request_id(),
                collection,
                operation,
                duration_ms,
                "upstream call succeeded"
            );
        }
        Err(err) => {
            metrics::record_upstream_request(collection, err.category().as_str(), elapsed);
            tracing::debug!(
                request_id = %ctx.request_id(),
                collection,
                operation,
                duration_ms,
                status = err.upstream_status(),
                error = %err,
                "upstream call failed"
            );
        }
    }
}

#[async_trait]
impl CollectionSource for UpstreamClient {
    async fn fetch_users(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<User>> {
        self.execute("users", "list users", self.get("/team/users"), token, ctx)
            .await
    }

    async fn fetch_workspaces(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<Workspace>> {
        let request = self.post("/workspaces/search", &WorkspaceSearchQuery::all())?;
        let page: SearchPage<Workspace> = self
            .execute("workspaces", "list workspaces", request, token, ctx)
            .await?;
        Ok(page.items)
    }

    async fn fetch_workspace_groups(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<WorkspaceGroup>> {
        let request = self.post("/workspaces/groups/search", &GroupSearchQuery::default())?;
        let page: SearchPage<WorkspaceGroup> = self
            .execute("groups", "list workspace groups", request, token, ctx)
            .await?;
        Ok(page.items)
    }

    async fn fetch_fields(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<Vec<Field>> {
        let request = self.post("/fields/search", &FieldSearchQuery::default())?;
        let page: SearchPage<Field> = self
            .execute("fields", "list fields", request, token, ctx)
            .await?;
        Ok(page.items)
    }

    async fn fetch_workspace(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
        workspace_id: &str,
    ) -> GroupscopeResult<Workspace> {
        GroupscopeError::require("workspace id", workspace_id)?;
        let operation = format!("get workspace {workspace_id}");
        let request = self.get(&format!("/workspaces/{workspace_id}"));
        self.execute("workspace", &operation, request, token, ctx)
            .await
            .map_err(|err| match err.upstream_status() {
                Some(status) if status == StatusCode::NOT_FOUND.as_u16() => {
                    GroupscopeError::not_found("workspace", workspace_id)
                }
                _ => err,
            })
    }

    async fn search_workspaces_by_name(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
        name: &str,
    ) -> GroupscopeResult<Vec<Workspace>> {
        let request = self.post("/workspaces/search", &WorkspaceSearchQuery::by_name(name))?;
        let page: SearchPage<Workspace> = self
            .execute("workspaces", "search workspaces", request, token, ctx)
            .await?;
        Ok(page.items)
    }

    async fn fetch_team_license(
        &self,
        token: &ApiToken,
        ctx: &RequestContext,
    ) -> GroupscopeResult<TeamLicense> {
        self.execute("team", "get team license", self.get("/team"), token, ctx)
            .await
    }
}
