//! Gateway behaviour against a mock upstream.

use groupscope_core::{
    ApiToken, ErrorCategory, GroupscopeError, Permission, RequestContext, UserRole,
    WorkspaceNames,
};
use groupscope_upstream::{CollectionSource, UpstreamClient};
use mockito::{Matcher, Server};
use serde_json::json;

fn token() -> ApiToken {
    ApiToken::new("test-key").unwrap()
}

#[tokio::test]
async fn fetch_users_sends_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/team/users")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"userId": "u-1", "fullName": "Ada", "email": "ada@example.com", "role": "admin"},
                {"userId": "u-2", "fullName": "Grace", "email": "grace@example.com", "role": "editor",
                 "state": {"pending": true}}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let users = client
        .fetch_users(&token(), &RequestContext::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(users.len(), 2);
    assert!(users[1].is_pending());
}

#[tokio::test]
async fn fetch_workspaces_posts_search_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/workspaces/search")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "sort": {"type": "name", "name": {"direction": "asc"}},
            "archived": false
        })))
        .with_status(200)
        .with_body(
            json!({
                "items": [{"id": "w-1", "name": "Roadmap",
                           "_embedded": {"permissions": {"u-1": "write"}}}],
                "totalItems": 1
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let workspaces = client
        .fetch_workspaces(&token(), &RequestContext::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0].explicit_permission("u-1"), Some(Permission::Write));
}

#[tokio::test]
async fn fetch_groups_and_fields() {
    let mut server = Server::new_async().await;
    let _groups = server
        .mock("POST", "/workspaces/groups/search")
        .match_body(Matcher::Json(json!({"sort": {"type": "name", "direction": "asc"}})))
        .with_body(
            json!({"items": [{"id": "g-1", "name": "Product", "defaultPermission": "read"}],
                   "totalItems": 1})
            .to_string(),
        )
        .create_async()
        .await;
    let _fields = server
        .mock("POST", "/fields/search")
        .match_body(Matcher::Json(json!({})))
        .with_body(
            json!({"items": [{"id": "f-1", "name": "Priority", "isTeamField": true,
                              "_embedded": {"allWorkspaceIds": ["w-1", "w-2"]}}],
                   "totalItems": 1})
            .to_string(),
        )
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let ctx = RequestContext::new();

    let groups = client.fetch_workspace_groups(&token(), &ctx).await.unwrap();
    assert_eq!(groups[0].default_permission, Some(Permission::Read));

    let names: WorkspaceNames = [("w-2".to_string(), "Discovery".to_string())].into();
    let fields = client
        .search_fields_with_names(&token(), &ctx, &names)
        .await
        .unwrap();
    assert_eq!(fields[0].workspace_count(), 2);
    assert_eq!(fields[0].workspace_names, vec!["Discovery"]);
}

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/team/users")
        .with_status(401)
        .with_body("invalid api key")
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let err = client
        .fetch_users(&token(), &RequestContext::new())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Upstream);
    assert_eq!(err.upstream_status(), Some(401));
    assert!(err.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/workspaces/search")
        .with_status(200)
        .with_body(r#"{"items": "nope"}"#)
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let err = client
        .fetch_workspaces(&token(), &RequestContext::new())
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Decode);
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let client = UpstreamClient::with_base_url("http://127.0.0.1:9").unwrap();
    let err = client
        .fetch_users(&token(), &RequestContext::new())
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Transport);
}

#[tokio::test]
async fn fetch_workspace_by_id() {
    let mut server = Server::new_async().await;
    let _found = server
        .mock("GET", "/workspaces/w-1")
        .with_body(
            json!({"id": "w-1", "name": "Roadmap",
                   "_embedded": {"permissions": {"u-1": "full", "u-x": "comment"}}})
            .to_string(),
        )
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/workspaces/w-404")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let ctx = RequestContext::new();

    let workspace = client.fetch_workspace(&token(), &ctx, "w-1").await.unwrap();
    assert_eq!(workspace.permissions().len(), 2);

    let err = client
        .fetch_workspace(&token(), &ctx, "w-404")
        .await
        .unwrap_err();
    assert_eq!(err, GroupscopeError::not_found("workspace", "w-404"));

    let err = client.fetch_workspace(&token(), &ctx, " ").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn search_by_name_sends_filter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/workspaces/search")
        .match_body(Matcher::PartialJson(json!({
            "filter": {"type": "name", "mode": "contain", "text": "road", "caseSensitive": false}
        })))
        .with_body(json!({"items": [{"id": "w-1", "name": "Roadmap", "alias": "RM"}],
                          "totalItems": 1}).to_string())
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let found = client
        .search_workspaces_by_name(&token(), &RequestContext::new(), "road")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(found[0].alias.as_deref(), Some("RM"));
}

#[tokio::test]
async fn cancelled_context_aborts_call() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/team/users")
        .with_body("[]")
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = client.fetch_users(&token(), &ctx).await.unwrap_err();
    assert!(err.is_cancellation());
}

#[tokio::test]
async fn fetch_team_license_reads_seats() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/team")
        .match_header("authorization", "Bearer test-key")
        .with_body(
            json!({
                "teamId": "t-1",
                "name": "Acme",
                "state": {
                    "features": [],
                    "seats": {
                        "admin": {"total": 2, "used": 1, "free": 1},
                        "editor": {"total": 5, "used": 5, "free": 0},
                        "contributor": {"total": 10, "used": 2, "free": 8},
                        "any": {"total": 17, "used": 8, "free": 9}
                    },
                    "subscription": {"type": "enterprise"}
                },
                "flags": {"enableAi": {"value": true, "enforced": true, "explicit": false}}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let license = client
        .fetch_team_license(&token(), &RequestContext::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(license.team_id, "t-1");
    assert_eq!(license.seats().any.used, 8);
    assert_eq!(license.seats().editor.free, 0);
    assert!(license.flag("enableAi"));
}

#[tokio::test]
async fn users_with_mixed_case_roles() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/team/users")
        .with_body(
            json!([
                {"userId": "a", "role": "Admin"},
                {"userId": "b", "role": "EDITOR"},
                {"userId": "c", "role": "owner"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = UpstreamClient::with_base_url(server.url()).unwrap();
    let users = client
        .fetch_users(&token(), &RequestContext::new())
        .await
        .unwrap();

    assert_eq!(users[0].role, UserRole::Admin);
    assert_eq!(users[1].role, UserRole::Editor);
    assert_eq!(users[2].role.as_str(), "owner");
}
