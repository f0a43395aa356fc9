//! Router tests with in-memory secret and directory doubles.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use graphgate_api::{create_router, AppState};
use graphgate_core::{
    ClientCredentials, DirectoryClient, DirectoryClientFactory, DirectoryCollection,
    DirectoryConfig, DirectoryError, DirectoryObject, DirectoryQuery, Page, Result,
    SecretProvider, TenantId, GROUP_FIELDS, GROUP_ID_FIELDS, MEMBER_FIELDS,
};

const TENANT: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const NIL_TENANT: &str = "00000000-0000-0000-0000-000000000000";

// =============================================================================
// Test doubles
// =============================================================================

struct FakeSecrets {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl SecretProvider for FakeSecrets {
    async fn get_client_secret(&self) -> Result<SecretString> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DirectoryError::secret_error("vault unreachable"));
        }
        Ok(SecretString::from("test-secret".to_string()))
    }

    fn provider_type(&self) -> &'static str {
        "fake"
    }
}

#[derive(Default)]
struct Recorded {
    queries: Vec<(DirectoryCollection, DirectoryQuery)>,
    followed: Vec<String>,
    credentials: Vec<(TenantId, String, String)>,
}

/// Serves canned pages per collection; page `n` links to `{collection}:{n+1}`.
#[derive(Clone, Default)]
struct FakeDirectory {
    pages: Arc<HashMap<&'static str, Vec<Vec<DirectoryObject>>>>,
    failure: Option<String>,
    recorded: Arc<Mutex<Recorded>>,
}

fn collection_key(collection: &DirectoryCollection) -> &'static str {
    match collection {
        DirectoryCollection::Groups => "groups",
        DirectoryCollection::Users => "users",
        DirectoryCollection::GroupMembers { .. } => "members",
    }
}

impl FakeDirectory {
    fn with_pages(pages: Vec<(&'static str, Vec<Vec<DirectoryObject>>)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().collect()),
            ..Default::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn page(&self, key: &str, index: usize) -> Page<DirectoryObject> {
        let pages = self.pages.get(key).cloned().unwrap_or_default();
        let value = pages.get(index).cloned().unwrap_or_default();
        let next_link = (index + 1 < pages.len()).then(|| format!("{}:{}", key, index + 1));
        Page::new(value, next_link)
    }

    fn queries(&self) -> Vec<(DirectoryCollection, DirectoryQuery)> {
        self.recorded.lock().unwrap().queries.clone()
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn query(
        &self,
        collection: &DirectoryCollection,
        query: &DirectoryQuery,
    ) -> Result<Page<DirectoryObject>> {
        self.recorded
            .lock()
            .unwrap()
            .queries
            .push((collection.clone(), query.clone()));
        if let Some(message) = &self.failure {
            return Err(DirectoryError::GraphApi {
                code: "Request_BadRequest".to_string(),
                message: message.clone(),
            });
        }
        Ok(self.page(collection_key(collection), 0))
    }

    async fn next_page(
        &self,
        next_link: &str,
        _query: &DirectoryQuery,
    ) -> Result<Page<DirectoryObject>> {
        self.recorded
            .lock()
            .unwrap()
            .followed
            .push(next_link.to_string());
        let (key, index) = next_link.split_once(':').unwrap();
        Ok(self.page(key, index.parse().unwrap()))
    }
}

struct FakeFactory {
    directory: FakeDirectory,
}

impl DirectoryClientFactory for FakeFactory {
    fn create(&self, credentials: ClientCredentials) -> Result<Box<dyn DirectoryClient>> {
        self.directory.recorded.lock().unwrap().credentials.push((
            credentials.tenant_id,
            credentials.client_id.clone(),
            credentials.client_secret.expose_secret().to_string(),
        ));
        Ok(Box::new(self.directory.clone()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

struct TestApp {
    router: Router,
    directory: FakeDirectory,
    secrets: Arc<FakeSecrets>,
}

fn app_with(directory: FakeDirectory, secret_fails: bool) -> TestApp {
    let secrets = Arc::new(FakeSecrets {
        fail: secret_fails,
        calls: AtomicUsize::new(0),
    });
    let state = AppState::new(
        DirectoryConfig::new("graphgate-app", "contoso-kv", "graph-client-secret"),
        secrets.clone(),
        Arc::new(FakeFactory {
            directory: directory.clone(),
        }),
    );
    TestApp {
        router: create_router(state),
        directory,
        secrets,
    }
}

fn app(directory: FakeDirectory) -> TestApp {
    app_with(directory, false)
}

async fn post(router: &Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    post(router, uri, body.to_string()).await
}

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

fn as_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn group(id: &str, name: &str) -> DirectoryObject {
    DirectoryObject {
        id: id.to_string(),
        display_name: Some(name.to_string()),
        description: Some(format!("{} group", name)),
        mail: Some(format!("{}@contoso.com", name.to_lowercase())),
        ..Default::default()
    }
}

fn user(id: &str, name: &str) -> DirectoryObject {
    DirectoryObject {
        id: id.to_string(),
        odata_type: Some("#microsoft.graph.user".to_string()),
        display_name: Some(name.to_string()),
        user_principal_name: Some(format!("{}@contoso.com", name.replace(' ', "."))),
        mail: Some(format!("{}@contoso.com", name.replace(' ', "."))),
        ..Default::default()
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_liveness() {
    let app = app(FakeDirectory::default());
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(as_json(&bytes), json!({"status": "alive"}));
}

// =============================================================================
// List groups
// =============================================================================

#[tokio::test]
async fn test_list_groups_end_to_end() {
    let app = app(FakeDirectory::with_pages(vec![(
        "groups",
        vec![
            vec![group("0b1d6a53-90f4-4f0e-9a55-4a3f7d5a2a10", "Sales East")],
            vec![group("6e7b768e-07e2-4810-8459-485f84f8f204", "Sales West")],
        ],
    )]));

    let (status, body) = post_json(
        &app.router,
        "/api/groups",
        json!({"TenantUId": TENANT, "GroupType": "O365Group", "SearchString": "Sales"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "0b1d6a53-90f4-4f0e-9a55-4a3f7d5a2a10");
    assert_eq!(items[0]["displayName"], "Sales East");
    assert_eq!(items[0]["email"], "sales east@contoso.com");
    assert_eq!(items[1]["displayName"], "Sales West");

    let queries = app.directory.queries();
    assert_eq!(queries.len(), 1);
    let (collection, query) = &queries[0];
    assert_eq!(*collection, DirectoryCollection::Groups);
    assert_eq!(
        query.filter.as_str(),
        "groupTypes/any(c: c eq 'Unified') and startsWith(displayName, 'sales')"
    );
    assert_eq!(query.top, Some(60));
    assert_eq!(query.select, GROUP_FIELDS);
    assert!(query.count);
    assert!(query.eventual_consistency);

    let recorded = app.directory.recorded.lock().unwrap();
    assert_eq!(recorded.followed, vec!["groups:1"]);
    assert_eq!(
        recorded.credentials,
        vec![(
            TENANT.parse().unwrap(),
            "graphgate-app".to_string(),
            "test-secret".to_string()
        )]
    );
}

#[tokio::test]
async fn test_list_groups_security_with_row_count() {
    let app = app(FakeDirectory::default());

    let (status, body) = post_json(
        &app.router,
        "/api/groups",
        json!({"tenantId": TENANT, "groupType": "SecurityGroup", "maxRowCount": 25}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"items": []}));

    let (_, query) = &app.directory.queries()[0];
    assert_eq!(
        query.filter.as_str(),
        "mailEnabled eq false and securityEnabled eq true"
    );
    assert_eq!(query.top, Some(25));
}

#[tokio::test]
async fn test_list_groups_malformed_body_returns_empty_items() {
    let app = app(FakeDirectory::default());

    let (status, body) = post(&app.router, "/api/groups", "{not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"items": []}));
    assert_eq!(app.secrets.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_list_groups_upstream_failure_returns_empty_items() {
    let app = app(FakeDirectory::failing("Unsupported Query."));

    let (status, body) = post_json(&app.router, "/api/groups", json!({"tenantId": TENANT})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"items": []}));
}

#[tokio::test]
async fn test_list_groups_malformed_id_returns_empty_items() {
    let app = app(FakeDirectory::with_pages(vec![(
        "groups",
        vec![vec![
            group("0b1d6a53-90f4-4f0e-9a55-4a3f7d5a2a10", "Good"),
            group("not-a-guid", "Broken"),
        ]],
    )]));

    let (status, body) = post_json(&app.router, "/api/groups", json!({"tenantId": TENANT})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"items": []}));
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_nil_tenant_rejected_on_every_route() {
    let app = app(FakeDirectory::default());

    for uri in [
        "/api/groups",
        "/api/group",
        "/api/groupmembers",
        "/api/users",
        "/api/user",
    ] {
        let (status, body) =
            post_json(&app.router, uri, json!({"tenantId": NIL_TENANT, "searchString": "x"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(as_text(&body), "Invalid Tenant Id");
    }

    // a missing tenant is the nil tenant
    let (status, _) = post_json(&app.router, "/api/users", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.secrets.calls.load(Ordering::SeqCst), 0);
    assert!(app.directory.queries().is_empty());
}

#[tokio::test]
async fn test_lookup_search_validation() {
    let app = app(FakeDirectory::default());

    for uri in ["/api/group", "/api/groupmembers", "/api/user"] {
        let (status, body) =
            post_json(&app.router, uri, json!({"tenantId": TENANT, "searchString": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            as_text(&body),
            "Invalid SearchString Parameter: The SearchString parameter cannot be empty."
        );

        let (status, body) = post_json(
            &app.router,
            uri,
            json!({"tenantId": TENANT, "searchString": "a".repeat(257)}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            as_text(&body),
            "Invalid SearchString Parameter: The SearchString parameter must be 256 Characters or less."
        );
    }

    assert_eq!(app.secrets.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Get group
// =============================================================================

#[tokio::test]
async fn test_get_group_single_match() {
    let app = app(FakeDirectory::with_pages(vec![(
        "groups",
        vec![vec![group("3fa85f64-5717-4562-b3fc-2c963f66afa6", "Engineering")]],
    )]));

    let (status, body) = post_json(
        &app.router,
        "/api/group",
        json!({"tenantId": TENANT, "groupType": "SecurityGroup", "searchString": " Engineering "}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        json!({
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "displayName": "Engineering",
            "email": "engineering@contoso.com",
            "description": "Engineering group"
        })
    );

    let (_, query) = &app.directory.queries()[0];
    assert_eq!(
        query.filter.as_str(),
        "mailEnabled eq false and securityEnabled eq true and displayName eq 'engineering'"
    );
    assert_eq!(query.top, None);
}

#[tokio::test]
async fn test_get_group_ambiguous_is_not_found() {
    let app = app(FakeDirectory::with_pages(vec![(
        "groups",
        vec![vec![
            group("0b1d6a53-90f4-4f0e-9a55-4a3f7d5a2a10", "Eng"),
            group("6e7b768e-07e2-4810-8459-485f84f8f204", "Eng"),
        ]],
    )]));

    let (status, body) = post_json(
        &app.router,
        "/api/group",
        json!({"tenantId": TENANT, "searchString": "eng"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(as_text(&body), "No matching group was found.");
}

#[tokio::test]
async fn test_get_group_malformed_body_is_internal_error() {
    let app = app(FakeDirectory::default());

    let (status, body) = post(&app.router, "/api/group", "").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(as_json(&body)["statusCode"], 500);
}

#[tokio::test]
async fn test_get_group_secret_failure_is_internal_error() {
    let app = app_with(FakeDirectory::default(), true);

    let (status, body) = post_json(
        &app.router,
        "/api/group",
        json!({"tenantId": TENANT, "searchString": "eng"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = as_json(&body);
    assert_eq!(body["statusCode"], 500);
    assert!(body["message"].as_str().unwrap().contains("vault unreachable"));
    assert!(app.directory.recorded.lock().unwrap().credentials.is_empty());
}

// =============================================================================
// Group members
// =============================================================================

#[tokio::test]
async fn test_group_members_lists_users_only() {
    let nested_group = DirectoryObject {
        odata_type: Some("#microsoft.graph.group".to_string()),
        ..group("9d8c2f7a-1b3e-4c5d-8e9f-0a1b2c3d4e5f", "Nested")
    };
    let app = app(FakeDirectory::with_pages(vec![
        (
            "groups",
            vec![vec![DirectoryObject {
                id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string(),
                ..Default::default()
            }]],
        ),
        (
            "members",
            vec![
                vec![user("6e7b768e-07e2-4810-8459-485f84f8f204", "Adele Vance"), nested_group],
                vec![user("0b1d6a53-90f4-4f0e-9a55-4a3f7d5a2a10", "Alex Wilber")],
            ],
        ),
    ]));

    let (status, body) = post_json(
        &app.router,
        "/api/groupmembers",
        json!({"TenantUId": TENANT, "GroupType": "O365Group", "SearchString": "Retail"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["displayName"], "Adele Vance");
    assert_eq!(items[0]["upn"], "Adele.Vance@contoso.com");
    assert_eq!(items[1]["displayName"], "Alex Wilber");

    let queries = app.directory.queries();
    assert_eq!(queries.len(), 2);

    let (collection, query) = &queries[0];
    assert_eq!(*collection, DirectoryCollection::Groups);
    assert_eq!(
        query.filter.as_str(),
        "groupTypes/any(c: c eq 'Unified') and displayName eq 'retail'"
    );
    assert_eq!(query.select, GROUP_ID_FIELDS);

    let (collection, query) = &queries[1];
    assert_eq!(
        *collection,
        DirectoryCollection::GroupMembers {
            group_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string()
        }
    );
    assert_eq!(query.top, Some(100));
    assert_eq!(query.select, MEMBER_FIELDS);
    assert!(query.filter.is_empty());
}

#[tokio::test]
async fn test_group_members_requires_exactly_one_group() {
    let app = app(FakeDirectory::with_pages(vec![(
        "groups",
        vec![vec![
            group("0b1d6a53-90f4-4f0e-9a55-4a3f7d5a2a10", "Eng"),
            group("6e7b768e-07e2-4810-8459-485f84f8f204", "Eng"),
        ]],
    )]));

    let (status, body) = post_json(
        &app.router,
        "/api/groupmembers",
        json!({"tenantId": TENANT, "searchString": "eng"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(as_text(&body), "No matching group was found.");
    assert_eq!(app.directory.queries().len(), 1);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_list_users_without_search() {
    let app = app(FakeDirectory::with_pages(vec![(
        "users",
        vec![vec![
            user("6e7b768e-07e2-4810-8459-485f84f8f204", "Adele Vance"),
            user("0b1d6a53-90f4-4f0e-9a55-4a3f7d5a2a10", "Alex Wilber"),
        ]],
    )]));

    let (status, body) = post_json(
        &app.router,
        "/api/users",
        json!({"tenantId": TENANT, "maxRowCount": 0, "searchString": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["items"].as_array().unwrap().len(), 2);

    let (collection, query) = &app.directory.queries()[0];
    assert_eq!(*collection, DirectoryCollection::Users);
    assert!(query.filter.is_empty());
    assert_eq!(query.top, Some(60));
    assert!(query.select.is_empty());
}

#[tokio::test]
async fn test_get_user() {
    let app = app(FakeDirectory::with_pages(vec![(
        "users",
        vec![vec![user("6e7b768e-07e2-4810-8459-485f84f8f204", "Adele Vance")]],
    )]));

    let (status, body) = post_json(
        &app.router,
        "/api/user",
        json!({"tenantId": TENANT, "searchString": "Adele Vance"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    assert_eq!(body["id"], "6e7b768e-07e2-4810-8459-485f84f8f204");
    assert_eq!(body["upn"], "Adele.Vance@contoso.com");
    assert_eq!(body["email"], "Adele.Vance@contoso.com");

    let (_, query) = &app.directory.queries()[0];
    assert_eq!(query.filter.as_str(), "displayName eq 'adele vance'");
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = app(FakeDirectory::default());

    let (status, body) = post_json(
        &app.router,
        "/api/user",
        json!({"tenantId": TENANT, "searchString": "nobody"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(as_text(&body), "No matching user was found.");
}

#[tokio::test]
async fn test_get_user_malformed_id_is_internal_error() {
    let app = app(FakeDirectory::with_pages(vec![(
        "users",
        vec![vec![user("not-a-guid", "Broken")]],
    )]));

    let (status, body) = post_json(
        &app.router,
        "/api/user",
        json!({"tenantId": TENANT, "searchString": "broken"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(as_json(&body)["statusCode"], 500);
}

#[tokio::test]
async fn test_get_user_upstream_failure_is_internal_error() {
    let app = app(FakeDirectory::failing("Unsupported Query."));

    let (status, body) = post_json(
        &app.router,
        "/api/user",
        json!({"tenantId": TENANT, "searchString": "adele"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(as_json(&body)["message"]
        .as_str()
        .unwrap()
        .contains("Unsupported Query."));
}
