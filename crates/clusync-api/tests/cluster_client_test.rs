#![allow(clippy::unwrap_used)]
// Integration tests for `ClusterClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clusync_api::models::{NfsExportSpec, UserSpec};
use clusync_api::{ClusterClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ClusterClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ClusterClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

/// A client that already holds the bearer token `tok`.
async fn logged_in() -> (MockServer, ClusterClient) {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/session/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bearer_token": "tok"})))
        .mount(&server)
        .await;

    let secret: SecretString = "pw".to_string().into();
    client.login("admin", &secret).await.unwrap();
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/session/login"))
        .and(body_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bearer_token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let secret: SecretString = "secret".to_string().into();
    client.login("admin", &secret).await.unwrap();
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/session/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let secret: SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_request_without_session() {
    let (_server, client) = setup().await;

    let result = client.list_users().await;
    assert!(matches!(result, Err(Error::SessionMissing)));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "name": "admin", "primary_group": "1", "uid": ""}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "admin");
}

// ── Path-addressed resources ────────────────────────────────────────

#[tokio::test]
async fn test_file_attributes_not_found() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/v1/files/%2Fmissing%2Fdir/info/attributes"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "description": "no such entry",
            "error_class": "fs_no_such_entry_error"
        })))
        .mount(&server)
        .await;

    let err = client.file_attributes("/missing/dir").await.unwrap_err();
    assert!(err.is_not_found(), "expected 404, got: {err:?}");
    assert_eq!(err.api_error_code(), Some("fs_no_such_entry_error"));
}

#[tokio::test]
async fn test_create_directory_payload() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/v1/files/%2Fmissing/entries/"))
        .and(body_json(json!({"name": "dir", "action": "CREATE_DIRECTORY"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "42", "path": "/missing/dir/", "name": "dir", "type": "FS_FILE_TYPE_DIRECTORY"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let attr = client.create_directory("/missing", "dir").await.unwrap();
    assert_eq!(attr.id, "42");
    assert_eq!(attr.file_type, "FS_FILE_TYPE_DIRECTORY");
}

// ── Exports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_export_allows_path_create() {
    let (server, client) = logged_in().await;

    let spec = NfsExportSpec {
        export_path: "/e1".into(),
        fs_path: "/d1".into(),
        description: String::new(),
        restrictions: vec![],
        fields_to_present_as_32_bit: vec![],
        tenant_id: Some(3),
    };

    Mock::given(method("POST"))
        .and(path("/v2/nfs/exports/"))
        .and(query_param("allow-fs-path-create", "true"))
        .and(body_json(json!({
            "export_path": "/e1",
            "fs_path": "/d1",
            "description": "",
            "restrictions": [],
            "fields_to_present_as_32_bit": [],
            "tenant_id": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5", "export_path": "/e1", "fs_path": "/d1", "tenant_id": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_nfs_export(&spec).await.unwrap();
    assert_eq!(created.id, "5");
}

#[tokio::test]
async fn test_replace_export_forbids_path_create() {
    let (server, client) = logged_in().await;

    let spec = NfsExportSpec {
        export_path: "/e1".into(),
        fs_path: "/d1".into(),
        description: "home".into(),
        restrictions: vec![],
        fields_to_present_as_32_bit: vec![],
        tenant_id: None,
    };

    Mock::given(method("PUT"))
        .and(path("/v2/nfs/exports/5"))
        .and(query_param("allow-fs-path-create", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.replace_nfs_export("5", &spec).await.unwrap();
}

#[tokio::test]
async fn test_get_export_by_path() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/v2/nfs/exports/%2Fe1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5", "export_path": "/e1", "fs_path": "/d1",
            "restrictions": [{"host_restrictions": [], "read_only": false}]
        })))
        .mount(&server)
        .await;

    let export = client.get_nfs_export("/e1").await.unwrap();
    assert_eq!(export.fs_path, "/d1");
    assert_eq!(export.restrictions.len(), 1);
    assert_eq!(export.tenant_id, None);
}

// ── Quotas ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_quota_status_follows_paging() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/v1/files/quotas/status/"))
        .and(query_param("limit", "1000"))
        .and(query_param("after", "q1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quotas": [{"id": "3", "path": "/b/", "limit": "200", "capacity_used": "0"}],
            "paging": {"next": ""}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/files/quotas/status/"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quotas": [{"id": "2", "path": "/a/", "limit": "100", "capacity_used": "0"}],
            "paging": {"next": "/v1/files/quotas/status/?limit=1000&after=q1"}
        })))
        .mount(&server)
        .await;

    let quotas = client.list_quota_status().await.unwrap();
    let paths: Vec<_> = quotas.iter().map(|q| q.path.as_str()).collect();
    assert_eq!(paths, vec!["/a/", "/b/"]);
    assert_eq!(quotas[1].limit, 200);
}

#[tokio::test]
async fn test_create_quota_sends_string_limit() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/v1/files/quotas/"))
        .and(body_json(json!({"id": "42", "limit": "100"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "42", "limit": "100"})))
        .expect(1)
        .mount(&server)
        .await;

    client.create_quota("42", 100).await.unwrap();
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_user_includes_password_modify_does_not() {
    let (server, client) = logged_in().await;

    let spec = UserSpec {
        name: "alice".into(),
        primary_group: "513".into(),
        uid: "1001".into(),
        home_directory: None,
    };

    Mock::given(method("POST"))
        .and(path("/v1/users/"))
        .and(body_json(json!({
            "name": "alice", "primary_group": "513", "uid": "1001",
            "home_directory": null, "password": "init"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "7", "name": "alice", "primary_group": "513", "uid": "1001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/users/7"))
        .and(body_json(json!({
            "id": "7", "name": "alice", "primary_group": "513", "uid": "1001",
            "home_directory": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let password: SecretString = "init".to_string().into();
    let user = client.add_user(&spec, &password).await.unwrap();
    client.modify_user(&user.id, &spec).await.unwrap();
}

// ── Tenants ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_tenants_unwraps_entries() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/v1/multitenancy/tenants/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"id": 1, "name": "Default"}, {"id": 4, "name": "eng"}]
        })))
        .mount(&server)
        .await;

    let tenants = client.list_tenants().await.unwrap();
    assert_eq!(tenants.len(), 2);
    assert_eq!(tenants[1].id, 4);
    assert_eq!(tenants[1].name, "eng");
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_session_expired() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/v1/time/settings"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.get_time_settings().await.unwrap_err();
    assert!(err.is_auth_expired(), "expected auth error, got: {err:?}");
}

#[tokio::test]
async fn test_api_error_plain_body() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/v2/ldap/settings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.get_ldap_settings().await.unwrap_err();
    match err {
        Error::Api { status, message, code } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
            assert_eq!(code, None);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
