//! Integration tests for mutating operations
//!
//! Folder creation, upload, and permanent deletes.

use spconnector_core::domain::DomainError;
use spconnector_core::ports::ISiteDataContext;
use wiremock::matchers::{body_bytes, body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

fn folder_json(server_relative_url: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "Exists": true,
        "IsWOPIEnabled": false,
        "ItemCount": 0,
        "Name": name,
        "ProgID": null,
        "ServerRelativeUrl": server_relative_url,
        "TimeCreated": "2024-06-01T08:30:00Z",
        "TimeLastModified": "2024-06-01T08:30:00Z",
        "UniqueId": "b2f3c1d4-1111-4222-8333-444455556666",
        "WelcomePage": ""
    })
}

// ============================================================================
// Folder creation
// ============================================================================

#[tokio::test]
async fn test_create_folder_under_root() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path("/sites/X/_api/web/folders"))
        .and(header("accept", "application/json;odata=nometadata"))
        .and(body_json(serde_json::json!({"ServerRelativeUrl": "/sites/X/Docs/Reports"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(folder_json("/sites/X/Docs/Reports", "Reports")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let folder = site.create_folder("Reports").await.expect("create failed");
    assert_eq!(folder.server_relative_url, "/sites/X/Docs/Reports");
    assert_eq!(folder.name.as_deref(), Some("Reports"));
    assert_eq!(folder.exists, Some(true));
}

#[tokio::test]
async fn test_create_folder_in_parent() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path("/sites/X/_api/web/folders"))
        .and(body_json(serde_json::json!({"ServerRelativeUrl": "/sites/X/Docs/2024/Q1"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(folder_json("/sites/X/Docs/2024/Q1", "Q1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let folder = site.create_folder_in("2024", "Q1").await.unwrap();
    assert_eq!(folder.server_relative_url, "/sites/X/Docs/2024/Q1");
}

#[tokio::test]
async fn test_create_folder_accepts_verbose_envelope() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path("/sites/X/_api/web/folders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "d": folder_json("/sites/X/Docs/Verbose", "Verbose")
        })))
        .mount(&server)
        .await;

    let folder = site.create_folder("Verbose").await.unwrap();
    assert_eq!(folder.server_relative_url, "/sites/X/Docs/Verbose");
}

#[tokio::test]
async fn test_create_folder_malformed_answer() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path("/sites/X/_api/web/folders"))
        .respond_with(ResponseTemplate::new(201).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = site.create_folder("Broken").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidResponse(_)));
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_upload_file_always_overwrites() {
    let (server, site) = common::setup_site_mock().await;

    let content = b"quarterly numbers".to_vec();
    Mock::given(method("POST"))
        .and(path(
            "/sites/X/_api/web/GetFolderByServerRelativeUrl('/sites/X/Docs/Reports')/Files/add(overwrite=true,url='q1.txt')",
        ))
        .and(header("accept", "application/json;odata=nometadata"))
        .and(body_bytes(content.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "CheckInComment": "",
            "ETag": "\"{4E3B0A1C-0000-0000-0000-000000000000},1\"",
            "Exists": true,
            "Length": "17",
            "Name": "q1.txt",
            "ServerRelativeUrl": "/sites/X/Docs/Reports/q1.txt",
            "TimeCreated": "2024-06-01T08:30:00Z",
            "TimeLastModified": "2024-06-01T08:30:00Z",
            "UniqueId": "4e3b0a1c-0000-0000-0000-000000000000"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let first = site.upload_file("Reports", "q1.txt", &content).await.unwrap();
    let second = site
        .upload_file("Reports", "q1.txt", &content)
        .await
        .expect("re-uploading the same name must not conflict");

    assert_eq!(first.server_relative_url, "/sites/X/Docs/Reports/q1.txt");
    assert_eq!(first.length, Some(17));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_upload_file_missing_folder_is_not_found() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(
            "/sites/X/_api/web/GetFolderByServerRelativeUrl('/sites/X/Docs/Nope')/Files/add(overwrite=true,url='a.txt')",
        ))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(common::error_envelope("File Not Found.")),
        )
        .mount(&server)
        .await;

    let err = site.upload_file("Nope", "a.txt", b"x").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(ref m) if m == "File Not Found."));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_resource_sends_verb_override() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(common::resource_path("Reports")))
        .and(header("X-RequestDigest", "SHAREPOINT_FORM_DIGEST"))
        .and(header("IF-MATCH", "*"))
        .and(header("X-HTTP-Method", "DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(site.delete_resource("Reports").await.expect("delete failed"));
}

#[tokio::test]
async fn test_delete_file_targets_file_path() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(common::resource_path("Reports/q1.txt")))
        .and(header("X-HTTP-Method", "DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(site.delete_file("Reports", "q1.txt").await.unwrap());

    let requests = server.received_requests().await.expect("recording enabled");
    let delete = requests
        .iter()
        .find(|r| r.url.path().contains("_api/web"))
        .expect("delete request recorded");
    assert!(delete.body.is_empty());
}

#[tokio::test]
async fn test_delete_missing_resource_is_raised() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(common::resource_path("Missing")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(common::error_envelope("File Not Found.")),
        )
        .mount(&server)
        .await;

    let err = site.delete_resource("Missing").await.unwrap_err();
    assert!(err.is_not_found());
}
