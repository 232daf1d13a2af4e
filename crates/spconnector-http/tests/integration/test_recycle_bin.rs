//! Integration tests for the recycle-bin workflows
//!
//! Delete-then-lookup and lookup-then-restore, each as two sequential
//! round trips against the mock site.

use spconnector_core::domain::{DomainError, RecycleBinId, RecycleBinItemState};
use spconnector_core::ports::ISiteDataContext;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{self, ITEM_ID};

fn item_id() -> RecycleBinId {
    ITEM_ID.parse().expect("valid test id")
}

fn recycle_path(relative: &str) -> String {
    format!("{}/recycle()", common::resource_path(relative))
}

fn lookup_path(id: &str) -> String {
    common::api_path(&format!("_api/web/recyclebin('{id}')"))
}

fn restore_path(id: &str) -> String {
    common::api_path(&format!("_api/web/recyclebin('{id}')/restore()"))
}

// ============================================================================
// Delete to recycle bin
// ============================================================================

#[tokio::test]
async fn test_delete_to_recycle_bin_returns_entry_with_same_id() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(recycle_path("Reports")))
        .and(header("X-HTTP-Method", "DELETE"))
        .and(header("IF-MATCH", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "odata.metadata": "https://contoso.sharepoint.com/_api/$metadata#Edm.Guid",
            "value": ITEM_ID
        })))
        .expect(1)
        .mount(&server)
        .await;
    common::mount_recycle_bin_entry(&server, ITEM_ID).await;

    let entry = site
        .delete_resource_to_recycle_bin_by_id("Reports")
        .await
        .expect("recycle failed")
        .expect("entry should be returned");

    assert_eq!(entry.id, item_id());
    assert_eq!(entry.item_state, Some(RecycleBinItemState::FirstStageRecycleBin));
    assert_eq!(entry.original_path().as_deref(), Some("/sites/X/Docs/Reports"));
    assert!(entry.is_restorable());
}

#[tokio::test]
async fn test_delete_to_recycle_bin_verbose_answers() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(recycle_path("Reports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "d": { "Recycle": ITEM_ID }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(lookup_path(ITEM_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "d": common::recycle_bin_entry(ITEM_ID)
        })))
        .mount(&server)
        .await;

    let entry = site
        .delete_resource_to_recycle_bin_by_id("Reports")
        .await
        .unwrap()
        .expect("entry should be returned");
    assert_eq!(entry.id, item_id());
}

#[tokio::test]
async fn test_delete_to_recycle_bin_nil_id_skips_lookup() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(recycle_path("Empty")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": "00000000-0000-0000-0000-000000000000"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(lookup_path("00000000-0000-0000-0000-000000000000")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = site.delete_resource_to_recycle_bin_by_id("Empty").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_delete_to_recycle_bin_missing_resource_is_none() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(recycle_path("Missing")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(common::error_envelope("File Not Found.")),
        )
        .mount(&server)
        .await;

    let result = site.delete_resource_to_recycle_bin_by_id("Missing").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_delete_to_recycle_bin_lookup_failure_is_raised() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("POST"))
        .and(path(recycle_path("Reports")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": ITEM_ID
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(lookup_path(ITEM_ID)))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(common::error_envelope("Lookup exploded")),
        )
        .mount(&server)
        .await;

    let err = site
        .delete_resource_to_recycle_bin_by_id("Reports")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InternalServerError(ref m) if m == "Lookup exploded"));
}

// ============================================================================
// Lookup
// ============================================================================

#[tokio::test]
async fn test_get_recycle_bin_resource_missing_is_none() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("GET"))
        .and(path(lookup_path(ITEM_ID)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let entry = site.get_recycle_bin_resource_by_id(item_id()).await.unwrap();
    assert!(entry.is_none());
}

#[tokio::test]
async fn test_get_recycle_bin_resource_uses_bare_profile() {
    let (server, site) = common::setup_site_mock().await;
    common::mount_recycle_bin_entry(&server, ITEM_ID).await;

    let entry = site.get_recycle_bin_resource_by_id(item_id()).await.unwrap();
    assert!(entry.is_some());

    let requests = server.received_requests().await.expect("recording enabled");
    let lookup = requests
        .iter()
        .find(|r| r.url.path() == lookup_path(ITEM_ID))
        .expect("lookup recorded");
    assert_eq!(
        lookup
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer test-access-token")
    );
    assert!(lookup.headers.get("x-http-method").is_none());
    assert!(lookup.headers.get("x-requestdigest").is_none());
    assert!(lookup.headers.get("binarystringrequestbody").is_none());
}

// ============================================================================
// Restore
// ============================================================================

#[tokio::test]
async fn test_restore_existing_item() {
    let (server, site) = common::setup_site_mock().await;
    common::mount_recycle_bin_entry(&server, ITEM_ID).await;

    Mock::given(method("POST"))
        .and(path(restore_path(ITEM_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let restored = site
        .restore_recycle_bin_resource_by_id(item_id())
        .await
        .expect("restore failed");
    assert_eq!(restored, Some(true));
}

#[tokio::test]
async fn test_restore_unknown_item_is_none() {
    let (server, site) = common::setup_site_mock().await;

    Mock::given(method("GET"))
        .and(path(lookup_path(ITEM_ID)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(restore_path(ITEM_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let restored = site.restore_recycle_bin_resource_by_id(item_id()).await.unwrap();
    assert!(restored.is_none());
}

#[tokio::test]
async fn test_restore_failure_is_raised() {
    let (server, site) = common::setup_site_mock().await;
    common::mount_recycle_bin_entry(&server, ITEM_ID).await;

    Mock::given(method("POST"))
        .and(path(restore_path(ITEM_ID)))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_request",
            "error_description": "Item is in the second-stage recycle bin"
        })))
        .mount(&server)
        .await;

    let err = site
        .restore_recycle_bin_resource_by_id(item_id())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::BadRequest(Some(_))));
}
