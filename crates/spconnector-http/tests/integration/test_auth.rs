//! Integration tests for the token exchange
//!
//! Form-encoded client credentials, failure mapping, and the optional
//! token cache.

use std::sync::Arc;

use spconnector_core::domain::DomainError;
use spconnector_core::ports::ISiteDataContext;
use spconnector_http::{connect_with, SiteClient};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

async fn mount_exists(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("{}/exists", common::resource_path("Reports"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": true})))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_token_request_is_form_encoded() {
    let (server, site) = common::setup_site_without_token().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("resource=test-resource"))
        .and(body_string_contains("client_id=test-client-id"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(common::token_response())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/exists", common::resource_path("Reports"))))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(site.exists_folder("Reports").await.unwrap());
}

#[tokio::test]
async fn test_rejected_credentials_are_unauthorized() {
    let (server, site) = common::setup_site_without_token().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;
    mount_exists(&server, 0).await;

    let err = site.exists_folder("Reports").await.unwrap_err();
    match err {
        DomainError::Unauthorized(Some(description)) => {
            assert!(description.contains("Invalid client secret"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_token_failure_without_description() {
    let (server, site) = common::setup_site_without_token().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = site.exists_folder("Reports").await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized(None)));
}

#[tokio::test]
async fn test_missing_access_token_is_unauthorized() {
    let (server, site) = common::setup_site_without_token().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": "3599"
        })))
        .mount(&server)
        .await;
    mount_exists(&server, 0).await;

    let err = site.exists_folder("Reports").await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized(_)));
}

#[tokio::test]
async fn test_out_of_range_expires_in_is_tolerated() {
    for cached in [false, true] {
        let server = MockServer::start().await;
        let mut client = SiteClient::new(Arc::new(common::site_config(&server)));
        if cached {
            client = client.with_token_cache();
        }
        let site = connect_with(client);

        Mock::given(method("POST"))
            .and(path(common::TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": "9223372036854775807",
                "access_token": common::ACCESS_TOKEN
            })))
            .mount(&server)
            .await;
        mount_exists(&server, 1).await;

        assert!(site.exists_folder("Reports").await.unwrap());
    }
}

#[tokio::test]
async fn test_every_call_fetches_a_token_by_default() {
    let (server, site) = common::setup_site_without_token().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(common::token_response())
        .expect(3)
        .mount(&server)
        .await;
    mount_exists(&server, 3).await;

    for _ in 0..3 {
        assert!(site.exists_folder("Reports").await.unwrap());
    }
}

#[tokio::test]
async fn test_token_cache_reuses_token() {
    let server = MockServer::start().await;
    let client = SiteClient::new(Arc::new(common::site_config(&server))).with_token_cache();
    let site = connect_with(client);

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(common::token_response())
        .expect(1)
        .mount(&server)
        .await;
    mount_exists(&server, 3).await;

    for _ in 0..3 {
        assert!(site.exists_folder("Reports").await.unwrap());
    }
}

#[tokio::test]
async fn test_unreachable_token_endpoint_is_transport_error() {
    let server = MockServer::start().await;
    let mut config = common::site_config(&server);
    config.authentication_url = "http://127.0.0.1:9/tenant/".to_string();
    let site = connect_with(SiteClient::new(Arc::new(config)));

    let err = site.exists_folder("Reports").await.unwrap_err();
    assert!(matches!(err, DomainError::Transport { .. }));
}
