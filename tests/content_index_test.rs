mod common;

use claims::{assert_err, assert_matches, assert_ok};
use common::fixtures::{index_config, unreachable_url, INDEX_NAME};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use stream_gateway::{
    application::use_cases::ExistenceGuard,
    domain::{
        repositories::{ContentIndex, IndexError},
        value_objects::Availability,
    },
    infrastructure::index::{ElasticsearchIndex, LazyContentIndex},
};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn mount(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/{INDEX_NAME}/doc/vid123")))
        .and(query_param("_source", "deleted"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_found_document_returns_source_fields() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "_index": INDEX_NAME,
            "_id": "vid123",
            "found": true,
            "_source": {"deleted": true}
        })),
    )
    .await;

    let index = ElasticsearchIndex::new(&index_config(&server.uri())).unwrap();
    let lookup = assert_ok!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);

    assert_eq!(lookup.status, 200);
    assert_eq!(lookup.fields.unwrap().get("deleted"), Some(&json!(true)));
}

#[tokio::test]
async fn test_document_without_source_has_no_fields() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(json!({"found": true}))).await;

    let index = ElasticsearchIndex::new(&index_config(&server.uri())).unwrap();
    let lookup = assert_ok!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);

    assert_eq!(lookup.status, 200);
    assert!(lookup.fields.is_none());
}

#[tokio::test]
async fn test_missing_document_reports_status() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(404).set_body_json(json!({"found": false}))).await;

    let index = ElasticsearchIndex::new(&index_config(&server.uri())).unwrap();
    let lookup = assert_ok!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);

    assert_eq!(lookup.status, 404);
    assert!(lookup.fields.is_none());
}

#[tokio::test]
async fn test_server_error_reports_status() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500).set_body_string("oops")).await;

    let index = ElasticsearchIndex::new(&index_config(&server.uri())).unwrap();
    let lookup = assert_ok!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);

    assert_eq!(lookup.status, 500);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("{not json")).await;

    let index = ElasticsearchIndex::new(&index_config(&server.uri())).unwrap();
    let error = assert_err!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);

    assert_matches!(error, IndexError::Decode(_));
}

#[tokio::test]
async fn test_unreachable_index_is_transport_error() {
    let index = ElasticsearchIndex::new(&index_config(&unreachable_url())).unwrap();
    let error = assert_err!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);

    assert_matches!(error, IndexError::Transport(_));
}

#[tokio::test]
async fn test_lazy_index_connects_on_first_use() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(json!({"_source": {}}))).await;

    let index = LazyContentIndex::new(index_config(&server.uri()));
    assert!(!index.is_initialized());

    assert_ok!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);
    assert!(index.is_initialized());
}

#[tokio::test]
async fn test_lazy_index_without_url() {
    let index = LazyContentIndex::new(index_config(""));
    let error = assert_err!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);

    assert_matches!(error, IndexError::MissingUrl);
    assert!(!index.is_initialized());
}

#[tokio::test]
async fn test_slow_index_times_out_as_transport_error() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_delay(Duration::from_secs(3))).await;

    let mut config = index_config(&server.uri());
    config.timeout_seconds = 1;
    let index = ElasticsearchIndex::new(&config).unwrap();
    let error = assert_err!(index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await);

    assert_matches!(error, IndexError::Transport(_));
}

#[tokio::test]
async fn test_guard_treats_index_timeout_as_indeterminate() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"_source": {"deleted": true}}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let mut config = index_config(&server.uri());
    config.timeout_seconds = 1;
    let guard = ExistenceGuard::new(Arc::new(LazyContentIndex::new(config)), INDEX_NAME);

    let availability = guard.check("vid123").await;

    assert_eq!(availability, Availability::Indeterminate);
    assert!(availability.allows_serving());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_first_lookups_share_one_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/{INDEX_NAME}/doc/vid123")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"found": false})))
        .expect(64)
        .mount(&server)
        .await;

    let index = Arc::new(LazyContentIndex::new(index_config(&server.uri())));
    assert!(!index.is_initialized());

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let index = index.clone();
            tokio::spawn(async move { index.get_fields(INDEX_NAME, "vid123", &["deleted"]).await })
        })
        .collect();

    for handle in handles {
        let lookup = assert_ok!(handle.await.unwrap());
        assert_eq!(lookup.status, 404);
    }
    assert!(index.is_initialized());
}
