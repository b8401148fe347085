mod common;

use axum::{body::Body, extract::Request};
use claims::{assert_err, assert_matches, assert_ok};
use common::fixtures::{storage_config, unreachable_url};
use http_body_util::BodyExt;
use stream_gateway::{
    domain::value_objects::BackendTarget,
    infrastructure::storage::{HttpObjectProxy, ObjectProxy, ProxyError},
};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn target(server: &MockServer, segments: &[&str]) -> BackendTarget {
    let address = server.address();
    BackendTarget {
        protocol: "http".to_string(),
        host: address.ip().to_string(),
        port: address.port(),
        bucket: "streaming".to_string(),
        object_path: segments.iter().map(ToString::to_string).collect(),
    }
}

fn get(headers: &[(&str, &str)]) -> Request {
    let mut builder = Request::builder().uri("/ignored");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_forwards_headers_and_streams_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/streaming/vid123/720p/seg1.ts"))
        .and(header("range", "bytes=10-19"))
        .and(header("if-none-match", "\"etag\""))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("content-range", "bytes 10-19/100")
                .set_body_bytes(b"0123456789".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let proxy = HttpObjectProxy::new(&storage_config(&server));
    let response = assert_ok!(
        proxy
            .forward(
                &target(&server, &["vid123", "720p", "seg1.ts"]),
                get(&[("range", "bytes=10-19"), ("if-none-match", "\"etag\""), ("connection", "close")]),
            )
            .await
    );

    assert_eq!(response.status().as_u16(), 206);
    assert_eq!(response.headers().get("content-range").unwrap(), "bytes 10-19/100");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"0123456789");
}

#[tokio::test]
async fn test_object_keys_are_escaped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/streaming/vid123/my%20movie.mp4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let proxy = HttpObjectProxy::new(&storage_config(&server));
    let response = assert_ok!(
        proxy.forward(&target(&server, &["vid123", "my movie.mp4"]), get(&[])).await
    );
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_backend_status_is_returned_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let proxy = HttpObjectProxy::new(&storage_config(&server));
    let response = assert_ok!(proxy.forward(&target(&server, &["x"]), get(&[])).await);

    // sanitizing is not the proxy's job
    assert_eq!(response.status().as_u16(), 503);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"busy");
}

#[tokio::test]
async fn test_unreachable_backend_is_upstream_error() {
    let server = MockServer::start().await;
    let mut target = target(&server, &["vid123"]);
    let dead: reqwest::Url = unreachable_url().parse().unwrap();
    target.port = dead.port().unwrap();

    let proxy = HttpObjectProxy::new(&storage_config(&server));
    let error = assert_err!(proxy.forward(&target, get(&[])).await);

    assert_matches!(error, ProxyError::Upstream(_));
}
