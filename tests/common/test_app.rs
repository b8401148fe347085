use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub peer: Option<SocketAddr>,
}

impl TestApp {
    pub fn new(router: Router) -> Self {
        Self { router, peer: None }
    }

    /// Attach a peer address the way `into_make_service_with_connect_info` does
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_headers(path, &[]).await
    }

    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().uri(path).method("GET");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, mut request: Request<Body>) -> TestResponse {
        if let Some(peer) = self.peer {
            request.extensions_mut().insert(ConnectInfo(peer));
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        TestResponse::new(response).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8_lossy(&body_bytes).into_owned();

        Self { status, headers, body }
    }

    pub fn assert_status(&self, expected: u16) {
        assert_eq!(self.status.as_u16(), expected, "Response body: {}", self.body);
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Headers every gateway response must carry
    pub fn assert_identity(&self, server: &str) {
        assert_eq!(self.header("server"), Some(server));
        assert_eq!(self.header("vary"), Some("Origin"));
        assert_eq!(self.headers.get_all("vary").iter().count(), 1);
        assert!(self.header("x-amz-request-id").is_none());
        assert!(self.header("x-request-id").is_some());
        assert_eq!(self.header("x-request-id"), self.header("x-correlation-id"));
    }
}
