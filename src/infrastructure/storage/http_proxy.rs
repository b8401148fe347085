use async_trait::async_trait;
use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::{header, HeaderMap, HeaderName},
    response::Response,
};
use reqwest::{redirect::Policy, Client as HttpClient, Url};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{ObjectProxy, ProxyError};
use crate::domain::value_objects::BackendTarget;
use crate::infrastructure::config::StorageConfig;

/// Headers that only apply to a single connection
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    headers.remove("proxy-connection");
    headers.remove(header::UPGRADE);
}

/// HTTP reverse proxy to the object store
///
/// The reqwest client is created on the first forwarded request and reused
/// afterwards. Redirects are returned to the client untouched.
pub struct HttpObjectProxy {
    connect_timeout: Duration,
    client: OnceCell<HttpClient>,
}

impl HttpObjectProxy {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds),
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&HttpClient, ProxyError> {
        self.client
            .get_or_try_init(|| async {
                let mut builder = HttpClient::builder().redirect(Policy::none());
                if !self.connect_timeout.is_zero() {
                    builder = builder.connect_timeout(self.connect_timeout);
                }
                builder.build().map_err(|e| ProxyError::Client { message: e.to_string() })
            })
            .await
    }
}

#[async_trait]
impl ObjectProxy for HttpObjectProxy {
    async fn forward(
        &self,
        target: &BackendTarget,
        request: Request,
    ) -> Result<Response, ProxyError> {
        let url = target.url();
        let parsed = Url::parse(&url).map_err(|_| ProxyError::InvalidTarget { url: url.clone() })?;
        let client = self.client().await?;

        let (parts, body) = request.into_parts();
        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);

        let mut upstream = client.request(parts.method.clone(), parsed).headers(headers);
        if body.size_hint().exact() != Some(0) {
            upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        debug!(method = %parts.method, %url, "Forwarding request to object storage");
        let upstream_response = upstream.send().await?;
        debug!(%url, status = upstream_response.status().as_u16(), "Object storage responded");

        let mut builder = Response::builder().status(upstream_response.status());
        if let Some(response_headers) = builder.headers_mut() {
            response_headers.extend(
                upstream_response.headers().iter().map(|(k, v)| (k.clone(), v.clone())),
            );
            strip_hop_by_hop(response_headers);
        }

        builder
            .body(Body::from_stream(upstream_response.bytes_stream()))
            .map_err(|e| ProxyError::Response { message: e.to_string() })
    }
}
