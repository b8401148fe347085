use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::domain::entities::RequestContext;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
pub const CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Assign a fresh UUID v4 correlation id to every request
///
/// Any client supplied `X-Request-Id` is replaced. The id is stored in the
/// request headers and in a [`RequestContext`] extension, attached to a
/// tracing span, and echoed on the response.
pub async fn assign_correlation_id(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&request_id).ok();

    if let Some(value) = &header_value {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    // repeated header lines form one chain, in arrival order
    let forwarded_for = request
        .headers()
        .get_all(FORWARDED_FOR_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let forwarded_for = Some(forwarded_for).filter(|v| !v.is_empty());

    request.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
        client_ip,
        forwarded_for,
    });

    let span = info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}
