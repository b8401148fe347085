use axum::{
    extract::{Query, Request},
    http::{header, HeaderMap, Method, StatusCode, Uri, Version},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Map, Value};
use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};
use tracing::{info, warn};

use crate::domain::entities::RequestContext;

/// Logging configuration for request/response middleware
#[derive(Debug, Clone)]
pub struct RequestLogConfig {
    /// Log request headers
    pub log_request_headers: bool,
    /// Log request cookies as a name/value map
    pub log_cookies: bool,
    /// Headers to exclude from logging (for sensitive data)
    pub excluded_headers: Vec<String>,
    /// Minimum duration to log slow requests (in milliseconds)
    pub slow_request_threshold_ms: u64,
}

impl Default for RequestLogConfig {
    fn default() -> Self {
        Self {
            log_request_headers: true,
            log_cookies: true,
            // cookies are logged separately, parsed
            excluded_headers: vec![
                "authorization".to_string(),
                "cookie".to_string(),
                "proxy-authorization".to_string(),
            ],
            slow_request_threshold_ms: 1000,
        }
    }
}

impl RequestLogConfig {
    /// More restrictive settings for production
    pub fn production() -> Self {
        Self {
            log_request_headers: true,
            log_cookies: true,
            excluded_headers: vec![
                "authorization".to_string(),
                "cookie".to_string(),
                "set-cookie".to_string(),
                "proxy-authorization".to_string(),
            ],
            slow_request_threshold_ms: 2000,
        }
    }

    fn should_log_header(&self, header_name: &str) -> bool {
        !self.excluded_headers.iter().any(|excluded| excluded.eq_ignore_ascii_case(header_name))
    }

    fn filter_headers(&self, headers: &HeaderMap) -> Value {
        let mut filtered = Map::new();

        for (name, value) in headers {
            let name_str = name.as_str();
            if self.should_log_header(name_str) {
                let value = value.to_str().map_or_else(|_| json!("<binary>"), |v| json!(v));
                filtered.insert(name_str.to_string(), value);
            }
        }

        Value::Object(filtered)
    }
}

/// Request information captured before the handler runs
#[derive(Debug)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
    pub context: Option<RequestContext>,
    pub start_time: Instant,
}

#[derive(Debug)]
pub struct ResponseInfo {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub duration: Duration,
}

impl RequestInfo {
    fn request_id(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.request_id.as_str())
    }

    fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

fn query_map(uri: &Uri) -> BTreeMap<String, String> {
    Query::<BTreeMap<String, String>>::try_from_uri(uri).map(|Query(q)| q).unwrap_or_default()
}

fn cookie_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    CookieJar::from_headers(headers)
        .iter()
        .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
        .collect()
}

/// Request/response logging middleware
///
/// Must run inside the correlation id middleware so the [`RequestContext`]
/// is available.
pub fn logging_middleware(
    config: RequestLogConfig,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    move |request: Request, next: Next| {
        let config = config.clone();
        Box::pin(async move {
            let request_info = RequestInfo {
                method: request.method().clone(),
                uri: request.uri().clone(),
                version: request.version(),
                headers: request.headers().clone(),
                context: request.extensions().get::<RequestContext>().cloned(),
                start_time: Instant::now(),
            };

            log_request(&config, &request_info);

            let response = next.run(request).await;

            let response_info = ResponseInfo {
                status: response.status(),
                headers: response.headers().clone(),
                duration: request_info.start_time.elapsed(),
            };

            log_response(&config, &request_info, &response_info);

            response
        })
    }
}

/// Build the structured request record
fn request_record(config: &RequestLogConfig, info: &RequestInfo) -> Value {
    let remote_ip_list =
        info.context.as_ref().map(RequestContext::remote_ip_list).unwrap_or_default();
    let client_ip = info.context.as_ref().and_then(|c| c.client_ip).map(|ip| ip.to_string());

    let mut log_data = json!({
        "type": "request",
        "method": info.method.as_str(),
        "uri": info.uri.to_string(),
        "path": info.uri.path(),
        "query": query_map(&info.uri),
        "version": format!("{:?}", info.version),
        "remote_ip_list": remote_ip_list,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if let Some(request_id) = info.request_id() {
        log_data["request_id"] = json!(request_id);
    }

    if let Some(client_ip) = client_ip {
        log_data["client_ip"] = json!(client_ip);
    }

    if let Some(user_agent) = info.header(header::USER_AGENT) {
        log_data["user_agent"] = json!(user_agent);
    }

    if let Some(referrer) = info.header(header::REFERER) {
        log_data["referrer"] = json!(referrer);
    }

    if config.log_request_headers {
        log_data["headers"] = config.filter_headers(&info.headers);
    }

    if config.log_cookies {
        log_data["cookies"] = json!(cookie_map(&info.headers));
    }

    log_data
}

fn log_request(config: &RequestLogConfig, info: &RequestInfo) {
    let log_data = request_record(config, info);
    info!(target: "http_requests", "{}", log_data);
}

fn log_response(
    config: &RequestLogConfig,
    request_info: &RequestInfo,
    response_info: &ResponseInfo,
) {
    let mut log_data = json!({
        "type": "response",
        "method": request_info.method.as_str(),
        "uri": request_info.uri.to_string(),
        "status": response_info.status.as_u16(),
        "status_text": response_info.status.canonical_reason().unwrap_or("Unknown"),
        "duration_ms": response_info.duration.as_millis(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if let Some(request_id) = request_info.request_id() {
        log_data["request_id"] = json!(request_id);
    }

    if let Some(length) = response_info.headers.get(header::CONTENT_LENGTH) {
        log_data["body_bytes"] = json!(length.to_str().unwrap_or_default());
    }

    let slow = response_info.duration.as_millis() > u128::from(config.slow_request_threshold_ms);

    if response_info.status.is_server_error() {
        tracing::error!(target: "http_responses", "{}", log_data);
    } else if response_info.status.is_client_error() || slow {
        tracing::warn!(target: "http_responses", "{}", log_data);
    } else {
        tracing::info!(target: "http_responses", "{}", log_data);
    }

    if slow {
        warn!(
            target: "slow_requests",
            method = request_info.method.as_str(),
            uri = request_info.uri.to_string(),
            status = response_info.status.as_u16(),
            duration_ms = response_info.duration.as_millis(),
            request_id = request_info.request_id().unwrap_or("unknown"),
            "Slow request detected"
        );
    }
}
