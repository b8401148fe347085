use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::domain::entities::ContentReference;

/// Request id header added by S3 compatible backends
pub const BACKEND_REQUEST_ID_HEADER: &str = "x-amz-request-id";

/// Fallback `Server` value when the configured identity is not a valid header
const DEFAULT_IDENTITY: &str = "stream-gateway";

/// Whether a backend status lets its body through
pub fn is_passthrough_status(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

/// Normalizes every response before it leaves the gateway
#[derive(Debug, Clone)]
pub struct ResponseSanitizer {
    identity: HeaderValue,
}

impl ResponseSanitizer {
    pub fn new(identity: &str) -> Self {
        let identity = HeaderValue::from_str(identity)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_IDENTITY));
        Self { identity }
    }

    /// Apply the full rule set to a response served for `reference`
    ///
    /// Bodies of non 2xx/3xx responses are dropped so backend error documents
    /// never reach clients. Kind specific headers only go on successful responses.
    pub fn sanitize(&self, response: Response, reference: Option<&ContentReference>) -> Response {
        let (mut parts, body) = response.into_parts();
        let passthrough = is_passthrough_status(parts.status);

        let body = if passthrough {
            body
        } else {
            parts.headers.remove(header::CONTENT_LENGTH);
            parts.headers.remove(header::CONTENT_ENCODING);
            Body::empty()
        };

        if passthrough {
            if let Some(reference) = reference {
                apply_content_headers(&mut parts.headers, reference);
            }
        }

        self.apply_identity(&mut parts.headers);
        Response::from_parts(parts, body)
    }

    /// `Server`, `Vary` and backend request id handling, common to every response
    pub fn apply_identity(&self, headers: &mut HeaderMap) {
        headers.insert(header::SERVER, self.identity.clone());
        headers.remove(BACKEND_REQUEST_ID_HEADER);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
}

fn apply_content_headers(headers: &mut HeaderMap, reference: &ContentReference) {
    if let Some(content_type) = reference.kind().content_type() {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    if let Some(file) = reference.attachment_name() {
        headers.insert(header::CONTENT_DISPOSITION, attachment_disposition(file.as_str()));
    }
}

/// `attachment; filename="<name>"`, with an RFC 5987 variant for non-ASCII names
fn attachment_disposition(file_name: &str) -> HeaderValue {
    let quoted: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");

    let value = if file_name.is_ascii() {
        format!("attachment; filename=\"{quoted}\"")
    } else {
        format!(
            "attachment; filename=\"{quoted}\"; filename*=UTF-8''{}",
            utf8_percent_encode(file_name, NON_ALPHANUMERIC)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Identity headers middleware, covers responses that never reach the dispatcher
pub fn server_identity(
    sanitizer: ResponseSanitizer,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    move |request: Request, next: Next| {
        let sanitizer = sanitizer.clone();
        Box::pin(async move {
            let mut response = next.run(request).await;
            sanitizer.apply_identity(response.headers_mut());
            response
        })
    }
}
