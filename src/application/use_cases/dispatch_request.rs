use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{BackendPathBuilder, CapabilityKeyVerifier, ExistenceGuard};
use crate::{
    domain::{
        entities::{ContentReference, RequestContext},
        repositories::ContentIndex,
        value_objects::{BackendTarget, ContentKind},
    },
    infrastructure::{config::AppConfig, storage::ObjectProxy},
    presentation::middleware::{error::AppError, sanitize::ResponseSanitizer},
};

/// Header carrying the client address to the object store
pub const REAL_IP_HEADER: HeaderName = HeaderName::from_static("x-real-ip");

/// Progress of a request through the gateway pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Received,
    Keyed,
    Guarded,
    Routed,
    Proxied,
    Sanitized,
    Done,
    Rejected,
    NotFound,
    Errored,
}

impl DispatchStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Rejected | Self::NotFound | Self::Errored)
    }
}

/// Final stage and the response handed back to the client
#[derive(Debug)]
pub struct Dispatched {
    pub stage: DispatchStage,
    pub response: Response,
}

/// Runs one request through key verification, the existence guard, path
/// resolution, the proxy and the response sanitizer
pub struct RequestDispatcher {
    verifier: CapabilityKeyVerifier,
    guard: ExistenceGuard,
    paths: BackendPathBuilder,
    proxy: Arc<dyn ObjectProxy>,
    sanitizer: ResponseSanitizer,
    enforce_download_key: bool,
}

impl RequestDispatcher {
    pub fn new(
        config: &AppConfig,
        index: Arc<dyn ContentIndex>,
        proxy: Arc<dyn ObjectProxy>,
    ) -> Self {
        Self {
            verifier: CapabilityKeyVerifier::new(config.security.key_salt.clone()),
            guard: ExistenceGuard::new(index, config.index.name.clone()),
            paths: BackendPathBuilder::new(config.storage.clone()),
            proxy,
            sanitizer: ResponseSanitizer::new(&config.server.identity),
            enforce_download_key: config.security.enforce_download_key,
        }
    }

    pub fn sanitizer(&self) -> &ResponseSanitizer {
        &self.sanitizer
    }

    /// Whether requests of `kind` must present a valid capability key
    pub fn requires_key(&self, kind: ContentKind) -> bool {
        kind.is_key_gated() || (kind == ContentKind::Download && self.enforce_download_key)
    }

    pub async fn dispatch(
        &self,
        context: &RequestContext,
        key: Option<&str>,
        reference: ContentReference,
        request: Request,
    ) -> Response {
        self.run(context, key, reference, request).await.response
    }

    /// Same as [`Self::dispatch`], also reporting the terminal stage
    pub async fn run(
        &self,
        context: &RequestContext,
        key: Option<&str>,
        reference: ContentReference,
        request: Request,
    ) -> Dispatched {
        let request_id = context.request_id.as_str();
        let kind = reference.kind();
        debug!(request_id, %kind, stage = ?DispatchStage::Received, "Dispatching request");

        if self.requires_key(kind) {
            let candidate = key.unwrap_or_default();
            if !self.verifier.verify(candidate, Utc::now()) {
                warn!(request_id, invalid_key = candidate, %kind, "Capability key rejected");
                return self.terminate(DispatchStage::Rejected, &AppError::InvalidKey);
            }
        }
        debug!(request_id, stage = ?DispatchStage::Keyed);

        if kind.is_existence_guarded() {
            let availability = self.guard.check(reference.video().as_str()).await;
            if !availability.allows_serving() {
                return self.terminate(
                    DispatchStage::NotFound,
                    &AppError::NotFound { resource: format!("video {}", reference.video()) },
                );
            }
            debug!(request_id, ?availability, stage = ?DispatchStage::Guarded);
        }

        let target = self.paths.build(&reference);
        debug!(request_id, url = %target, stage = ?DispatchStage::Routed);

        let request = prepare_forward(request, context, &target);
        match self.proxy.forward(&target, request).await {
            Ok(response) => {
                debug!(
                    request_id,
                    status = response.status().as_u16(),
                    stage = ?DispatchStage::Proxied
                );
                let response = self.sanitizer.sanitize(response, Some(&reference));
                debug!(request_id, stage = ?DispatchStage::Sanitized);
                Dispatched { stage: DispatchStage::Done, response }
            }
            Err(e) => {
                error!(
                    request_id,
                    error = %e,
                    url = %target,
                    client_ip = ?context.client_ip,
                    "Object storage proxy failed"
                );
                self.terminate(DispatchStage::Errored, &AppError::from(e))
            }
        }
    }

    fn terminate(&self, stage: DispatchStage, error: &AppError) -> Dispatched {
        let response = self.sanitizer.sanitize(error.to_response(), None);
        Dispatched { stage, response }
    }
}

/// Point the request at the backend: `Host` rewrite and real client address
fn prepare_forward(
    mut request: Request,
    context: &RequestContext,
    target: &BackendTarget,
) -> Request {
    let headers = request.headers_mut();

    if let Some(ip) = context.client_ip {
        if let Ok(value) = HeaderValue::from_str(&ip.to_string()) {
            headers.append(REAL_IP_HEADER, value);
        }
    }

    if let Ok(host) = HeaderValue::from_str(&target.authority()) {
        headers.insert(axum::http::header::HOST, host);
    }

    request
}
