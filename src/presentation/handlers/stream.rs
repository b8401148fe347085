use axum::{
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    application::use_cases::RequestDispatcher,
    domain::entities::RequestContext,
    presentation::{middleware::error::AppError, routes::RouteTable},
};

/// Shared state for the content handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<RequestDispatcher>,
    pub routes: Arc<RouteTable>,
}

/// Serve any content path through the route table and dispatcher
///
/// Unknown paths get an empty 404, invalid identifiers an empty 400.
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let context = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| RequestContext::new(Uuid::new_v4().to_string()));

    if request.method() != Method::GET && request.method() != Method::HEAD {
        let error = AppError::MethodNotAllowed { method: request.method().to_string() };
        return state.dispatcher.sanitizer().sanitize(error.into_response(), None);
    }

    let path = request.uri().path().to_string();
    let route = match state.routes.resolve(&path) {
        Ok(Some(route)) => route,
        Ok(None) => {
            let error = AppError::NotFound { resource: path };
            return state.dispatcher.sanitizer().sanitize(error.into_response(), None);
        }
        Err(e) => {
            let error = AppError::from(e);
            return state.dispatcher.sanitizer().sanitize(error.into_response(), None);
        }
    };

    state.dispatcher.dispatch(&context, route.key.as_deref(), route.reference, request).await
}
