use axum::{routing::get, Router};

use crate::{
    infrastructure::http::health_check,
    presentation::handlers::{self, stream::AppState},
};

mod table;

pub use table::{RouteMatch, RoutePattern, RouteTable, TemplateError};

/// Create all application routes with application state
///
/// Content paths are resolved by [`RouteTable`] from the fallback handler,
/// only the health probe is registered with the router itself.
pub fn create_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .fallback(handlers::stream::dispatch)
        .with_state(app_state)
}
