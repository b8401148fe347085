//! Middleware modules for HTTP request processing
//!
//! - Correlation id assignment
//! - Request/response logging
//! - Response sanitizing and server identity
//! - Error to response mapping

pub mod error;
pub mod logging;
pub mod request_id;
pub mod sanitize;

pub use error::AppError;
pub use logging::{logging_middleware, RequestLogConfig};
pub use request_id::assign_correlation_id;
pub use sanitize::{server_identity, ResponseSanitizer};
