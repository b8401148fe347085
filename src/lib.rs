#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

//! Stream Gateway
//!
//! Front door for video downloads, HLS streams and subtitles kept in S3
//! compatible object storage. Streaming paths are gated by a monthly rotating
//! capability key, downloads are checked against a search index for
//! soft-deleted content, and every backend response is sanitized before it
//! reaches the client.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::entities::*;
pub use domain::value_objects::*;
