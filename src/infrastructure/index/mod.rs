//! Document index client
//!
//! The gateway only issues point lookups against the index. The client is
//! built lazily on first use and shared by every request afterwards.

mod elasticsearch;

pub use elasticsearch::{ElasticsearchIndex, LazyContentIndex};
