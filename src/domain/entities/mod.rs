pub mod content_reference;
pub mod existence_record;
pub mod request_context;

pub use content_reference::*;
pub use existence_record::*;
pub use request_context::*;
