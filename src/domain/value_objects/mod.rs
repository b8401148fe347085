pub mod availability;
pub mod backend_target;
pub mod capability_key;
pub mod content_kind;
pub mod identifier;

pub use availability::*;
pub use backend_target::*;
pub use capability_key::*;
pub use content_kind::*;
pub use identifier::*;
