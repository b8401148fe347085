mod check_availability;
mod dispatch_request;
mod resolve_backend_target;
mod verify_capability_key;

pub use check_availability::ExistenceGuard;
pub use dispatch_request::{DispatchStage, Dispatched, RequestDispatcher, REAL_IP_HEADER};
pub use resolve_backend_target::{BackendPathBuilder, MANIFEST_OBJECT};
pub use verify_capability_key::CapabilityKeyVerifier;
