use serde::{Deserialize, Serialize};

/// Outcome of the soft-delete check for a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// The index positively reports the content as live
    Available,
    /// The index reports the content as deleted or unknown
    Unavailable,
    /// The index could not give an answer (outage, timeout, bad payload, ...)
    Indeterminate,
}

impl Availability {
    /// Fail-open policy: only a definitive answer blocks content
    #[must_use]
    pub fn allows_serving(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}
