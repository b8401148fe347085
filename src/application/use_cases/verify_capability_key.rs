use chrono::{DateTime, Utc};

use crate::domain::value_objects::CapabilityKey;

/// Checks client supplied capability keys against the rolling monthly window
#[derive(Clone)]
pub struct CapabilityKeyVerifier {
    salt: String,
}

impl CapabilityKeyVerifier {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Accept the key of the current, previous or next UTC calendar month
    pub fn verify(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        CapabilityKey::window(now, &self.salt).iter().any(|key| key.matches(candidate))
    }
}

impl std::fmt::Debug for CapabilityKeyVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityKeyVerifier").field("salt", &"<redacted>").finish()
    }
}
