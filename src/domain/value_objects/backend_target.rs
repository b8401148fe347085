use serde::{Deserialize, Serialize};
use std::fmt;

use super::identifier::encode_path_segment;

/// Fully resolved address of an object in the object store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendTarget {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub bucket: String,
    /// Decoded object key segments, joined with `/`
    pub object_path: Vec<String>,
}

impl BackendTarget {
    /// `host:port` authority, used as the forwarded `Host` header
    #[must_use]
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Object key relative to the bucket, segments percent-encoded
    #[must_use]
    pub fn object_key(&self) -> String {
        self.object_path.iter().map(|s| encode_path_segment(s)).collect::<Vec<_>>().join("/")
    }

    /// Fully qualified URL of the object
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "{}://{}/{}/{}",
            self.protocol,
            self.authority(),
            encode_path_segment(&self.bucket),
            self.object_key()
        )
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
