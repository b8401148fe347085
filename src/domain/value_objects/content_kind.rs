use serde::{Deserialize, Serialize};
use std::fmt;

/// HLS playlist media type (RFC 8216)
pub const HLS_PLAYLIST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// MP4 download media type
pub const MP4_CONTENT_TYPE: &str = "video/mp4";

/// Kind of content a route serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Download,
    Manifest,
    Segment,
    Subtitle,
}

impl ContentKind {
    /// `Content-Type` forced on successful responses
    ///
    /// Segments keep whatever the object store reports.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Download => Some(MP4_CONTENT_TYPE),
            Self::Manifest | Self::Subtitle => Some(HLS_PLAYLIST_CONTENT_TYPE),
            Self::Segment => None,
        }
    }

    /// Whether the capability key gate always applies
    #[must_use]
    pub fn is_key_gated(&self) -> bool {
        !matches!(self, Self::Download)
    }

    /// Whether the soft-delete guard applies
    #[must_use]
    pub fn is_existence_guarded(&self) -> bool {
        matches!(self, Self::Download)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Manifest => "manifest",
            Self::Segment => "segment",
            Self::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(ContentKind::Download.content_type(), Some("video/mp4"));
        assert_eq!(ContentKind::Manifest.content_type(), Some(HLS_PLAYLIST_CONTENT_TYPE));
        assert_eq!(ContentKind::Subtitle.content_type(), Some(HLS_PLAYLIST_CONTENT_TYPE));
        assert_eq!(ContentKind::Segment.content_type(), None);
    }

    #[test]
    fn test_gates() {
        assert!(!ContentKind::Download.is_key_gated());
        assert!(ContentKind::Download.is_existence_guarded());

        for kind in [ContentKind::Manifest, ContentKind::Segment, ContentKind::Subtitle] {
            assert!(kind.is_key_gated());
            assert!(!kind.is_existence_guarded());
        }
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&ContentKind::Manifest).unwrap();
        assert_eq!(json, "\"manifest\"");
    }
}
