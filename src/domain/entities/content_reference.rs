use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ContentKind, Identifier};

/// Identifies one unit of content requested by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentReference {
    Download { video: Identifier, file: Identifier },
    Manifest { video: Identifier, quality: Identifier },
    Segment { video: Identifier, quality: Identifier, segment: Identifier },
    Subtitle { video: Identifier, language: Identifier },
}

impl ContentReference {
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Download { .. } => ContentKind::Download,
            Self::Manifest { .. } => ContentKind::Manifest,
            Self::Segment { .. } => ContentKind::Segment,
            Self::Subtitle { .. } => ContentKind::Subtitle,
        }
    }

    /// Video the content belongs to
    #[must_use]
    pub fn video(&self) -> &Identifier {
        match self {
            Self::Download { video, .. }
            | Self::Manifest { video, .. }
            | Self::Segment { video, .. }
            | Self::Subtitle { video, .. } => video,
        }
    }

    /// File name offered to the client for downloads
    #[must_use]
    pub fn attachment_name(&self) -> Option<&Identifier> {
        match self {
            Self::Download { file, .. } => Some(file),
            _ => None,
        }
    }
}
