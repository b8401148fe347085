use crate::domain::{entities::ContentReference, value_objects::BackendTarget};
use crate::infrastructure::config::StorageConfig;

/// Name of the playlist object inside a quality directory
pub const MANIFEST_OBJECT: &str = "stream.m3u8";

/// Maps a content reference to the object that holds it
///
/// | kind     | bucket    | object                          |
/// |----------|-----------|---------------------------------|
/// | download | download  | `{video}/{file}`                |
/// | manifest | streaming | `{video}/{quality}/stream.m3u8` |
/// | segment  | streaming | `{video}/{quality}/{segment}`   |
/// | subtitle | subtitle  | `{video}/{video}_{language}.vtt`|
#[derive(Debug, Clone)]
pub struct BackendPathBuilder {
    storage: StorageConfig,
}

impl BackendPathBuilder {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }

    pub fn build(&self, reference: &ContentReference) -> BackendTarget {
        let (bucket, object_path) = match reference {
            ContentReference::Download { video, file } => {
                (&self.storage.download_bucket, vec![video.to_string(), file.to_string()])
            }
            ContentReference::Manifest { video, quality } => (
                &self.storage.streaming_bucket,
                vec![video.to_string(), quality.to_string(), MANIFEST_OBJECT.to_string()],
            ),
            ContentReference::Segment { video, quality, segment } => (
                &self.storage.streaming_bucket,
                vec![video.to_string(), quality.to_string(), segment.to_string()],
            ),
            ContentReference::Subtitle { video, language } => (
                &self.storage.subtitle_bucket,
                vec![video.to_string(), format!("{video}_{language}.vtt")],
            ),
        };

        BackendTarget {
            protocol: self.storage.protocol.clone(),
            host: self.storage.host.clone(),
            port: self.storage.port,
            bucket: bucket.clone(),
            object_path,
        }
    }
}
