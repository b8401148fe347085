use std::sync::Arc;
use tracing::{error, warn};

use crate::domain::{
    entities::{ExistenceRecord, DELETED_FIELD},
    repositories::ContentIndex,
    value_objects::Availability,
};

/// Soft-delete guard for downloadable content
///
/// The index is an eventually consistent moderation signal, so only a
/// definitive answer (deleted flag set, or document absent) blocks content.
/// Everything else resolves to [`Availability::Indeterminate`].
pub struct ExistenceGuard {
    index: Arc<dyn ContentIndex>,
    index_name: String,
}

impl ExistenceGuard {
    pub fn new(index: Arc<dyn ContentIndex>, index_name: impl Into<String>) -> Self {
        Self { index, index_name: index_name.into() }
    }

    pub async fn check(&self, video_id: &str) -> Availability {
        let lookup = match self.index.get_fields(&self.index_name, video_id, &[DELETED_FIELD]).await {
            Ok(lookup) => lookup,
            Err(e) => {
                error!(
                    error = %e,
                    document_id = video_id,
                    index = %self.index_name,
                    "Content index lookup failed, serving content"
                );
                return Availability::Indeterminate;
            }
        };

        match lookup.status {
            200 => {
                let record =
                    ExistenceRecord::from_fields(&self.index_name, video_id, lookup.fields.as_ref());
                if record.is_deleted() {
                    warn!(document_id = video_id, index = %self.index_name, "Request for deleted document");
                    Availability::Unavailable
                } else {
                    Availability::Available
                }
            }
            404 => {
                warn!(
                    document_id = video_id,
                    index = %self.index_name,
                    "Request for non existing document"
                );
                Availability::Unavailable
            }
            status => {
                warn!(
                    status,
                    document_id = video_id,
                    index = %self.index_name,
                    "Unexpected content index status, serving content"
                );
                Availability::Indeterminate
            }
        }
    }
}
