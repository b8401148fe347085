use async_trait::async_trait;
use serde_json::{Map, Value};

/// Raw answer of a document lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexLookup {
    /// HTTP status reported by the index
    pub status: u16,
    /// Requested source fields, present only when the document was found
    pub fields: Option<Map<String, Value>>,
}

/// Errors raised while talking to the content index
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("The content index URL is not configured")]
    MissingUrl,

    #[error("Invalid content index URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build content index client: {0}")]
    Client(String),

    #[error("Content index request failed: {0}")]
    Transport(String),

    #[error("Unexpected content index response: {0}")]
    Decode(String),
}

/// Read-only access to the document index holding content moderation state
#[async_trait]
pub trait ContentIndex: Send + Sync {
    /// Fetch selected fields of one document by id from a named index
    async fn get_fields(
        &self,
        index: &str,
        document_id: &str,
        fields: &[&str],
    ) -> Result<IndexLookup, IndexError>;
}
