use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::repositories::{ContentIndex, IndexError, IndexLookup};
use crate::infrastructure::config::IndexConfig;

/// Body of a document GET, only `_source` matters to the gateway
#[derive(Debug, Deserialize)]
struct GetDocumentResponse {
    #[serde(rename = "_source", default)]
    source: Option<Map<String, Value>>,
}

/// Elasticsearch backed content index
#[derive(Debug, Clone)]
pub struct ElasticsearchIndex {
    base_url: Url,
    document_type: String,
    http_client: HttpClient,
}

impl ElasticsearchIndex {
    /// Build a client for the configured index
    ///
    /// # Errors
    /// Returns an error if the URL is empty or invalid, or the HTTP client cannot be built
    pub fn new(config: &IndexConfig) -> Result<Self, IndexError> {
        let url = config.url.trim();
        if url.is_empty() {
            return Err(IndexError::MissingUrl);
        }

        let base_url = Url::parse(url).map_err(|e| IndexError::InvalidUrl(format!("{url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(IndexError::InvalidUrl(url.to_string()));
        }

        let mut builder = HttpClient::builder();
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }
        let http_client = builder.build().map_err(|e| IndexError::Client(e.to_string()))?;

        Ok(Self { base_url, document_type: config.document_type.clone(), http_client })
    }

    /// `{base}/{index}/{type}/{id}?_source=<fields>`
    fn document_url(
        &self,
        index: &str,
        document_id: &str,
        fields: &[&str],
    ) -> Result<Url, IndexError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| IndexError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([index, self.document_type.as_str(), document_id]);

        if !fields.is_empty() {
            url.query_pairs_mut().append_pair("_source", &fields.join(","));
        }

        Ok(url)
    }
}

#[async_trait]
impl ContentIndex for ElasticsearchIndex {
    async fn get_fields(
        &self,
        index: &str,
        document_id: &str,
        fields: &[&str],
    ) -> Result<IndexLookup, IndexError> {
        let url = self.document_url(index, document_id, fields)?;
        debug!(%url, "Looking up document");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| IndexError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(IndexLookup { status: status.as_u16(), fields: None });
        }

        let document: GetDocumentResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                IndexError::Decode(e.to_string())
            } else {
                IndexError::Transport(e.to_string())
            }
        })?;

        Ok(IndexLookup { status: status.as_u16(), fields: document.source })
    }
}

/// Content index whose client is constructed once, on first use
///
/// Concurrent first requests race on a single initializer; a failed
/// construction is not cached and is retried by the next lookup.
pub struct LazyContentIndex {
    config: IndexConfig,
    client: OnceCell<ElasticsearchIndex>,
}

impl LazyContentIndex {
    pub fn new(config: IndexConfig) -> Self {
        Self { config, client: OnceCell::new() }
    }

    /// Whether the underlying client has been built
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    async fn client(&self) -> Result<&ElasticsearchIndex, IndexError> {
        self.client.get_or_try_init(|| async { ElasticsearchIndex::new(&self.config) }).await
    }
}

#[async_trait]
impl ContentIndex for LazyContentIndex {
    async fn get_fields(
        &self,
        index: &str,
        document_id: &str,
        fields: &[&str],
    ) -> Result<IndexLookup, IndexError> {
        self.client().await?.get_fields(index, document_id, fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> IndexConfig {
        IndexConfig {
            url: url.to_string(),
            name: "heimdallr_streaming".to_string(),
            document_type: "doc".to_string(),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_missing_url() {
        assert!(matches!(ElasticsearchIndex::new(&config("")), Err(IndexError::MissingUrl)));
        assert!(matches!(ElasticsearchIndex::new(&config("  ")), Err(IndexError::MissingUrl)));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            ElasticsearchIndex::new(&config("not a url")),
            Err(IndexError::InvalidUrl(_))
        ));
        assert!(matches!(
            ElasticsearchIndex::new(&config("mailto:ops@example.com")),
            Err(IndexError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_document_url() {
        let index = ElasticsearchIndex::new(&config("http://es:9200")).unwrap();
        let url = index.document_url("heimdallr_streaming", "vid123", &["deleted"]).unwrap();
        assert_eq!(url.as_str(), "http://es:9200/heimdallr_streaming/doc/vid123?_source=deleted");
    }

    #[test]
    fn test_document_url_with_base_path_and_escaping() {
        let index = ElasticsearchIndex::new(&config("http://proxy/es/")).unwrap();
        let url = index.document_url("idx", "a/b c", &[]).unwrap();
        assert_eq!(url.as_str(), "http://proxy/es/idx/doc/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_lazy_index_reports_missing_url_at_use() {
        let index = LazyContentIndex::new(config(""));
        assert!(!index.is_initialized());

        let result = index.get_fields("idx", "vid", &["deleted"]).await;
        assert!(matches!(result, Err(IndexError::MissingUrl)));
        assert!(!index.is_initialized());
    }
}
