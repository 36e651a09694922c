use crate::error::QueryError;
use crate::index::VectorIndex;
use crate::models::SearchHit;
use crate::retry::RetryPolicy;
use crate::traits::EmbeddingClient;
use std::sync::Arc;

/// Thin query path over the whole index: embed the question, delegate to
/// the index, return raw hits. No deduplication, no extra ranking.
pub struct GlobalSearch {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingClient>,
    retry: RetryPolicy,
}

impl GlobalSearch {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            index,
            embedder,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn search(&self, query_text: &str, top_k: usize) -> Result<Vec<SearchHit>, QueryError> {
        let query_vector = self
            .retry
            .run(|| self.embedder.embed(query_text))
            .await
            .map_err(QueryError::Embedding)?;

        tracing::debug!(top_k, entries = self.index.len(), "global search");
        Ok(self.index.search(&query_vector, top_k))
    }
}
