use crate::error::QueryError;
use crate::index::VectorIndex;
use crate::models::SearchHit;
use crate::retry::RetryPolicy;
use crate::traits::EmbeddingClient;
use std::collections::HashSet;
use std::sync::Arc;

/// Finds *documents* similar to a given text by searching chunk-level
/// entries and keeping the highest-ranked hit per distinct `doc_id`.
///
/// The query text is embedded as a single vector, not chunked. Because
/// deduplication happens after retrieval, over-represented documents can
/// crowd others out of the raw hit list: the result may hold fewer than
/// `top_k` documents even when more exist in the index. Raise
/// `raw_fetch_multiplier` to over-fetch before deduplicating when fuller
/// document coverage matters more than query cost.
pub struct SimilarityEngine {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingClient>,
    retry: RetryPolicy,
    raw_fetch_multiplier: usize,
}

impl SimilarityEngine {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            index,
            embedder,
            retry: RetryPolicy::default(),
            raw_fetch_multiplier: 1,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_raw_fetch_multiplier(mut self, multiplier: usize) -> Self {
        self.raw_fetch_multiplier = multiplier.max(1);
        self
    }

    /// Hits without metadata are unattributable to a document and are
    /// dropped from the deduplicated output.
    pub async fn find_similar_documents(
        &self,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, QueryError> {
        let query_vector = self
            .retry
            .run(|| self.embedder.embed(text))
            .await
            .map_err(QueryError::Embedding)?;

        let raw_count = top_k.saturating_mul(self.raw_fetch_multiplier);
        let raw_hits = self.index.search(&query_vector, raw_count);

        let mut seen = HashSet::new();
        let mut deduped = Vec::new();
        for hit in raw_hits {
            let Some(metadata) = &hit.metadata else {
                tracing::debug!(score = hit.score, "dropping unattributed hit");
                continue;
            };
            if seen.insert(metadata.doc_id.clone()) {
                deduped.push(hit);
                if deduped.len() == top_k {
                    break;
                }
            }
        }

        Ok(deduped)
    }
}
