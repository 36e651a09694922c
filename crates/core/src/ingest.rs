use crate::chunking::{chunk_text, ChunkingConfig};
use crate::error::IngestError;
use crate::index::VectorIndex;
use crate::models::{Chunk, ChunkFailure, ChunkMetadata, IngestionReport, PendingDocument};
use crate::retry::RetryPolicy;
use crate::traits::{ClientError, DocumentSource, EmbeddingClient};
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use walkdir::WalkDir;

pub const DEFAULT_EMBED_CONCURRENCY: usize = 4;

/// Drives chunking, embedding, and index appends for whole documents.
///
/// Embedding calls fan out concurrently up to `max_concurrency`, but all
/// outcomes are collected in chunk order before anything is appended, so
/// `chunk_id` assignment stays deterministic. Chunks whose embedding fails
/// after retries land in the report instead of aborting the call;
/// already-appended entries are never rolled back.
pub struct DocumentIngestor {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingClient>,
    chunking: ChunkingConfig,
    retry: RetryPolicy,
    max_concurrency: usize,
}

impl DocumentIngestor {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            index,
            embedder,
            chunking: ChunkingConfig::default(),
            retry: RetryPolicy::default(),
            max_concurrency: DEFAULT_EMBED_CONCURRENCY,
        }
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    /// Chunks `text`, embeds each chunk, and appends the successes to the
    /// index tagged with `{doc_id, chunk_id}`. Returns `Err` only for
    /// configuration problems; collaborator failures are reported per
    /// chunk in the [`IngestionReport`].
    pub async fn ingest(&self, text: &str, doc_id: &str) -> Result<IngestionReport, IngestError> {
        if doc_id.is_empty() {
            return Err(IngestError::EmptyDocumentId);
        }

        let chunks = chunk_text(text, &self.chunking);
        let chunk_count = chunks.len();
        let embedded = self.embed_chunks(&chunks).await;

        let mut indexed = Vec::new();
        let mut failed = Vec::new();
        for (chunk_id, outcome) in embedded {
            match outcome {
                Ok(vector) => {
                    self.index.add(
                        vector,
                        chunks[chunk_id].text.clone(),
                        Some(ChunkMetadata::new(doc_id, chunk_id)),
                    )?;
                    indexed.push(chunk_id);
                }
                Err(error) => {
                    warn!(doc_id, chunk_id, %error, "chunk embedding failed");
                    failed.push(ChunkFailure {
                        chunk_id,
                        reason: error.to_string(),
                    });
                }
            }
        }

        info!(
            doc_id,
            chunk_count,
            indexed = indexed.len(),
            failed = failed.len(),
            "document ingested"
        );

        Ok(IngestionReport {
            doc_id: doc_id.to_string(),
            chunk_count,
            indexed,
            failed,
            completed_at: Utc::now(),
        })
    }

    /// Pulls every pending document from `source`, ingests it, and reports
    /// the outcome back. A failing status update is logged but does not
    /// fail the drain; the indexed entries are already committed.
    pub async fn ingest_pending(
        &self,
        source: &dyn DocumentSource,
    ) -> Result<Vec<IngestionReport>, IngestError> {
        let pending = source.pending_documents().await.map_err(IngestError::Source)?;

        let mut reports = Vec::with_capacity(pending.len());
        for PendingDocument { doc_id, text } in pending {
            let report = self.ingest(&text, &doc_id).await?;
            if let Err(error) = source.mark_processed(&doc_id, report.outcome()).await {
                warn!(doc_id = %doc_id, %error, "failed to push status update to document source");
            }
            reports.push(report);
        }
        Ok(reports)
    }

    async fn embed_chunks(&self, chunks: &[Chunk]) -> Vec<(usize, Result<Vec<f32>, ClientError>)> {
        stream::iter(chunks.iter().enumerate().map(|(chunk_id, chunk)| {
            let embedder = Arc::clone(&self.embedder);
            let retry = self.retry.clone();
            let text = chunk.text.clone();
            async move { (chunk_id, retry.run(|| embedder.embed(&text)).await) }
        }))
        .buffered(self.max_concurrency.max(1))
        .collect()
        .await
    }
}

/// Recursively lists plain-text documents (`.txt`, `.md`) under `folder`,
/// sorted for deterministic ingestion order.
pub fn discover_text_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_text = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("md"));

        if is_text {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}
