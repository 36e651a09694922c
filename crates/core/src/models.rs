use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A bounded text window produced by sliding a fixed-size, fixed-overlap
/// window across a document. `source_offset` is the char offset of the
/// window start in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub source_offset: usize,
}

/// Typed metadata attached to every entry the ingestion path appends to the
/// vector index. `chunk_id` is the chunk's position in the deterministic
/// chunk sequence of its document. Caller extension fields live under
/// `extra` rather than polluting the recognized keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub doc_id: String,
    pub chunk_id: usize,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl ChunkMetadata {
    pub fn new(doc_id: impl Into<String>, chunk_id: usize) -> Self {
        Self {
            doc_id: doc_id.into(),
            chunk_id,
            extra: Map::new(),
        }
    }
}

/// One ranked result from the vector index. `score` is cosine similarity;
/// callers may rely on ordering and on the score being monotonic with
/// similarity, never on exact values. Entries appended without metadata
/// come back with `metadata: None` ("unattributed").
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub text: String,
    pub metadata: Option<ChunkMetadata>,
    pub score: f32,
}

impl SearchHit {
    pub fn doc_id(&self) -> Option<&str> {
        self.metadata.as_ref().map(|meta| meta.doc_id.as_str())
    }
}

/// A chunk whose embedding step failed after retries were exhausted.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkFailure {
    pub chunk_id: usize,
    pub reason: String,
}

/// Per-document ingestion outcome. Already-appended entries are never
/// rolled back, so a report with failures still describes committed work.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    pub doc_id: String,
    pub chunk_count: usize,
    pub indexed: Vec<usize>,
    pub failed: Vec<ChunkFailure>,
    pub completed_at: DateTime<Utc>,
}

impl IngestionReport {
    pub fn outcome(&self) -> IngestionOutcome {
        if self.failed.is_empty() {
            IngestionOutcome::Complete
        } else if self.indexed.is_empty() {
            IngestionOutcome::Failed
        } else {
            IngestionOutcome::Partial
        }
    }
}

/// Three-way ingestion result callers must be able to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IngestionOutcome {
    Complete,
    Partial,
    Failed,
}

/// A question answered from retrieved context, together with the hits the
/// context was assembled from, in ranked order.
#[derive(Debug, Clone, Serialize)]
pub struct GroundedAnswer {
    pub answer: String,
    pub used_chunks: Vec<SearchHit>,
}

/// A document waiting in an external source, ready to be ingested.
#[derive(Debug, Clone)]
pub struct PendingDocument {
    pub doc_id: String,
    pub text: String,
}
