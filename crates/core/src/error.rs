use crate::traits::ClientError;
use thiserror::Error;

/// Failures raised while turning documents into indexed entries.
///
/// Collaborator failures during ingestion do not surface here; they are
/// reported per chunk inside an [`crate::IngestionReport`]. Only
/// configuration and I/O problems abort an ingestion call.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("vector dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("document id must not be empty")]
    EmptyDocumentId,

    #[error("document source error: {0}")]
    Source(ClientError),
}

/// Failures raised on the query paths (search, similarity, answering,
/// document analysis).
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query embedding failed: {0}")]
    Embedding(#[source] ClientError),

    #[error("text generation failed: {0}")]
    Generation(#[source] ClientError),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
