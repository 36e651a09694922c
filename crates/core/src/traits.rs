use crate::models::{IngestionOutcome, PendingDocument};
use async_trait::async_trait;
use thiserror::Error;

/// Failure taxonomy shared by all external collaborators. Transient
/// failures (rate limits, timeouts, connection resets) are worth retrying;
/// permanent ones (input too long, bad credentials) are not.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("permanent failure: {0}")]
    Permanent(String),
}

impl ClientError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Maps text to a fixed-dimensional vector. Every vector returned must have
/// exactly `dimensions()` components.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError>;
}

/// Synthesizes free text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError>;
}

/// An external store that yields pending documents and accepts status
/// updates. The engine treats it as an opaque producer and never touches
/// its wire format.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn pending_documents(&self) -> Result<Vec<PendingDocument>, ClientError>;

    async fn mark_processed(
        &self,
        doc_id: &str,
        outcome: IngestionOutcome,
    ) -> Result<(), ClientError>;
}
