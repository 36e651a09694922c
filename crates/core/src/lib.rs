pub mod analysis;
pub mod answer;
pub mod chunking;
pub mod clients;
pub mod embeddings;
pub mod error;
pub mod index;
pub mod ingest;
pub mod metadata;
pub mod models;
pub mod retry;
pub mod search;
pub mod similarity;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use analysis::{route_document, DocumentAnalyzer, DocumentCategory};
pub use answer::{MultiDocAnswerer, NO_ANSWER_SENTINEL};
pub use chunking::{chunk_text, ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use clients::{
    GeminiClient, DEFAULT_EMBEDDING_MODEL, DEFAULT_GEMINI_BASE_URL, DEFAULT_GENERATION_MODEL,
};
pub use embeddings::{HashEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{IngestError, QueryError};
pub use index::VectorIndex;
pub use ingest::{discover_text_files, DocumentIngestor, DEFAULT_EMBED_CONCURRENCY};
pub use metadata::MetadataStore;
pub use models::{
    Chunk, ChunkFailure, ChunkMetadata, GroundedAnswer, IngestionOutcome, IngestionReport,
    PendingDocument, SearchHit,
};
pub use retry::RetryPolicy;
pub use search::GlobalSearch;
pub use similarity::SimilarityEngine;
pub use traits::{ClientError, DocumentSource, EmbeddingClient, TextGenerator};
