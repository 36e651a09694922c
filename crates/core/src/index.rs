use crate::error::IngestError;
use crate::models::{ChunkMetadata, SearchHit};
use std::sync::{PoisonError, RwLock};

struct IndexedEntry {
    vector: Vec<f32>,
    text: String,
    metadata: Option<ChunkMetadata>,
}

/// Append-only, in-memory exact nearest-neighbor index.
///
/// Every entry's vector must have exactly the dimension the index was
/// created with; positions are dense, stable, and never reused. Ranking
/// uses cosine similarity. Appends are serialized behind a write lock and
/// become visible to readers atomically, so a reader never observes a
/// vector without its text and metadata.
pub struct VectorIndex {
    dimensions: usize,
    entries: RwLock<Vec<IndexedEntry>>,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends one entry and returns its position. A dimension mismatch
    /// fails before any mutation, leaving the index unchanged.
    pub fn add(
        &self,
        vector: Vec<f32>,
        text: String,
        metadata: Option<ChunkMetadata>,
    ) -> Result<usize, IngestError> {
        if vector.len() != self.dimensions {
            return Err(IngestError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.push(IndexedEntry {
            vector,
            text,
            metadata,
        });
        Ok(entries.len() - 1)
    }

    /// Returns up to `top_k` entries ordered from most to least similar.
    /// Ties are stable: among equal scores, earlier insertions rank
    /// earlier. An empty index yields an empty result, never an error.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<SearchHit> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if entries.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_similarity(&entry.vector, query)))
            .collect();
        // Stable sort keeps insertion order among exactly equal scores.
        ranked.sort_by(|left, right| right.1.total_cmp(&left.1));

        ranked
            .into_iter()
            .take(top_k.min(entries.len()))
            .map(|(position, score)| {
                let entry = &entries[position];
                SearchHit {
                    text: entry.text.clone(),
                    metadata: entry.metadata.clone(),
                    score,
                }
            })
            .collect()
    }
}

fn cosine_similarity(vector: &[f32], query: &[f32]) -> f32 {
    let dot: f32 = vector.iter().zip(query.iter()).map(|(a, b)| a * b).sum();
    let vector_norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    let query_norm = query.iter().map(|v| v * v).sum::<f32>().sqrt();

    if vector_norm == 0.0 || query_norm == 0.0 {
        0.0
    } else {
        dot / (vector_norm * query_norm)
    }
}
