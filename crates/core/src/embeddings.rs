use crate::traits::{ClientError, EmbeddingClient};
use async_trait::async_trait;

/// Matches the dimension of the hosted embedding model so indexes built
/// against either client are interchangeable.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

/// Deterministic local embedder: hashed character trigram counts,
/// L2-normalized. No network, no model weights. Useful for offline runs
/// and tests; not a substitute for a learned embedding model.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions];
        let chars: Vec<char> = text.to_lowercase().chars().collect();
        if chars.len() < 3 {
            return vector;
        }

        for trigram in chars.windows(3) {
            let bucket = (fnv1a(trigram) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIMENSIONS)
    }
}

fn fnv1a(trigram: &[char]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for character in trigram {
        let mut buffer = [0u8; 4];
        for byte in character.encode_utf8(&mut buffer).bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
    }
    hash
}

#[async_trait]
impl EmbeddingClient for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError> {
        Ok(self.encode(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embedding_is_deterministic() {
        let embedder = HashEmbedder::new(64);
        let first = embedder.embed("Invoice for hydraulic pumps").await.unwrap();
        let second = embedder.embed("Invoice for hydraulic pumps").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn output_has_configured_dimension_and_unit_norm() {
        let embedder = HashEmbedder::new(32);
        let vector = embedder.embed("some document text").await.unwrap();
        assert_eq!(vector.len(), 32);

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn short_text_embeds_to_the_zero_vector() {
        let embedder = HashEmbedder::new(16);
        assert_eq!(embedder.embed("").await.unwrap(), vec![0.0; 16]);
        assert_eq!(embedder.embed("ab").await.unwrap(), vec![0.0; 16]);
    }

    #[tokio::test]
    async fn similar_texts_score_higher_than_unrelated_ones() {
        let embedder = HashEmbedder::new(128);
        let invoice_a = embedder.embed("invoice payment amount due").await.unwrap();
        let invoice_b = embedder.embed("invoice payment total amount").await.unwrap();
        let unrelated = embedder.embed("zebra quartz xylophone").await.unwrap();

        let related_score: f32 = invoice_a.iter().zip(&invoice_b).map(|(a, b)| a * b).sum();
        let unrelated_score: f32 = invoice_a.iter().zip(&unrelated).map(|(a, b)| a * b).sum();
        assert!(related_score > unrelated_score);
    }
}
