use crate::error::IngestError;
use crate::models::Chunk;

/// Window geometry for the sliding-window chunker. Constructed through
/// [`ChunkingConfig::new`] so an invalid overlap can never reach the
/// chunking loop.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    size: usize,
    overlap: usize,
}

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

impl ChunkingConfig {
    pub fn new(size: usize, overlap: usize) -> Result<Self, IngestError> {
        if size == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= size {
            return Err(IngestError::InvalidChunkConfig(format!(
                "overlap {overlap} must be smaller than chunk size {size}"
            )));
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// How far the window start advances each step. Always at least 1.
    pub fn step(&self) -> usize {
        self.size - self.overlap
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Splits `text` into overlapping windows of `config.size()` chars, the
/// last window possibly shorter. Identical inputs always produce the same
/// ordered sequence; chunk ids assigned downstream depend on that.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let end = (start + config.size()).min(chars.len());
        chunks.push(Chunk {
            text: chars[start..end].iter().collect(),
            source_offset: start,
        });
        start += config.step();
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_have_fixed_size_except_the_last() {
        let config = ChunkingConfig::new(100, 10).unwrap();
        let text = "a".repeat(1000);
        let chunks = chunk_text(&text, &config);

        assert!(chunks.len() > 1);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.text.chars().count(), 100);
        }
        assert!(chunks.last().unwrap().text.chars().count() <= 100);
    }

    #[test]
    fn offsets_advance_by_size_minus_overlap() {
        let config = ChunkingConfig::new(5, 2).unwrap();
        let chunks = chunk_text("abcdefghij", &config);

        let offsets: Vec<usize> = chunks.iter().map(|chunk| chunk.source_offset).collect();
        assert_eq!(offsets, vec![0, 3, 6, 9]);
        assert_eq!(chunks[0].text, "abcde");
        assert_eq!(chunks[1].text, "defgh");
        assert_eq!(chunks[3].text, "j");
    }

    #[test]
    fn overlapping_windows_reconstruct_the_source() {
        let config = ChunkingConfig::new(7, 3).unwrap();
        let text = "The quick brown fox jumps over the lazy dog";
        let chunks = chunk_text(text, &config);

        let mut rebuilt = String::new();
        for chunk in &chunks {
            let fresh: String = chunk.text.chars().skip(rebuilt.len() - chunk.source_offset).collect();
            rebuilt.push_str(&fresh);
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let config = ChunkingConfig::default();
        assert!(chunk_text("", &config).is_empty());
    }

    #[test]
    fn chunking_is_deterministic() {
        let config = ChunkingConfig::new(16, 4).unwrap();
        let text = "Invoice #INV-2024-001, total amount $5,000, due January 5.";
        assert_eq!(chunk_text(text, &config), chunk_text(text, &config));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            ChunkingConfig::new(0, 0),
            Err(IngestError::InvalidChunkConfig(_))
        ));
    }

    #[test]
    fn overlap_equal_to_size_is_rejected() {
        assert!(matches!(
            ChunkingConfig::new(10, 10),
            Err(IngestError::InvalidChunkConfig(_))
        ));
        assert!(matches!(
            ChunkingConfig::new(10, 11),
            Err(IngestError::InvalidChunkConfig(_))
        ));
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let config = ChunkingConfig::new(4, 1).unwrap();
        let chunks = chunk_text("héllo wörld", &config);
        assert_eq!(chunks[0].text, "héll");
        assert_eq!(chunks[1].text, "lo w");
    }
}
