//! Fixed-size text chunking

use crate::config::ChunkingConfig;

/// Splits text into fixed-size, non-overlapping chunks.
///
/// Sizes are counted in Unicode scalar values, not bytes, so multi-byte
/// characters never get split. The final chunk carries the remainder and
/// may be shorter than the configured size.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
}

impl FixedSizeChunker {
    /// Create a chunker with an explicit chunk size
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        Self { chunk_size }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size)
    }

    /// Chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split text into chunks
    ///
    /// Empty input yields no chunks.
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(self.chunk_size)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunker = FixedSizeChunker::new(1000);
        assert!(chunker.chunk_text("").is_empty());
    }

    #[test]
    fn short_input_yields_one_chunk() {
        let chunker = FixedSizeChunker::new(1000);
        let chunks = chunker.chunk_text("hello world");
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let chunker = FixedSizeChunker::new(4);
        let chunks = chunker.chunk_text("abcdefgh");
        assert_eq!(chunks, vec!["abcd", "efgh"]);
    }

    #[test]
    fn concatenation_recovers_input() {
        let chunker = FixedSizeChunker::new(7);
        let text = "The quick brown fox jumps over the lazy dog";
        let chunks = chunker.chunk_text(text);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn all_chunks_full_except_possibly_last() {
        let chunker = FixedSizeChunker::new(10);
        let text = "a".repeat(35);
        let chunks = chunker.chunk_text(&text);
        assert_eq!(chunks.len(), 4);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.chars().count(), 10);
        }
        assert_eq!(chunks.last().map(|c| c.chars().count()), Some(5));
    }

    #[test]
    fn multibyte_characters_are_not_split() {
        let chunker = FixedSizeChunker::new(2);
        let chunks = chunker.chunk_text("héllø…");
        assert_eq!(chunks, vec!["hé", "ll", "ø…"]);
        assert_eq!(chunks.concat(), "héllø…");
    }

    #[test]
    fn default_config_uses_1000_chars() {
        let chunker = FixedSizeChunker::from_config(&ChunkingConfig::default());
        assert_eq!(chunker.chunk_size(), 1000);
        let text = "x".repeat(2500);
        let chunks = chunker.chunk_text(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 500);
    }
}
