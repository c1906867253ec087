//! Text extraction from uploaded files

pub mod extractor;
pub mod ocr;

pub use extractor::TextExtractor;
pub use ocr::{OcrEngine, TesseractOcr};

use sha2::{Digest, Sha256};

/// Extractions shorter than this (trimmed) are treated as unusable. The PDF
/// path uses it to flag scanned documents; the ingestion pipeline uses it to
/// skip the AI steps for a degraded upload.
pub const MIN_EXTRACTED_CHARS: usize = 10;

/// Hash extracted text for deduplication
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_hex() {
        let a = hash_content("hello");
        let b = hash_content("hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash_content("hello"), hash_content("world"));
    }
}
