//! OCR engine abstraction for image uploads

use async_trait::async_trait;
use std::io::Write;

use crate::config::OcrConfig;
use crate::error::{Error, Result};

/// Trait for optical character recognition
///
/// Implementations:
/// - `TesseractOcr`: shells out to the tesseract CLI
/// - test mocks
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in an image
    ///
    /// An image with no recognizable text yields `Ok("")`, not an error.
    async fn recognize(&self, image_bytes: &[u8], extension: &str) -> Result<String>;

    /// Whether the engine is configured and usable
    fn is_enabled(&self) -> bool;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// OCR via the tesseract command-line tool
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image_bytes: &[u8], extension: &str) -> Result<String> {
        if !self.config.enabled {
            tracing::debug!("OCR disabled, returning empty text");
            return Ok(String::new());
        }

        // tesseract wants a file path, so stage the bytes in a temp file
        let mut input = tempfile::Builder::new()
            .suffix(&format!(".{}", extension))
            .tempfile()
            .map_err(|e| Error::internal(format!("Failed to create temp file: {}", e)))?;
        input
            .write_all(image_bytes)
            .map_err(|e| Error::internal(format!("Failed to write temp file: {}", e)))?;

        let output = tokio::process::Command::new(&self.config.tesseract_path)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .output()
            .await
            .map_err(|e| {
                Error::internal(format!(
                    "Failed to run {}: {}",
                    self.config.tesseract_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::internal(format!(
                "tesseract exited with {}: {}",
                output.status, stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
