//! Text extraction dispatch for the supported upload formats

use calamine::Reader;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::FileType;

use super::ocr::OcrEngine;
use super::MIN_EXTRACTED_CHARS;

/// Extracts plain text from uploaded file bytes.
///
/// Dispatches on the declared MIME type, falling back to a guess from the
/// filename extension. Images are routed through the configured OCR engine;
/// for those, empty output is a valid result, not a failure.
pub struct TextExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    /// Resolve the file type from the declared MIME, then the filename
    pub fn resolve_file_type(filename: &str, declared_mime: &str) -> FileType {
        let from_mime = FileType::from_mime(declared_mime);
        if from_mime != FileType::Unknown {
            return from_mime;
        }

        let guessed = mime_guess::from_path(filename).first_raw().unwrap_or("");
        let from_guess = FileType::from_mime(guessed);
        if from_guess != FileType::Unknown {
            return from_guess;
        }

        filename
            .rsplit('.')
            .next()
            .map(FileType::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    /// Extract plain text from file bytes
    pub async fn extract(
        &self,
        filename: &str,
        declared_mime: &str,
        bytes: &[u8],
    ) -> Result<String> {
        let file_type = Self::resolve_file_type(filename, declared_mime);
        tracing::debug!(
            filename,
            file_type = file_type.display_name(),
            "Extracting text"
        );

        match file_type {
            FileType::Txt => extract_txt(filename, bytes),
            FileType::Pdf => {
                let filename = filename.to_string();
                let bytes = bytes.to_vec();
                tokio::task::spawn_blocking(move || extract_pdf(&filename, &bytes))
                    .await
                    .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))?
            }
            FileType::Docx => {
                let filename = filename.to_string();
                let bytes = bytes.to_vec();
                tokio::task::spawn_blocking(move || extract_docx(&filename, &bytes))
                    .await
                    .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))?
            }
            FileType::Xlsx => {
                let filename = filename.to_string();
                let bytes = bytes.to_vec();
                tokio::task::spawn_blocking(move || extract_xlsx(&filename, &bytes))
                    .await
                    .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))?
            }
            FileType::Csv => {
                let filename = filename.to_string();
                let bytes = bytes.to_vec();
                tokio::task::spawn_blocking(move || extract_csv(&filename, &bytes))
                    .await
                    .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))?
            }
            FileType::Image => {
                let extension = filename.rsplit('.').next().unwrap_or("png");
                self.ocr.recognize(bytes, extension).await
            }
            FileType::Unknown => Err(Error::UnsupportedFileType(format!(
                "'{}' ({}). Supported: txt, pdf, docx, xlsx, csv, images",
                filename, declared_mime
            ))),
        }
    }
}

fn extract_txt(filename: &str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::extraction(filename, "File is not valid UTF-8 text"))
}

fn extract_pdf(filename: &str, bytes: &[u8]) -> Result<String> {
    let text = match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(filename, "pdf-extract failed ({}), trying lopdf", e);
            extract_pdf_lopdf(filename, bytes)?
        }
    };

    reject_scanned_pdf(filename, text)
}

/// A trimmed text layer below the usable threshold means the pages are
/// almost certainly scans with no embedded text
fn reject_scanned_pdf(filename: &str, text: String) -> Result<String> {
    if text.trim().chars().count() < MIN_EXTRACTED_CHARS {
        return Err(Error::extraction(
            filename,
            "PDF contains almost no extractable text (likely a scanned/image-only document)",
        ));
    }
    Ok(text)
}

fn extract_pdf_lopdf(filename: &str, bytes: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| Error::extraction(filename, format!("Failed to load PDF: {}", e)))?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    doc.extract_text(&pages)
        .map_err(|e| Error::extraction(filename, format!("Failed to extract PDF text: {}", e)))
}

fn extract_docx(filename: &str, bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| Error::extraction(filename, format!("Failed to read DOCX: {}", e)))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for para_child in &paragraph.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

fn extract_csv(filename: &str, bytes: &[u8]) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut text = String::new();
    for record in reader.records() {
        let record = record
            .map_err(|e| Error::extraction(filename, format!("Failed to parse CSV: {}", e)))?;
        let cells: Vec<&str> = record.iter().collect();
        text.push_str(&cells.join(" | "));
        text.push('\n');
    }
    Ok(text)
}

fn extract_xlsx(filename: &str, bytes: &[u8]) -> Result<String> {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| Error::extraction(filename, format!("Failed to open workbook: {}", e)))?;

    let mut sheets = Vec::new();
    for sheet_name in workbook.sheet_names().to_owned() {
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            Error::extraction(filename, format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        sheets.push(format!(
            "Sheet: {}\n{}",
            sheet_name,
            rows_to_csv(filename, &rows)?
        ));
    }
    Ok(sheets.join("\n"))
}

/// Render sheet rows as CSV so commas and quotes inside cells survive
fn rows_to_csv(filename: &str, rows: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| Error::extraction(filename, format!("Failed to render CSV: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::extraction(filename, format!("Failed to render CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|_| Error::extraction(filename, "CSV rendering produced invalid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubOcr {
        text: String,
    }

    #[async_trait]
    impl OcrEngine for StubOcr {
        async fn recognize(&self, _image_bytes: &[u8], _extension: &str) -> Result<String> {
            Ok(self.text.clone())
        }

        fn is_enabled(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "stub-ocr"
        }
    }

    fn extractor_with_ocr(text: &str) -> TextExtractor {
        TextExtractor::new(Arc::new(StubOcr {
            text: text.to_string(),
        }))
    }

    #[test]
    fn resolves_type_from_declared_mime_first() {
        assert_eq!(
            TextExtractor::resolve_file_type("weird.bin", "application/pdf"),
            FileType::Pdf
        );
    }

    #[test]
    fn falls_back_to_filename_when_mime_is_generic() {
        assert_eq!(
            TextExtractor::resolve_file_type("report.pdf", "application/octet-stream"),
            FileType::Pdf
        );
        assert_eq!(
            TextExtractor::resolve_file_type("photo.jpeg", ""),
            FileType::Image
        );
    }

    #[tokio::test]
    async fn extracts_utf8_text() {
        let extractor = extractor_with_ocr("");
        let text = extractor
            .extract("notes.txt", "text/plain", "hello world".as_bytes())
            .await
            .unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn invalid_utf8_text_is_an_extraction_error() {
        let extractor = extractor_with_ocr("");
        let result = extractor
            .extract("notes.txt", "text/plain", &[0xff, 0xfe, 0x00])
            .await;
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }

    #[tokio::test]
    async fn unknown_type_is_rejected() {
        let extractor = extractor_with_ocr("");
        let result = extractor
            .extract("archive.zip", "application/zip", b"PK")
            .await;
        assert!(matches!(result, Err(Error::UnsupportedFileType(_))));
    }

    #[tokio::test]
    async fn images_go_through_ocr() {
        let extractor = extractor_with_ocr("recognized words");
        let text = extractor
            .extract("scan.png", "image/png", b"fake image bytes")
            .await
            .unwrap();
        assert_eq!(text, "recognized words");
    }

    #[tokio::test]
    async fn ocr_empty_output_is_ok() {
        let extractor = extractor_with_ocr("");
        let text = extractor
            .extract("scan.png", "image/png", b"fake image bytes")
            .await
            .unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn csv_rows_are_joined_with_pipes() {
        let extractor = extractor_with_ocr("");
        let text = extractor
            .extract("grades.csv", "text/csv", b"name,score\nalice,92\nbob,85\n")
            .await
            .unwrap();
        assert_eq!(text, "name | score\nalice | 92\nbob | 85\n");
    }

    #[test]
    fn near_empty_pdf_text_layer_reads_as_scanned() {
        // A page number or stray glyph is not a usable text layer
        let result = reject_scanned_pdf("scan.pdf", "p. 3\n".to_string());
        assert!(matches!(result, Err(Error::Extraction { .. })));

        let kept = reject_scanned_pdf("real.pdf", "A full paragraph of text.".to_string());
        assert_eq!(kept.unwrap(), "A full paragraph of text.");
    }

    #[test]
    fn sheet_rows_render_as_csv() {
        let rows = vec![
            vec!["name".to_string(), "note".to_string()],
            vec!["alice".to_string(), "likes, commas".to_string()],
        ];
        let rendered = rows_to_csv("grades.xlsx", &rows).unwrap();
        assert_eq!(rendered, "name,note\nalice,\"likes, commas\"\n");
    }

    #[test]
    fn csv_rendering_tolerates_uneven_rows() {
        let rows = vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string()],
        ];
        let rendered = rows_to_csv("uneven.xlsx", &rows).unwrap();
        assert_eq!(rendered, "a\nb,c\n");
    }

    #[tokio::test]
    async fn garbage_pdf_is_an_extraction_error() {
        let extractor = extractor_with_ocr("");
        let result = extractor
            .extract("broken.pdf", "application/pdf", b"not a pdf at all")
            .await;
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }

    #[tokio::test]
    async fn garbage_docx_is_an_extraction_error() {
        let extractor = extractor_with_ocr("");
        let result = extractor
            .extract(
                "broken.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                b"not a docx",
            )
            .await;
        assert!(matches!(result, Err(Error::Extraction { .. })));
    }
}
