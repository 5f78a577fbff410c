//! Text extraction from PDFs using pdftotext with a Tesseract fallback.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;
use thiserror::Error;

use super::backend::{OcrBackend, OcrError};
use super::poppler::{PageRenderer, PdfToPpm, PdfToText, TextLayerReader};
use super::tesseract::TesseractBackend;
use crate::config::ExtractorConfig;

/// Label placed between a short text layer and the OCR output.
pub const OCR_SECTION_MARKER: &str = "[OCR EXTRACTED TEXT]";

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Unreadable or malformed PDF: {0}")]
    MalformedPdf(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("No text could be extracted")]
    NoTextFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of text extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Extracted text content, trimmed and never empty.
    pub text: String,
    /// Method used for extraction.
    pub method: ExtractionMethod,
    /// Number of pages processed.
    pub page_count: u32,
}

/// Method used to extract text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Direct text extraction from the PDF text layer.
    TextLayer,
    /// OCR only; the text layer was empty.
    Ocr,
    /// Short text layer followed by the OCR output.
    Hybrid,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::TextLayer => "text layer",
            ExtractionMethod::Ocr => "OCR",
            ExtractionMethod::Hybrid => "text layer + OCR",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text extractor that delegates to external tools.
pub struct TextExtractor {
    /// Minimum trimmed characters before OCR is skipped.
    min_text_chars: usize,
    reader: Box<dyn TextLayerReader>,
    renderer: Box<dyn PageRenderer>,
    ocr: Box<dyn OcrBackend>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl TextExtractor {
    /// Create an extractor backed by Poppler and Tesseract.
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            min_text_chars: config.min_text_chars,
            reader: Box::new(PdfToText::new()),
            renderer: Box::new(PdfToPpm::new(config.dpi)),
            ocr: Box::new(TesseractBackend::with_language(&config.language)),
        }
    }

    /// Set minimum characters threshold.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_text_chars = min_chars;
        self
    }

    /// Replace the text layer reader.
    pub fn with_reader(mut self, reader: impl TextLayerReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Replace the page renderer.
    pub fn with_renderer(mut self, renderer: impl PageRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Replace the OCR backend.
    pub fn with_ocr_backend(mut self, backend: impl OcrBackend + 'static) -> Self {
        self.ocr = Box::new(backend);
        self
    }

    /// The OCR backend in use.
    pub fn ocr_backend(&self) -> &dyn OcrBackend {
        self.ocr.as_ref()
    }

    /// Extract text from a PDF, running OCR when the text layer is too short.
    pub fn extract(&self, file_path: &Path) -> Result<ExtractionResult, ExtractionError> {
        if !file_path.is_file() {
            tracing::warn!("File not found: {}", file_path.display());
            return Err(ExtractionError::FileNotFound(file_path.to_path_buf()));
        }

        let result = self.extract_pdf(file_path);
        match &result {
            Ok(r) => tracing::info!(
                "Extracted {} chars from {} via {}",
                r.text.chars().count(),
                file_path.display(),
                r.method
            ),
            Err(e) => tracing::error!("Error processing {}: {}", file_path.display(), e),
        }
        result
    }

    fn extract_pdf(&self, file_path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let pages = self.reader.page_texts(file_path)?;
        let text_pages = pages.len() as u32;
        let text = pages
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let text_chars = text.trim().chars().count();
        if text_chars >= self.min_text_chars {
            return finish(text, ExtractionMethod::TextLayer, text_pages);
        }

        tracing::info!(
            "Text layer has {} chars (< {}), attempting OCR extraction",
            text_chars,
            self.min_text_chars
        );

        let (ocr_text, page_count) = self.ocr_pdf(file_path)?;

        if text.is_empty() {
            finish(ocr_text, ExtractionMethod::Ocr, page_count)
        } else {
            let combined = format!("{}\n\n{}\n\n{}", text, OCR_SECTION_MARKER, ocr_text);
            finish(combined, ExtractionMethod::Hybrid, page_count)
        }
    }

    /// OCR a PDF by rendering each page and running the OCR backend on it.
    ///
    /// Each page image lives in its own temp directory that is removed as
    /// soon as the page is done, whether OCR succeeded or not.
    fn ocr_pdf(&self, file_path: &Path) -> Result<(String, u32), ExtractionError> {
        let page_count = self.renderer.page_count(file_path)?;
        let mut page_texts = Vec::with_capacity(page_count as usize);

        for page in 1..=page_count {
            let temp_dir = TempDir::new()?;
            let image_path = self
                .renderer
                .render_page(file_path, page, temp_dir.path())?;
            let result = self.ocr.ocr_image(&image_path)?;

            tracing::debug!(
                "{} read page {}/{} in {}ms",
                self.ocr.name(),
                page,
                page_count,
                result.processing_time_ms
            );
            page_texts.push(result.text);
        }

        Ok((page_texts.join("\n"), page_count))
    }
}

/// Trim and enforce the non-empty invariant.
fn finish(
    text: String,
    method: ExtractionMethod,
    page_count: u32,
) -> Result<ExtractionResult, ExtractionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::NoTextFound);
    }
    Ok(ExtractionResult {
        text: text.to_string(),
        method,
        page_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    struct StaticReader(Vec<&'static str>);

    impl TextLayerReader for StaticReader {
        fn page_texts(&self, _: &Path) -> Result<Vec<String>, ExtractionError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct OnePageRenderer;

    impl PageRenderer for OnePageRenderer {
        fn page_count(&self, _: &Path) -> Result<u32, ExtractionError> {
            Ok(1)
        }

        fn render_page(&self, _: &Path, page: u32, dir: &Path) -> Result<PathBuf, ExtractionError> {
            let path = dir.join(format!("page-{}.png", page));
            std::fs::write(&path, b"png")?;
            Ok(path)
        }
    }

    struct CountingOcr(Arc<AtomicUsize>);

    impl OcrBackend for CountingOcr {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn availability_hint(&self) -> String {
            String::new()
        }

        fn ocr_image(&self, _: &Path) -> Result<OcrResult, OcrError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(OcrResult {
                text: "scanned".to_string(),
                processing_time_ms: 0,
            })
        }
    }

    fn extractor(pages: Vec<&'static str>, calls: Arc<AtomicUsize>) -> TextExtractor {
        TextExtractor::default()
            .with_reader(StaticReader(pages))
            .with_renderer(OnePageRenderer)
            .with_ocr_backend(CountingOcr(calls))
    }

    #[test]
    fn test_threshold_counts_characters_not_bytes() {
        // 30 two-byte characters: 60 bytes, but still under 50 chars.
        let short: &'static str = "éééééééééééééééééééééééééééééé";
        let pdf = NamedTempFile::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let result = extractor(vec![short], calls.clone())
            .extract(pdf.path())
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.method, ExtractionMethod::Hybrid);
    }

    #[test]
    fn test_blank_pages_are_dropped_before_joining() {
        let pdf = NamedTempFile::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let result = extractor(vec!["alpha", "   \n", "beta"], calls)
            .with_min_chars(5)
            .extract(pdf.path())
            .unwrap();

        assert_eq!(result.text, "alpha\nbeta");
        assert_eq!(result.method, ExtractionMethod::TextLayer);
        assert_eq!(result.page_count, 3);
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let err = extractor(vec!["text"], calls.clone())
            .extract(dir.path())
            .unwrap_err();

        assert!(matches!(err, ExtractionError::FileNotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(ExtractionMethod::TextLayer.to_string(), "text layer");
        assert_eq!(ExtractionMethod::Hybrid.to_string(), "text layer + OCR");
    }

    #[test]
    fn test_method_serializes_snake_case() {
        let json = serde_json::to_string(&ExtractionMethod::TextLayer).unwrap();
        assert_eq!(json, "\"text_layer\"");
    }
}
