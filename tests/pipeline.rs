//! Extraction pipeline tests
//!
//! Drives `TextExtractor` with in-process stand-ins for pdftotext, pdftoppm
//! and tesseract so the fallback rules can be checked without the tools.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pdfocr::ocr::{
    OcrBackend, OcrError, OcrResult, PageRenderer, TextLayerReader, OCR_SECTION_MARKER,
};
use pdfocr::{output_path_for, save_text, ExtractionError, ExtractionMethod, TextExtractor};
use tempfile::{NamedTempFile, TempDir};

const LONG_TEXT: &str =
    "Quarterly report. Revenue grew in every region and the board approved the budget.";

/// Text layer stand-in returning fixed page texts.
struct FakeReader {
    pages: Vec<String>,
}

impl FakeReader {
    fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl TextLayerReader for FakeReader {
    fn page_texts(&self, _: &Path) -> Result<Vec<String>, ExtractionError> {
        Ok(self.pages.clone())
    }
}

struct BrokenReader;

impl TextLayerReader for BrokenReader {
    fn page_texts(&self, _: &Path) -> Result<Vec<String>, ExtractionError> {
        Err(ExtractionError::MalformedPdf("pdftotext failed: Syntax Error".to_string()))
    }
}

/// Renderer stand-in that writes a small file per page and remembers where.
#[derive(Clone)]
struct FakeRenderer {
    pages: u32,
    rendered: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeRenderer {
    fn new(pages: u32) -> Self {
        Self {
            pages,
            rendered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn rendered(&self) -> Vec<PathBuf> {
        self.rendered.lock().unwrap().clone()
    }
}

impl PageRenderer for FakeRenderer {
    fn page_count(&self, _: &Path) -> Result<u32, ExtractionError> {
        Ok(self.pages)
    }

    fn render_page(
        &self,
        _: &Path,
        page: u32,
        output_dir: &Path,
    ) -> Result<PathBuf, ExtractionError> {
        let path = output_dir.join(format!("page-{}.png", page));
        std::fs::write(&path, format!("page {}", page))?;
        self.rendered.lock().unwrap().push(path.clone());
        Ok(path)
    }
}

/// OCR stand-in that "reads" the page number back out of the image file.
#[derive(Clone, Default)]
struct FakeOcr {
    calls: Arc<Mutex<usize>>,
    fail_on_call: Option<usize>,
}

impl FakeOcr {
    fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl OcrBackend for FakeOcr {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        "always available".to_string()
    }

    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if self.fail_on_call == Some(*calls) {
            return Err(OcrError::OcrFailed("tesseract failed: Error opening data file".into()));
        }
        let content = std::fs::read_to_string(image_path)?;
        Ok(OcrResult {
            text: format!("  OCR of {}\n", content),
            processing_time_ms: 1,
        })
    }
}

fn extractor(
    reader: impl TextLayerReader + 'static,
    renderer: &FakeRenderer,
    ocr: &FakeOcr,
) -> TextExtractor {
    TextExtractor::default()
        .with_reader(reader)
        .with_renderer(renderer.clone())
        .with_ocr_backend(ocr.clone())
}

fn pdf_file() -> NamedTempFile {
    tempfile::Builder::new().suffix(".pdf").tempfile().unwrap()
}

#[test]
fn long_text_layer_skips_ocr() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(2);
    let ocr = FakeOcr::default();
    let padded = format!("\n\n   {}   \n", LONG_TEXT);

    let result = extractor(FakeReader::new(&[&padded]), &renderer, &ocr)
        .extract(pdf.path())
        .unwrap();

    assert_eq!(result.text, LONG_TEXT);
    assert_eq!(result.method, ExtractionMethod::TextLayer);
    assert_eq!(ocr.calls(), 0);
    assert!(renderer.rendered().is_empty());
}

#[test]
fn text_layer_at_exact_threshold_skips_ocr() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(1);
    let ocr = FakeOcr::default();
    let fifty = "x".repeat(50);
    let fifty: &str = &fifty;

    let result = extractor(FakeReader::new(&[fifty]), &renderer, &ocr)
        .extract(pdf.path())
        .unwrap();

    assert_eq!(result.method, ExtractionMethod::TextLayer);
    assert_eq!(ocr.calls(), 0);
}

#[test]
fn scanned_pdf_uses_ocr_only() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(3);
    let ocr = FakeOcr::default();

    let result = extractor(FakeReader::new(&["", "  \n", ""]), &renderer, &ocr)
        .extract(pdf.path())
        .unwrap();

    assert_eq!(
        result.text,
        "OCR of page 1\n\n  OCR of page 2\n\n  OCR of page 3"
    );
    assert_eq!(result.method, ExtractionMethod::Ocr);
    assert_eq!(result.page_count, 3);
    assert_eq!(ocr.calls(), 3);
    assert!(!result.text.contains(OCR_SECTION_MARKER));
}

#[test]
fn short_text_layer_is_combined_with_ocr() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(1);
    let ocr = FakeOcr::default();

    let result = extractor(FakeReader::new(&["Page 1 of 1"]), &renderer, &ocr)
        .extract(pdf.path())
        .unwrap();

    assert_eq!(
        result.text,
        "Page 1 of 1\n\n[OCR EXTRACTED TEXT]\n\n  OCR of page 1"
    );
    assert_eq!(result.method, ExtractionMethod::Hybrid);
}

#[test]
fn missing_file_fails_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.pdf");
    let renderer = FakeRenderer::new(1);
    let ocr = FakeOcr::default();

    let err = extractor(FakeReader::new(&[LONG_TEXT]), &renderer, &ocr)
        .extract(&missing)
        .unwrap_err();

    assert!(matches!(err, ExtractionError::FileNotFound(p) if p == missing));
    assert_eq!(ocr.calls(), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(!output_path_for(&missing).exists());
}

#[test]
fn empty_everything_is_an_error_not_empty_text() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(0);
    let ocr = FakeOcr::default();

    let err = extractor(FakeReader::new(&[]), &renderer, &ocr)
        .extract(pdf.path())
        .unwrap_err();

    assert!(matches!(err, ExtractionError::NoTextFound));
}

#[test]
fn malformed_pdf_is_reported() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(1);
    let ocr = FakeOcr::default();

    let err = extractor(BrokenReader, &renderer, &ocr)
        .extract(pdf.path())
        .unwrap_err();

    assert!(matches!(err, ExtractionError::MalformedPdf(_)));
    assert_eq!(ocr.calls(), 0);
}

#[test]
fn ocr_failure_fails_the_extraction() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(3);
    let ocr = FakeOcr::failing_on(2);

    let err = extractor(FakeReader::new(&["short"]), &renderer, &ocr)
        .extract(pdf.path())
        .unwrap_err();

    assert!(matches!(err, ExtractionError::Ocr(OcrError::OcrFailed(_))));
    assert_eq!(ocr.calls(), 2);
}

#[test]
fn page_images_are_removed_after_extraction() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(2);
    let ocr = FakeOcr::default();

    extractor(FakeReader::new(&[]), &renderer, &ocr)
        .extract(pdf.path())
        .unwrap();

    let rendered = renderer.rendered();
    assert_eq!(rendered.len(), 2);
    for image in rendered {
        assert!(!image.exists(), "{} was left behind", image.display());
        assert!(!image.parent().unwrap().exists());
    }
}

#[test]
fn page_images_are_removed_when_ocr_fails() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(2);
    let ocr = FakeOcr::failing_on(1);

    let _ = extractor(FakeReader::new(&[]), &renderer, &ocr).extract(pdf.path());

    let rendered = renderer.rendered();
    assert_eq!(rendered.len(), 1);
    assert!(!rendered[0].exists());
}

#[test]
fn extraction_is_deterministic() {
    let pdf = pdf_file();
    let renderer = FakeRenderer::new(2);
    let ocr = FakeOcr::default();
    let extractor = extractor(FakeReader::new(&["tiny"]), &renderer, &ocr);

    let first = extractor.extract(pdf.path()).unwrap();
    let second = extractor.extract(pdf.path()).unwrap();

    assert_eq!(first.text.as_bytes(), second.text.as_bytes());
    assert_eq!(first, second);
}

#[test]
fn saved_file_matches_extracted_text() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("minutes.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();
    let renderer = FakeRenderer::new(1);
    let ocr = FakeOcr::default();

    let result = extractor(FakeReader::new(&[LONG_TEXT]), &renderer, &ocr)
        .extract(&pdf)
        .unwrap();
    let saved = save_text(&pdf, &result.text, false).unwrap();

    assert_eq!(saved, dir.path().join("minutes_extracted.txt"));
    assert_eq!(std::fs::read_to_string(saved).unwrap(), result.text);
}
