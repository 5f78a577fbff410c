//! pdfocr - PDF text extraction with OCR fallback.
//!
//! Text is read from a PDF's text layer with Poppler's `pdftotext`. When that
//! yields too little, every page is rendered with `pdftoppm` and recognized
//! with Tesseract, and the results are merged.

pub mod config;
pub mod ocr;
pub mod output;

pub use config::ExtractorConfig;
pub use ocr::{ExtractionError, ExtractionMethod, ExtractionResult, TextExtractor};
pub use output::{output_path_for, save_text, SaveError};
