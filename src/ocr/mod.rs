//! Text extraction and OCR.
//!
//! Extracts text from PDFs using:
//! - pdftotext (Poppler) for the embedded text layer
//! - pdfinfo + pdftoppm (Poppler) to render pages for OCR
//! - Tesseract OCR for the rendered pages
//!
//! Each external tool sits behind a trait ([`TextLayerReader`],
//! [`PageRenderer`], [`OcrBackend`]) so the extractor can be driven by other
//! implementations.

mod backend;
mod extractor;
mod model_utils;
mod poppler;
mod tesseract;

pub use backend::{OcrBackend, OcrError, OcrResult};
pub use extractor::{
    ExtractionError, ExtractionMethod, ExtractionResult, TextExtractor, OCR_SECTION_MARKER,
};
pub use model_utils::{check_binary, check_tools, PDFTOPPM_NOT_FOUND, TESSERACT_NOT_FOUND};
pub use poppler::{PageRenderer, PdfToPpm, PdfToText, TextLayerReader};
pub use tesseract::TesseractBackend;
