//! Shared helpers for locating the external tools.

/// Hint shown when pdftoppm is missing.
pub const PDFTOPPM_NOT_FOUND: &str = "pdftoppm (install poppler-utils)";

/// Hint shown when pdftotext is missing.
pub const PDFTOTEXT_NOT_FOUND: &str = "pdftotext (install poppler-utils)";

/// Hint shown when pdfinfo is missing.
pub const PDFINFO_NOT_FOUND: &str = "pdfinfo (install poppler-utils)";

/// Hint shown when tesseract is missing.
pub const TESSERACT_NOT_FOUND: &str = "tesseract (install tesseract-ocr)";

/// Tools the extractor shells out to.
const REQUIRED_TOOLS: [&str; 4] = ["pdftotext", "pdftoppm", "pdfinfo", "tesseract"];

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Check if required tools are available.
pub fn check_tools() -> Vec<(String, bool)> {
    REQUIRED_TOOLS
        .iter()
        .map(|tool| (tool.to_string(), check_binary(tool)))
        .collect()
}
