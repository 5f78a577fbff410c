//! Poppler-backed text layer reading and page rendering.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::extractor::ExtractionError;
use super::model_utils::{PDFINFO_NOT_FOUND, PDFTOPPM_NOT_FOUND, PDFTOTEXT_NOT_FOUND};
use crate::config::DEFAULT_DPI;

/// Reads the embedded text layer of a PDF.
pub trait TextLayerReader: Send + Sync {
    /// Return the text of each page, in page order.
    fn page_texts(&self, pdf_path: &Path) -> Result<Vec<String>, ExtractionError>;
}

/// Renders PDF pages to raster images.
pub trait PageRenderer: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self, pdf_path: &Path) -> Result<u32, ExtractionError>;

    /// Render one page (1-based) into `output_dir`, returning the image path.
    fn render_page(
        &self,
        pdf_path: &Path,
        page: u32,
        output_dir: &Path,
    ) -> Result<PathBuf, ExtractionError>;
}

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::MalformedPdf(format!(
                    "{}: {}",
                    error_prefix,
                    stderr.trim()
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Direct text extraction with `pdftotext`.
#[derive(Debug, Default, Clone)]
pub struct PdfToText;

impl PdfToText {
    pub fn new() -> Self {
        Self
    }
}

impl TextLayerReader for PdfToText {
    fn page_texts(&self, pdf_path: &Path) -> Result<Vec<String>, ExtractionError> {
        tracing::debug!("pdftotext {}", pdf_path.display());

        let output = Command::new("pdftotext")
            .args(["-enc", "UTF-8"])
            .arg(pdf_path)
            .arg("-") // Output to stdout
            .output();

        let stdout = handle_cmd_output(output, PDFTOTEXT_NOT_FOUND, "pdftotext failed")?;
        Ok(split_pages(&stdout))
    }
}

/// Split pdftotext output into pages.
///
/// pdftotext terminates every page with a form feed, so the piece after the
/// last one is not a page.
fn split_pages(output: &str) -> Vec<String> {
    let mut pages: Vec<String> = output.split('\x0c').map(str::to_string).collect();
    if output.ends_with('\x0c') || output.is_empty() {
        pages.pop();
    }
    pages
}

/// Page rendering with `pdfinfo` and `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdfToPpm {
    dpi: u32,
}

impl Default for PdfToPpm {
    fn default() -> Self {
        Self::new(DEFAULT_DPI)
    }
}

impl PdfToPpm {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl PageRenderer for PdfToPpm {
    fn page_count(&self, pdf_path: &Path) -> Result<u32, ExtractionError> {
        let output = Command::new("pdfinfo").arg(pdf_path).output();
        let stdout = handle_cmd_output(output, PDFINFO_NOT_FOUND, "pdfinfo failed")?;

        parse_page_count(&stdout).ok_or_else(|| {
            ExtractionError::MalformedPdf(format!(
                "pdfinfo reported no page count for {}",
                pdf_path.display()
            ))
        })
    }

    fn render_page(
        &self,
        pdf_path: &Path,
        page: u32,
        output_dir: &Path,
    ) -> Result<PathBuf, ExtractionError> {
        let page_str = page.to_string();
        let dpi_str = self.dpi.to_string();
        let output_prefix = output_dir.join("page");

        tracing::debug!("pdftoppm page {} of {} at {} dpi", page, pdf_path.display(), self.dpi);

        let output = Command::new("pdftoppm")
            .args(["-png", "-r", &dpi_str, "-f", &page_str, "-l", &page_str])
            .arg(pdf_path)
            .arg(&output_prefix)
            .output();

        handle_cmd_output(
            output,
            PDFTOPPM_NOT_FOUND,
            &format!("pdftoppm failed to convert page {}", page),
        )?;

        find_page_image(output_dir, page).ok_or_else(|| {
            ExtractionError::ExtractionFailed(format!("No image generated for page {}", page))
        })
    }
}

/// Read the `Pages:` line from pdfinfo output.
fn parse_page_count(info: &str) -> Option<u32> {
    info.lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
}

/// Find the image file for a specific page number.
///
/// pdftoppm names files like page-01.png, page-02.png, etc.
/// The padding width varies based on total page count.
fn find_page_image(temp_path: &Path, page_num: u32) -> Option<PathBuf> {
    std::fs::read_dir(temp_path)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| page_number(path) == Some(page_num))
}

/// Page number encoded in a `page-<digits>.png` file name.
fn page_number(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("page-")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}
