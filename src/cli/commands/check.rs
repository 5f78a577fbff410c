//! Check command: report which external tools are installed.

use console::style;

use pdfocr::ocr::{check_tools, OcrBackend, TesseractBackend};
use pdfocr::{ExtractorConfig, TextExtractor};

/// Print tool availability; fails if the OCR engine is unreachable.
pub fn cmd_check(config: &ExtractorConfig) -> anyhow::Result<()> {
    let separator = "─".repeat(40);

    println!();
    println!("{}", style("pdfocr tools").bold());
    println!("{}", separator);

    for (tool, available) in check_tools() {
        let mark = if available {
            style("found").green()
        } else {
            style("missing").red()
        };
        println!("  {:<20} {}", tool, mark);
    }

    println!("{}", separator);

    let extractor = TextExtractor::new(config);
    let backend = backend_status(extractor.ocr_backend())?;
    println!("  {:<20} {}", "OCR backend", backend);
    println!("  {:<20} {}", "OCR language", config.language);

    match TesseractBackend::version() {
        Ok(version) => {
            println!("  {:<20} {}", "tesseract version", version);
            Ok(())
        }
        Err(e) => anyhow::bail!("OCR engine unavailable: {}", e),
    }
}

/// One-line status of an OCR backend, or its install hint as the error.
fn backend_status(backend: &dyn OcrBackend) -> anyhow::Result<String> {
    if backend.is_available() {
        Ok(format!("{} ({})", backend.name(), style("available").green()))
    } else {
        anyhow::bail!(
            "OCR backend {} unavailable: {}",
            backend.name(),
            backend.availability_hint()
        )
    }
}
