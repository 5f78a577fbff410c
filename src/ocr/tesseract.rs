//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text extraction.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use super::backend::{OcrBackend, OcrError, OcrResult};
use super::model_utils::{check_binary, TESSERACT_NOT_FOUND};
use crate::config::DEFAULT_LANGUAGE;

/// Tesseract OCR backend.
pub struct TesseractBackend {
    language: String,
}

impl TesseractBackend {
    /// Create a new Tesseract backend using the default language.
    pub fn new() -> Self {
        Self::with_language(DEFAULT_LANGUAGE)
    }

    /// Create a new Tesseract backend for a specific language.
    pub fn with_language(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    /// Query the installed Tesseract version.
    ///
    /// This is the reachability check run at startup: it fails with
    /// [`OcrError::BackendNotAvailable`] when the executable cannot be found.
    pub fn version() -> Result<String, OcrError> {
        let output = Command::new("tesseract").arg("--version").output();

        match output {
            Ok(output) if output.status.success() => {
                // Older releases print the banner on stderr.
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                parse_version(&stdout)
                    .or_else(|| parse_version(&stderr))
                    .ok_or_else(|| {
                        OcrError::OcrFailed("could not parse tesseract --version".to_string())
                    })
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::OcrFailed(format!(
                    "tesseract --version failed: {}",
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                OcrError::BackendNotAvailable(format!("{} not found", TESSERACT_NOT_FOUND)),
            ),
            Err(e) => Err(OcrError::Io(e)),
        }
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        tracing::debug!("tesseract {} (lang {})", image_path.display(), self.language);

        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                OcrError::BackendNotAvailable(format!("{} not found", TESSERACT_NOT_FOUND)),
            ),
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the version out of a `tesseract --version` banner ("tesseract 5.3.0").
fn parse_version(banner: &str) -> Option<String> {
    banner
        .lines()
        .find_map(|line| line.trim().strip_prefix("tesseract "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract")
    }

    fn availability_hint(&self) -> String {
        if !check_binary("tesseract") {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        } else {
            "Tesseract is available".to_string()
        }
    }

    fn ocr_image(&self, image_path: &Path) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let text = self.run_tesseract(image_path)?;
        let elapsed = start.elapsed();

        Ok(OcrResult {
            text,
            processing_time_ms: elapsed.as_millis() as u64,
        })
    }
}
