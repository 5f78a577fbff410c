//! Extraction settings.
//!
//! There is no configuration file; the CLI builds an [`ExtractorConfig`] from
//! its flags and everything else uses the defaults.

use serde::{Deserialize, Serialize};

/// Default minimum trimmed character count before OCR fallback kicks in.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

/// Default render resolution for OCR page images.
pub const DEFAULT_DPI: u32 = 300;

/// Default Tesseract language.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Settings shared by the extractor and its external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Tesseract language code (e.g. "eng", "deu", "eng+fra").
    #[serde(default = "default_language")]
    pub language: String,
    /// Resolution used when rendering pages for OCR.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// Text layers shorter than this (trimmed, in characters) trigger OCR.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_dpi() -> u32 {
    DEFAULT_DPI
}

fn default_min_text_chars() -> usize {
    DEFAULT_MIN_TEXT_CHARS
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            dpi: default_dpi(),
            min_text_chars: default_min_text_chars(),
        }
    }
}

impl ExtractorConfig {
    /// Set the Tesseract language.
    pub fn with_language(mut self, lang: &str) -> Self {
        self.language = lang.to_string();
        self
    }

    /// Set the render resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the OCR fallback threshold.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_text_chars = min_chars;
        self
    }
}
