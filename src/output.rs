//! Saving extracted text next to the source PDF.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Suffix appended to the PDF's stem to name the output file.
pub const OUTPUT_SUFFIX: &str = "_extracted.txt";

/// Errors from writing an output file.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Output file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output path for a PDF: the path without its final extension plus
/// `_extracted.txt`.
///
/// `scans/report.pdf` becomes `scans/report_extracted.txt`.
pub fn output_path_for(pdf_path: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    pdf_path.with_file_name(format!("{}{}", stem, OUTPUT_SUFFIX))
}

/// Write `text` to the output file for `pdf_path`.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn save_text(pdf_path: &Path, text: &str, overwrite: bool) -> Result<PathBuf, SaveError> {
    let path = output_path_for(pdf_path);

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            SaveError::AlreadyExists(path.clone())
        } else {
            SaveError::Write {
                path: path.clone(),
                source: e,
            }
        }
    })?;

    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| SaveError::Write {
            path: path.clone(),
            source: e,
        })?;

    tracing::info!("Saved {} bytes to {}", text.len(), path.display());
    Ok(path)
}
