//! Command-line interface for pdfocr.

mod app;
mod commands;
mod view;

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

pub use commands::{run, Cli};

/// Location of the log file used while the full-screen shell is running.
pub fn log_file_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pdfocr")
        .join("pdfocr.log")
}

/// Open (appending) the shell's log file, creating its directory.
pub fn open_log_file() -> std::io::Result<File> {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
