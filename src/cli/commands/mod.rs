//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod extract;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use pdfocr::config::{DEFAULT_DPI, DEFAULT_LANGUAGE, DEFAULT_MIN_TEXT_CHARS};
use pdfocr::ocr::TesseractBackend;
use pdfocr::ExtractorConfig;

#[derive(Parser, Debug)]
#[command(name = "pdfocr")]
#[command(about = "Extract text from PDFs, with OCR fallback for scanned pages")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Tesseract language (e.g. eng, deu, eng+fra)
    #[arg(short = 'l', long = "lang", global = true, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Render resolution for OCR pages
    #[arg(long, global = true, default_value_t = DEFAULT_DPI)]
    dpi: u32,

    /// Text layers shorter than this many characters are supplemented with OCR
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_TEXT_CHARS)]
    min_chars: usize,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract text from a PDF and save it next to the file
    Extract {
        /// PDF to extract (prompted for if omitted)
        pdf: Option<PathBuf>,
        /// Print only, don't write the _extracted.txt file
        #[arg(long)]
        no_save: bool,
        /// Overwrite an existing _extracted.txt file
        #[arg(short, long)]
        force: bool,
        /// Print the full result as JSON instead of a preview
        #[arg(long)]
        json: bool,
        /// Number of characters to show in the preview
        #[arg(long, default_value = "2000")]
        preview_chars: usize,
    },

    /// Interactive terminal UI (default)
    Ui {
        /// PDF to open immediately, or directory to start browsing in
        path: Option<PathBuf>,
    },

    /// Check that the external tools are installed
    Check,
}

impl Cli {
    /// Whether this invocation takes over the terminal.
    pub fn is_fullscreen(&self) -> bool {
        matches!(self.command, None | Some(Commands::Ui { .. }))
    }

    fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::default()
            .with_language(&self.language)
            .with_dpi(self.dpi)
            .with_min_chars(self.min_chars)
    }
}

/// Run the CLI.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.extractor_config();
    tracing::info!("Extractor config: {}", serde_json::to_string(&config)?);

    match cli.command.unwrap_or(Commands::Ui { path: None }) {
        Commands::Check => check::cmd_check(&config),
        Commands::Extract {
            pdf,
            no_save,
            force,
            json,
            preview_chars,
        } => {
            verify_ocr_engine();
            let options = extract::ExtractOptions {
                save: !no_save,
                force,
                json,
                preview_chars,
            };
            extract::cmd_extract(&config, pdf, options).await
        }
        Commands::Ui { path } => {
            verify_ocr_engine();
            ui::cmd_ui(&config, path)
        }
    }
}

/// Exit the process if Tesseract cannot be reached.
fn verify_ocr_engine() {
    match TesseractBackend::version() {
        Ok(version) => tracing::debug!("Using tesseract {}", version),
        Err(e) => {
            eprintln!("{} Tesseract OCR is not installed or not in PATH", style("✗").red());
            eprintln!("  {}", e);
            eprintln!(
                "  Install from {}",
                style("https://tesseract-ocr.github.io/tessdoc/Installation.html").cyan()
            );
            std::process::exit(1);
        }
    }
}
