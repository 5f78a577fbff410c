//! pdfocr - extract text from PDFs, falling back to OCR for scanned pages.

mod cli;

use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity
    let default_filter = if cli.verbose {
        "pdfocr=info"
    } else {
        "pdfocr=warn"
    };

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()));

    // The full-screen shell owns the terminal, so its logs go to a file.
    if cli.is_fullscreen() {
        match cli::open_log_file() {
            Ok(file) => registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init(),
            Err(_) => registry.init(),
        }
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    // Run CLI
    cli::run(cli).await
}
