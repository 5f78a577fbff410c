//! Extract command: one-shot extraction with a preview and saved output.

use std::path::{Path, PathBuf};

use console::{style, Term};

use pdfocr::{save_text, ExtractorConfig, SaveError, TextExtractor};

/// Flags for the extract command.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub save: bool,
    pub force: bool,
    pub json: bool,
    pub preview_chars: usize,
}

/// Extract text from a PDF, print it and save it beside the PDF.
pub async fn cmd_extract(
    config: &ExtractorConfig,
    pdf: Option<PathBuf>,
    options: ExtractOptions,
) -> anyhow::Result<()> {
    if !options.json {
        println!("{}", style("PDF Text Extractor").bold());
        println!("{}", "─".repeat(18));
    }

    let pdf_path = match pdf {
        Some(path) => path,
        None => prompt_for_path()?,
    };

    let extractor = TextExtractor::new(config);
    let path = pdf_path.clone();
    let result = tokio::task::spawn_blocking(move || extractor.extract(&path))
        .await?
        .map_err(|e| anyhow::anyhow!(e).context("No text could be extracted from the PDF"))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "{} {}",
            style("Extracted Text").cyan().bold(),
            style(format!("({}, {} pages)", result.method, result.page_count)).dim()
        );
        println!("{}", "─".repeat(15));
        println!("{}", preview(&result.text, options.preview_chars));
    }

    if let Some(path) = save_output(&pdf_path, &result.text, &options)? {
        let message = format!("Full text saved to: {}", path.display());
        if options.json {
            eprintln!("{}", message);
        } else {
            println!();
            println!("{}", message);
        }
    }

    Ok(())
}

/// Write the text beside the PDF as the options allow.
///
/// Returns the written path, or `None` with `--no-save`. An existing file is
/// only replaced with `--force`.
fn save_output(
    pdf_path: &Path,
    text: &str,
    options: &ExtractOptions,
) -> anyhow::Result<Option<PathBuf>> {
    if !options.save {
        return Ok(None);
    }

    match save_text(pdf_path, text, options.force) {
        Ok(path) => Ok(Some(path)),
        Err(SaveError::AlreadyExists(path)) => anyhow::bail!(
            "{} already exists; rerun with --force to overwrite",
            path.display()
        ),
        Err(e) => Err(e.into()),
    }
}

/// Ask for a path on the terminal.
fn prompt_for_path() -> anyhow::Result<PathBuf> {
    let term = Term::stdout();
    term.write_str("Enter PDF file path: ")?;
    let line = term.read_line()?;
    let path = clean_prompt_input(&line);
    if path.is_empty() {
        anyhow::bail!("No PDF path given");
    }
    Ok(PathBuf::from(path))
}

/// Strip whitespace and the quotes file managers add when pasting paths.
fn clean_prompt_input(line: &str) -> &str {
    line.trim().trim_matches('"')
}

/// First `max_chars` characters of `text`, with "..." when truncated.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
