//! Interactive terminal shell.

use std::io::{stdout, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use pdfocr::{ExtractorConfig, TextExtractor};

use crate::cli::app::{absolute_path, App};
use crate::cli::view;

/// Run the shell until the user quits.
///
/// `path` may be a PDF to open right away or a directory to browse from.
pub fn cmd_ui(config: &ExtractorConfig, path: Option<PathBuf>) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let (start_dir, initial_pdf) = start_location(path.as_deref(), &cwd);

    let extractor = Arc::new(TextExtractor::new(config));
    let mut app = App::new(extractor, &start_dir);
    if let Some(pdf) = initial_pdf {
        app.start_extraction(pdf);
    }

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    // Restore the terminal before a panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .map_err(anyhow::Error::from)
        .and_then(|mut terminal| run_tui_loop(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    result
}

/// Directory to browse from and the PDF to open immediately, both absolute.
fn start_location(path: Option<&Path>, cwd: &Path) -> (PathBuf, Option<PathBuf>) {
    match path.map(absolute_path) {
        Some(p) if p.is_dir() => (p, None),
        Some(p) => {
            let dir = p
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            (dir, Some(p))
        }
        None => (absolute_path(cwd), None),
    }
}

/// Main TUI event loop.
fn run_tui_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let poll_duration = Duration::from_millis(100);

    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        app.on_tick();
    }

    Ok(())
}
