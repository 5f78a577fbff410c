//! Rendering for the interactive shell.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{App, Dialog, Phase, Screen};

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

fn spinner_char(tick: usize) -> char {
    SPINNER[tick % SPINNER.len()]
}

/// Draw the whole shell.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(5),    // Text pane or picker
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" PDF Text Extractor ", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" Select a PDF to extract text from"),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.screen {
        Screen::Main => draw_text_pane(frame, app, chunks[1]),
        Screen::FilePicker => draw_picker(frame, app, chunks[1]),
    }

    let status = app.status.as_deref().unwrap_or_default();
    frame.render_widget(
        Paragraph::new(format!(" {}", status)).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );

    frame.render_widget(
        Paragraph::new(footer_text(app)).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );

    if let Some(dialog) = &app.dialog {
        draw_dialog(frame, dialog);
    }
}

fn footer_text(app: &App) -> String {
    match app.screen {
        Screen::FilePicker => " ↑/↓ move  Enter open  Backspace parent  Esc back".to_string(),
        Screen::Main if app.can_save() => {
            " o choose PDF  s save extracted text  ↑/↓ PgUp/PgDn scroll  q quit".to_string()
        }
        Screen::Main => " o choose PDF  q quit".to_string(),
    }
}

fn draw_text_pane(frame: &mut Frame, app: &App, area: Rect) {
    let (title, body) = match &app.phase {
        Phase::Idle => (
            " No document ".to_string(),
            Paragraph::new("Press 'o' to choose a PDF.").style(Style::default().fg(Color::DarkGray)),
        ),
        Phase::Extracting { path, .. } => (
            format!(" {} ", file_label(path)),
            Paragraph::new(format!(
                "{} Extracting text...\nPlease wait...",
                spinner_char(app.tick)
            ))
            .style(Style::default().fg(Color::Yellow)),
        ),
        Phase::Ready { source, result } => (
            format!(" {} ({}) ", file_label(source), result.method),
            Paragraph::new(result.text.as_str())
                .wrap(Wrap { trim: false })
                .scroll((app.scroll, 0)),
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL);
    frame.render_widget(body.block(block), area);
}

fn draw_picker(frame: &mut Frame, app: &App, area: Rect) {
    let picker = &app.file_picker;

    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .map(|entry| {
            if entry.is_dir {
                ListItem::new(format!("📁 {}", entry.name)).style(Style::default().fg(Color::Blue))
            } else {
                ListItem::new(format!("📄 {}", entry.name))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ", picker.current_dir.display()))
                .title_style(Style::default().fg(Color::Cyan).bold())
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !picker.entries.is_empty() {
        state.select(Some(picker.cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_dialog(frame: &mut Frame, dialog: &Dialog) {
    let (title, body, color) = match dialog {
        Dialog::Error(msg) => (" Error ", format!("{}\n\n[Enter] OK", msg), Color::Red),
        Dialog::Info(msg) => (" Saved ", format!("{}\n\n[Enter] OK", msg), Color::Green),
        Dialog::ConfirmOverwrite(path) => (
            " Overwrite? ",
            format!("{} already exists.\n\nOverwrite it? [y/n]", path.display()),
            Color::Yellow,
        ),
    };

    let area = centered_rect(60, 9, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(title)
                .title_style(Style::default().fg(color).bold())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A rect `percent_x` wide and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (area.width * percent_x / 100).max(20).min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
