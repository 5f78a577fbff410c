//! State machine for the interactive shell.
//!
//! The UI thread owns [`App`]. Extraction runs on a worker thread and reports
//! back through an mpsc channel that is drained on every tick.

mod file_picker;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use pdfocr::{save_text, ExtractionError, ExtractionResult, SaveError, TextExtractor};

pub use file_picker::{absolute_path, FilePickerState, PickerAction};

/// Where the shell is in the extraction lifecycle.
#[derive(Debug)]
pub enum Phase {
    /// Nothing loaded.
    Idle,
    /// A worker is extracting `path`.
    Extracting { request: u64, path: PathBuf },
    /// Text is displayed and can be saved.
    Ready {
        source: PathBuf,
        result: ExtractionResult,
    },
}

/// Which screen has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    FilePicker,
}

/// Modal dialog shown on top of the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Error(String),
    Info(String),
    ConfirmOverwrite(PathBuf),
}

/// Message from an extraction worker.
#[derive(Debug)]
pub struct WorkerEvent {
    pub request: u64,
    pub path: PathBuf,
    pub outcome: Result<ExtractionResult, ExtractionError>,
}

pub struct App {
    extractor: Arc<TextExtractor>,
    pub phase: Phase,
    pub screen: Screen,
    pub dialog: Option<Dialog>,
    pub file_picker: FilePickerState,
    /// One-line message under the text pane.
    pub status: Option<String>,
    /// First visible line of the text pane.
    pub scroll: u16,
    /// Animation counter for the spinner.
    pub tick: usize,
    pub should_quit: bool,
    next_request: u64,
    worker_tx: Sender<WorkerEvent>,
    worker_rx: Receiver<WorkerEvent>,
}

impl App {
    pub fn new(extractor: Arc<TextExtractor>, start_dir: &Path) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel();
        Self {
            extractor,
            phase: Phase::Idle,
            screen: Screen::Main,
            dialog: None,
            file_picker: FilePickerState::new(start_dir),
            status: None,
            scroll: 0,
            tick: 0,
            should_quit: false,
            next_request: 0,
            worker_tx,
            worker_rx,
        }
    }

    /// Text currently shown in the text pane, if any.
    pub fn displayed_text(&self) -> Option<&str> {
        match &self.phase {
            Phase::Ready { result, .. } => Some(&result.text),
            _ => None,
        }
    }

    pub fn is_extracting(&self) -> bool {
        matches!(self.phase, Phase::Extracting { .. })
    }

    pub fn can_save(&self) -> bool {
        matches!(self.phase, Phase::Ready { .. })
    }

    pub fn open_picker(&mut self) {
        self.file_picker.refresh_entries();
        self.screen = Screen::FilePicker;
    }

    /// Start extracting `path` on a background thread.
    ///
    /// Returns false if an extraction is already running.
    pub fn start_extraction(&mut self, path: PathBuf) -> bool {
        if self.is_extracting() {
            self.status = Some("Extraction already in progress".to_string());
            return false;
        }

        self.next_request += 1;
        let request = self.next_request;
        let extractor = Arc::clone(&self.extractor);
        let tx = self.worker_tx.clone();
        let worker_path = path.clone();

        tracing::info!("Starting extraction #{} of {}", request, path.display());

        let spawned = std::thread::Builder::new()
            .name(format!("extract-{}", request))
            .spawn(move || {
                let outcome = extractor.extract(&worker_path);
                // The receiver only goes away when the shell is exiting.
                let _ = tx.send(WorkerEvent {
                    request,
                    path: worker_path,
                    outcome,
                });
            });

        match spawned {
            Ok(_) => {
                self.phase = Phase::Extracting { request, path };
                self.scroll = 0;
                self.status = None;
                true
            }
            Err(e) => {
                tracing::error!("Failed to spawn extraction worker: {}", e);
                self.dialog = Some(Dialog::Error(format!(
                    "Failed to start extraction.\n\n{}",
                    e
                )));
                false
            }
        }
    }

    /// Drain finished extractions from the worker channel.
    pub fn drain_worker_events(&mut self) {
        while let Ok(event) = self.worker_rx.try_recv() {
            self.handle_worker_event(event);
        }
    }

    pub fn handle_worker_event(&mut self, event: WorkerEvent) {
        let current = match &self.phase {
            Phase::Extracting { request, .. } => *request,
            _ => 0,
        };
        if event.request != current {
            tracing::debug!("Ignoring stale result for request #{}", event.request);
            return;
        }

        match event.outcome {
            Ok(result) => {
                self.status = Some(format!(
                    "{} characters via {} from {} pages",
                    result.text.chars().count(),
                    result.method,
                    result.page_count
                ));
                self.phase = Phase::Ready {
                    source: event.path,
                    result,
                };
            }
            Err(e) => {
                self.phase = Phase::Idle;
                self.dialog = Some(Dialog::Error(format!(
                    "Failed to extract text from the PDF.\n\n{}",
                    e
                )));
            }
        }
    }

    /// Save the displayed text next to its source PDF.
    pub fn save(&mut self, overwrite: bool) {
        let Phase::Ready { source, result } = &self.phase else {
            self.status = Some("Nothing to save yet".to_string());
            return;
        };

        match save_text(source, &result.text, overwrite) {
            Ok(path) => {
                self.dialog = Some(Dialog::Info(format!(
                    "Text saved to:\n{}",
                    path.display()
                )));
            }
            Err(SaveError::AlreadyExists(path)) => {
                self.dialog = Some(Dialog::ConfirmOverwrite(path));
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.dialog = Some(Dialog::Error(e.to_string()));
            }
        }
    }

    /// Advance animations and pick up worker results.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.drain_worker_events();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(dialog) = self.dialog.take() {
            self.handle_dialog_key(dialog, key.code);
            return;
        }

        match self.screen {
            Screen::FilePicker => self.handle_picker_key(key.code),
            Screen::Main => self.handle_main_key(key.code),
        }
    }

    fn handle_dialog_key(&mut self, dialog: Dialog, code: KeyCode) {
        match dialog {
            Dialog::ConfirmOverwrite(path) => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.save(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.status = Some("Save cancelled".to_string());
                }
                _ => self.dialog = Some(Dialog::ConfirmOverwrite(path)),
            },
            Dialog::Error(_) | Dialog::Info(_) => match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q') => {}
                _ => self.dialog = Some(dialog),
            },
        }
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.file_picker.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.file_picker.move_down(),
            KeyCode::Backspace | KeyCode::Left => self.file_picker.go_up(),
            KeyCode::Enter | KeyCode::Right => {
                if let PickerAction::Chose(path) = self.file_picker.activate() {
                    self.screen = Screen::Main;
                    self.start_extraction(path);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Main,
            _ => {}
        }
    }

    fn handle_main_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('o') => {
                if self.is_extracting() {
                    self.status = Some("Extraction already in progress".to_string());
                } else {
                    self.open_picker();
                }
            }
            KeyCode::Char('s') => self.save(false),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-20),
            KeyCode::PageDown => self.scroll_by(20),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
    }

    fn max_scroll(&self) -> u16 {
        let lines = self.displayed_text().map(|t| t.lines().count()).unwrap_or(0);
        lines.saturating_sub(1).min(u16::MAX as usize) as u16
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).clamp(0, self.max_scroll() as i32);
        self.scroll = next as u16;
    }
}
