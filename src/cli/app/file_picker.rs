//! Directory browser that only offers PDFs.

use std::path::{Path, PathBuf};

/// A single entry in the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Outcome of pressing Enter on the highlighted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerAction {
    /// Nothing selectable under the cursor.
    None,
    /// Moved into a directory.
    ChangedDir,
    /// A PDF was chosen.
    Chose(PathBuf),
}

pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Directories first, then PDFs, each sorted case-insensitively.
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
}

impl FilePickerState {
    pub fn new(dir: &Path) -> Self {
        let mut state = Self {
            current_dir: absolute_path(dir),
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        // Parent directory entry
        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            });
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in read_dir.flatten() {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();

                // Skip hidden files/dirs
                if name.starts_with('.') {
                    continue;
                }

                if path.is_dir() {
                    dirs.push(FileEntry {
                        name,
                        path,
                        is_dir: true,
                    });
                } else if is_pdf(&path) {
                    files.push(FileEntry {
                        name,
                        path,
                        is_dir: false,
                    });
                }
            }

            dirs.sort_by_key(|e| e.name.to_lowercase());
            files.sort_by_key(|e| e.name.to_lowercase());

            entries.extend(dirs);
            entries.extend(files);
        } else {
            tracing::warn!("Cannot read directory {}", self.current_dir.display());
        }

        self.entries = entries;
        self.cursor = 0;
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Enter the highlighted directory or choose the highlighted PDF.
    pub fn activate(&mut self) -> PickerAction {
        let Some(entry) = self.entries.get(self.cursor).cloned() else {
            return PickerAction::None;
        };

        if entry.is_dir {
            self.current_dir = entry.path;
            self.refresh_entries();
            PickerAction::ChangedDir
        } else {
            PickerAction::Chose(entry.path)
        }
    }

    /// Go to the parent directory, keeping the cursor on the one we left.
    pub fn go_up(&mut self) {
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            return;
        };
        let left = std::mem::replace(&mut self.current_dir, parent);
        self.refresh_entries();
        if let Some(pos) = self.entries.iter().position(|e| e.path == left) {
            self.cursor = pos;
        }
    }
}

/// Resolve a relative path against the working directory.
///
/// A relative path's parent chain ends in `""`, which cannot be listed.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
