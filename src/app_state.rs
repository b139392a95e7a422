//! The core state bridging the notes file, the interactive editor and the viewer session.
//!
//! The notes live in an edtui editor for the whole run. Viewer commands typed after `:` are run
//! against a [`TextBuffer`] snapshot of the editor, and any lines or cursor movement the command
//! produced are written back, so the navigator never needs to know about the terminal editor.
//! Editor-level commands (`:w`, `:q`, ...) are handled here before the dispatch table is asked.

use crate::buffer::{NoteBuffer, TextBuffer};
use crate::commands::Session;
use crate::viewer::xpdf::XpdfBackend;
use crate::viewer::ViewerBackend;
use edtui::{EditorState, Index2, Lines};
use log::info;
use std::path::PathBuf;
use std::{fs, io};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
/// Determines how input is interpreted.
pub enum View {
    /// Keys go to the vim-like editor.
    Edit,
    /// Captures vim-style command input after ':' keystroke.
    Command,
}

#[derive(PartialEq, Eq, Debug, Clone)]
/// Feedback shown in the status line.
pub enum StatusMessage {
    /// Ordinary command output.
    Info(String),
    /// A command failed.
    Error(String),
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
/// Whether the main loop keeps running after a command.
pub enum Flow {
    /// Keep editing.
    Continue,
    /// Leave the application.
    Quit,
}

/// Editor, notes file and viewer session for one run of the application.
pub struct AppState<B: ViewerBackend = XpdfBackend> {
    /// Notes file being edited.
    pub path: PathBuf,
    /// Editor buffer content.
    pub editor_state: EditorState,
    /// Active input mode.
    pub current_view: View,
    /// Accumulates vim-style command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed under the editor.
    pub message: Option<StatusMessage>,
    /// The viewer session commands act on.
    pub session: Session<B>,
    saved_lines: Vec<String>,
}

impl<B: ViewerBackend> AppState<B> {
    #[must_use]
    /// Start editing `text` as the contents of `path`.
    pub fn new(path: PathBuf, text: &str, session: Session<B>) -> Self {
        let buffer = TextBuffer::from_text(text);
        let mut app = Self {
            path,
            editor_state: EditorState::new(Lines::from(buffer.lines().join("\n").as_str())),
            current_view: View::Edit,
            command_buffer: String::new(),
            message: None,
            session,
            saved_lines: Vec::new(),
        };
        app.saved_lines = app.editor_lines();
        app
    }

    /// Open `path`, starting from an empty buffer if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: PathBuf, session: Session<B>) -> io::Result<Self> {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        Ok(Self::new(path, &text, session))
    }

    fn editor_lines(&self) -> Vec<String> {
        self.editor_state
            .lines
            .iter_row()
            .map(|line| line.iter().collect::<String>())
            .collect()
    }

    #[must_use]
    /// Copy the editor content and cursor row into a [`TextBuffer`].
    pub fn snapshot(&self) -> TextBuffer {
        let mut buffer = TextBuffer::from_lines(self.editor_lines());
        buffer.set_cursor_line(self.editor_state.cursor.row);
        buffer
    }

    fn restore(&mut self, buffer: &TextBuffer) {
        let edited = buffer.lines() != self.editor_lines().as_slice();
        if edited {
            self.editor_state.lines = Lines::from(buffer.lines().join("\n").as_str());
        }
        if edited || buffer.cursor_line() != self.editor_state.cursor.row {
            self.editor_state.cursor = Index2::new(buffer.cursor_line(), 0);
        }
    }

    #[must_use]
    /// Whether the editor holds changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.editor_lines() != self.saved_lines
    }

    /// Write the editor content to the notes file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&mut self) -> io::Result<()> {
        let buffer = self.snapshot();
        fs::write(&self.path, buffer.to_text())?;
        self.saved_lines = buffer.lines().to_vec();
        info!("Saved {}", self.path.display());
        Ok(())
    }

    /// Run a command line typed after ':'.
    ///
    /// Results and failures are left in [`AppState::message`].
    pub fn run_command(&mut self, line: &str) -> Flow {
        let line = line.trim();
        match line {
            "" => Flow::Continue,
            "w" | "write" => {
                self.message = Some(match self.save() {
                    Ok(()) => StatusMessage::Info("Saved".to_string()),
                    Err(e) => StatusMessage::Error(format!("Error saving: {e}")),
                });
                Flow::Continue
            }
            "q" | "quit" => {
                if self.is_dirty() {
                    self.message = Some(StatusMessage::Error(
                        "Unsaved changes (use :q! to force or :wq to save)".to_string(),
                    ));
                    Flow::Continue
                } else {
                    Flow::Quit
                }
            }
            "q!" | "quit!" => Flow::Quit,
            "wq" | "x" => match self.save() {
                Ok(()) => Flow::Quit,
                Err(e) => {
                    self.message = Some(StatusMessage::Error(format!("Error saving: {e}")));
                    Flow::Continue
                }
            },
            _ => {
                let mut buffer = self.snapshot();
                let outcome = self.session.execute(&mut buffer, line);
                self.restore(&buffer);
                self.message = match outcome {
                    Ok(reply) => reply.map(StatusMessage::Info),
                    Err(e) => Some(StatusMessage::Error(e.to_string())),
                };
                Flow::Continue
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
