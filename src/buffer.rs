//! The line-addressable buffer that notes live in.
//!
//! The navigator never touches the terminal editor directly: it reads and writes lines through
//! [`NoteBuffer`], so the same scanning logic serves the TUI and headless runs alike.

/// Line storage plus a cursor, as exposed by whatever editor hosts the notes.
pub trait NoteBuffer {
    /// Number of lines in the buffer.
    fn line_count(&self) -> usize;

    /// Text of the zero-based line `index`, if it exists.
    fn line(&self, index: usize) -> Option<&str>;

    /// Insert `lines` so that the first of them becomes line `at`.
    fn insert_lines(&mut self, at: usize, lines: Vec<String>);

    /// Line the cursor sits on.
    fn cursor_line(&self) -> usize;

    /// Move the cursor to the start of line `line`, clamped to the buffer.
    fn set_cursor_line(&mut self, line: usize);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// In-memory buffer of owned lines with a row cursor.
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: usize,
}

impl TextBuffer {
    #[must_use]
    /// Split `text` into lines, with the cursor on the first line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            cursor: 0,
        }
    }

    #[must_use]
    /// Wrap already split lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines, cursor: 0 }
    }

    #[must_use]
    /// Join the lines back into file contents, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    #[must_use]
    /// Borrow all lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl NoteBuffer for TextBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    fn insert_lines(&mut self, at: usize, lines: Vec<String>) {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, lines);
    }

    fn cursor_line(&self) -> usize {
        self.cursor
    }

    fn set_cursor_line(&mut self, line: usize) {
        self.cursor = line.min(self.lines.len().saturating_sub(1));
    }
}
