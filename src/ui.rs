//! The UI renders the application state into something visible and vim-able.
//!
//! The notes editor fills the screen; the bar below shows the command being typed, the last
//! command's result, or a reminder of the available commands.

use crate::app_state::{AppState, StatusMessage, View};
use crate::viewer::ViewerBackend;
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const HELP: &str = ":Annotate [pdf] | :GoToPage n | :NextPage | :PrevPage | :CreatePageNote \
                    | :NotesFromPage | :PageFromNote | :w Save | :q Quit";

/// Renders the editor and status bar.
pub fn draw<B: ViewerBackend>(f: &mut Frame, app: &mut AppState<B>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let name = app
        .path
        .file_name()
        .map_or_else(|| app.path.display().to_string(), |n| n.to_string_lossy().to_string());
    let dirty = if app.is_dirty() { " [+]" } else { "" };
    let title = match app.session.status() {
        Some(status) => format!("{name}{dirty} | {status}"),
        None => format!("{name}{dirty}"),
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
    let editor = EditorView::new(&mut app.editor_state)
        .theme(EditorTheme::default())
        .syntax_highlighter(Some(syntax_highlighter))
        .wrap(true);
    f.render_widget(editor, inner);

    let (text, style) = if app.current_view == View::Command {
        (format!(":{}", app.command_buffer), Style::default())
    } else {
        match &app.message {
            Some(StatusMessage::Info(msg)) => (msg.clone(), Style::default()),
            Some(StatusMessage::Error(msg)) => (msg.clone(), Style::default().fg(Color::Red)),
            None => (HELP.to_string(), Style::default().fg(Color::DarkGray)),
        }
    };

    let status = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);
}
