//! slidenotes: slide-by-slide PDF notes kept in step with an external viewer.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use log::{error, info};
use ratatui::crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use simplelog::{LevelFilter, WriteLogger};
use slidenotes::app_state::{AppState, Flow, View};
use slidenotes::buffer::TextBuffer;
use slidenotes::commands::{run_script, Session};
use slidenotes::config;
use slidenotes::ui;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "slidenotes")]
#[command(about = "Slide-by-slide PDF notes kept in step with an external viewer", long_about = None)]
struct Args {
    /// Notes file to edit
    #[arg(value_name = "NOTES")]
    notes: PathBuf,

    /// Settings file (defaults to slidenotes.toml in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = "slidenotes.log")]
    log_file: PathBuf,

    /// Run a command without the editor, e.g. -c Annotate -c "GoToPage 3" -c CreatePageNote
    #[arg(long, short = 'c', value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        File::create(&args.log_file)?,
    )
    .map_err(io::Error::other)?;
    info!("Starting slidenotes on {}", args.notes.display());

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));
    let base_dir = args
        .notes
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let session = Session::xpdf(config_path, base_dir);

    if !args.command.is_empty() {
        return run_headless(&args.notes, session, &args.command);
    }

    let app = AppState::load(args.notes, session)?;
    run_tui(app)
}

fn run_headless(
    notes: &Path,
    mut session: Session<slidenotes::viewer::xpdf::XpdfBackend>,
    commands: &[String],
) -> io::Result<()> {
    let original = match fs::read_to_string(notes) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    let mut buffer = TextBuffer::from_text(&original);
    let reports = run_script(&mut session, &mut buffer, commands);

    if buffer.lines() != TextBuffer::from_text(&original).lines() {
        fs::write(notes, buffer.to_text())?;
        info!("Saved {}", notes.display());
    }

    let json = serde_json::to_string_pretty(&reports).map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

fn run_tui(mut app: AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, &mut editor_handler);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        error!("Application error: {e}");
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    editor_handler: &mut EditorEventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.current_view {
                View::Edit => match key.code {
                    KeyCode::Char(':') if app.editor_state.mode == edtui::EditorMode::Normal => {
                        app.current_view = View::Command;
                        app.command_buffer.clear();
                        app.message = None;
                    }
                    _ => editor_handler.on_key_event(key, &mut app.editor_state),
                },
                View::Command => match key.code {
                    KeyCode::Char(c) => {
                        app.command_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        if app.command_buffer.pop().is_none() {
                            app.current_view = View::Edit;
                        }
                    }
                    KeyCode::Enter => {
                        let cmd = std::mem::take(&mut app.command_buffer);
                        app.current_view = View::Edit;
                        if app.run_command(&cmd) == Flow::Quit {
                            return Ok(());
                        }
                    }
                    KeyCode::Esc => {
                        app.current_view = View::Edit;
                        app.command_buffer.clear();
                    }
                    _ => {}
                },
            }
        }
    }
}
