//! User-facing commands and the session they act on.
//!
//! Commands are looked up by name in a dispatch table that also declares how many arguments each
//! accepts, the way an editor registers named commands. A [`Session`] holds the one live viewer
//! together with the note layout and document it was opened for; `Annotate` replaces it.
//!
//! Handlers never panic on user mistakes: every failure comes back as a [`CommandError`] for the
//! host to show in its error line.

use crate::buffer::NoteBuffer;
use crate::config::Config;
use crate::navigator::{NavError, Navigator, NoteLayout};
use crate::template::TemplateError;
use crate::viewer::xpdf::XpdfBackend;
use crate::viewer::{parse_page, Viewer, ViewerBackend, ViewerError};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Number of arguments a command accepts.
pub enum Arity {
    /// No arguments.
    None,
    /// Zero or one argument.
    Optional,
    /// Exactly one argument.
    One,
}

impl Arity {
    #[must_use]
    /// Whether `count` arguments are acceptable.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::None => count == 0,
            Self::Optional => count <= 1,
            Self::One => count == 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "no arguments",
            Self::Optional => "at most one argument",
            Self::One => "exactly one argument",
        })
    }
}

#[derive(Debug, Error)]
/// Failures reported back to the user from a command.
pub enum CommandError {
    /// No command has this name.
    #[error("Unknown command: {0}")]
    Unknown(String),
    /// The command was given the wrong number of arguments.
    #[error("{name} takes {arity}")]
    Arity {
        /// Command name.
        name: &'static str,
        /// What it accepts.
        arity: Arity,
    },
    /// The command needs a viewer but `Annotate` has not succeeded yet.
    #[error("No PDF is being annotated; run :Annotate first")]
    NoViewer,
    /// The viewer refused the request.
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    /// The requested note could not be found.
    #[error(transparent)]
    Navigation(#[from] NavError),
    /// A configured header template is malformed.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// What a successful command has to say, if anything.
pub type Outcome = Result<Option<String>, CommandError>;

/// Signature shared by all command handlers.
pub type Handler<B> = fn(&mut Session<B>, &mut dyn NoteBuffer, Option<&str>) -> Outcome;

/// One entry of the dispatch table.
pub struct CommandSpec<B: ViewerBackend> {
    /// Name the command is invoked by.
    pub name: &'static str,
    /// Arguments it accepts.
    pub arity: Arity,
    /// Function run when it is invoked.
    pub handler: Handler<B>,
}

#[must_use]
/// The full dispatch table, in the order commands are listed to users.
pub fn command_table<B: ViewerBackend>() -> Vec<CommandSpec<B>> {
    vec![
        CommandSpec {
            name: "Annotate",
            arity: Arity::Optional,
            handler: Session::annotate,
        },
        CommandSpec {
            name: "NotesFromPage",
            arity: Arity::None,
            handler: Session::notes_from_page,
        },
        CommandSpec {
            name: "PageFromNote",
            arity: Arity::None,
            handler: Session::page_from_note,
        },
        CommandSpec {
            name: "GoToPage",
            arity: Arity::One,
            handler: Session::go_to_page,
        },
        CommandSpec {
            name: "CreatePageNote",
            arity: Arity::None,
            handler: Session::create_page_note,
        },
        CommandSpec {
            name: "NextPage",
            arity: Arity::None,
            handler: Session::next_page,
        },
        CommandSpec {
            name: "PrevPage",
            arity: Arity::None,
            handler: Session::prev_page,
        },
        CommandSpec {
            name: "CurrentPage",
            arity: Arity::None,
            handler: Session::current_page,
        },
        CommandSpec {
            name: "CloseViewer",
            arity: Arity::None,
            handler: Session::close_viewer,
        },
    ]
}

struct Annotation<B: ViewerBackend> {
    viewer: Viewer<B>,
    layout: NoteLayout,
    document: String,
}

/// The single live viewer and everything commands need to reach it.
pub struct Session<B: ViewerBackend> {
    config_path: PathBuf,
    base_dir: PathBuf,
    make_backend: Box<dyn Fn(&Config) -> B>,
    annotation: Option<Annotation<B>>,
}

impl Session<XpdfBackend> {
    #[must_use]
    /// A session driving xpdf.
    pub fn xpdf(config_path: PathBuf, base_dir: PathBuf) -> Self {
        Self::new(config_path, base_dir, XpdfBackend::new)
    }
}

impl<B: ViewerBackend> Session<B> {
    #[must_use]
    /// A session with no viewer yet.
    ///
    /// `config_path` is reread on every `Annotate`; document paths are resolved against
    /// `base_dir`; `make_backend` builds the viewer backend for each new session.
    pub fn new(
        config_path: PathBuf,
        base_dir: PathBuf,
        make_backend: impl Fn(&Config) -> B + 'static,
    ) -> Self {
        Self {
            config_path,
            base_dir,
            make_backend: Box::new(make_backend),
            annotation: None,
        }
    }

    #[must_use]
    /// The viewer of the live session, if any.
    pub fn viewer(&self) -> Option<&Viewer<B>> {
        self.annotation.as_ref().map(|ann| &ann.viewer)
    }

    #[must_use]
    /// Short status text: document and page, when a viewer is live.
    pub fn status(&self) -> Option<String> {
        let ann = self.annotation.as_ref()?;
        let page = ann.viewer.current_page()?;
        Some(format!(
            "{} p. {page}/{}",
            ann.document,
            ann.viewer.page_count()
        ))
    }

    /// Run one command line such as `GoToPage 4` against `buffer`.
    ///
    /// Everything after the command name is passed as a single argument, so filenames may
    /// contain spaces.
    ///
    /// # Errors
    ///
    /// Returns the command's failure, or an error for unknown names and wrong argument counts.
    pub fn execute(&mut self, buffer: &mut dyn NoteBuffer, line: &str) -> Outcome {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));
        let arg = (!rest.is_empty()).then_some(rest);

        let table = command_table::<B>();
        let Some(spec) = table.iter().find(|spec| spec.name == name) else {
            return Err(CommandError::Unknown(name.to_string()));
        };
        if !spec.arity.accepts(usize::from(arg.is_some())) {
            return Err(CommandError::Arity {
                name: spec.name,
                arity: spec.arity,
            });
        }

        debug!("Running {name} {}", arg.unwrap_or_default());
        let outcome = (spec.handler)(self, buffer, arg);
        match &outcome {
            Err(CommandError::Navigation(e @ NavError::NoMatch { .. })) => {
                error!("{name} found no section: {e}");
            }
            Err(e) => warn!("{name} failed: {e}"),
            Ok(_) => {}
        }
        outcome
    }

    fn live(&mut self) -> Result<&mut Annotation<B>, CommandError> {
        self.annotation.as_mut().ok_or(CommandError::NoViewer)
    }

    fn annotate(&mut self, buffer: &mut dyn NoteBuffer, arg: Option<&str>) -> Outcome {
        let cfg = Config::load_from(&self.config_path);
        let layout = NoteLayout::from_config(&cfg)?;
        let document = match arg {
            Some(name) => name.to_string(),
            None => layout.document_name(&*buffer)?,
        };

        let mut viewer = Viewer::new(self.base_dir.join(&document), (self.make_backend)(&cfg))?;
        if let Some(mut previous) = self.annotation.take() {
            previous.viewer.quit();
        }
        viewer.open();
        info!("Annotating {document}");

        let message = format!("Annotating {document} ({} pages)", viewer.page_count());
        self.annotation = Some(Annotation {
            viewer,
            layout,
            document,
        });
        Ok(Some(message))
    }

    fn notes_from_page(&mut self, buffer: &mut dyn NoteBuffer, _arg: Option<&str>) -> Outcome {
        let ann = self.live()?;
        let page = ann.viewer.current_page().ok_or(ViewerError::NotOpen)?;
        Navigator::new(buffer, &ann.layout, &ann.document).jump_to_slide_note(page)?;
        Ok(None)
    }

    fn page_from_note(&mut self, buffer: &mut dyn NoteBuffer, _arg: Option<&str>) -> Outcome {
        let ann = self.live()?;
        let page = Navigator::new(buffer, &ann.layout, &ann.document).page_at_cursor()?;
        ann.viewer.set_current_page(i64::from(page))?;
        Ok(Some(page_report(&ann.viewer)))
    }

    fn go_to_page(&mut self, _buffer: &mut dyn NoteBuffer, arg: Option<&str>) -> Outcome {
        let ann = self.live()?;
        let page = parse_page(arg.unwrap_or_default())?;
        ann.viewer.set_current_page(page)?;
        Ok(Some(page_report(&ann.viewer)))
    }

    fn create_page_note(&mut self, buffer: &mut dyn NoteBuffer, _arg: Option<&str>) -> Outcome {
        let ann = self.live()?;
        let page = ann.viewer.current_page().ok_or(ViewerError::NotOpen)?;
        Navigator::new(buffer, &ann.layout, &ann.document).create_or_jump_to_slide_note(page)?;
        Ok(None)
    }

    fn next_page(&mut self, _buffer: &mut dyn NoteBuffer, _arg: Option<&str>) -> Outcome {
        let ann = self.live()?;
        ann.viewer.next_page()?;
        Ok(Some(page_report(&ann.viewer)))
    }

    fn prev_page(&mut self, _buffer: &mut dyn NoteBuffer, _arg: Option<&str>) -> Outcome {
        let ann = self.live()?;
        ann.viewer.prev_page()?;
        Ok(Some(page_report(&ann.viewer)))
    }

    fn current_page(&mut self, _buffer: &mut dyn NoteBuffer, _arg: Option<&str>) -> Outcome {
        let ann = self.live()?;
        Ok(Some(page_report(&ann.viewer)))
    }

    fn close_viewer(&mut self, _buffer: &mut dyn NoteBuffer, _arg: Option<&str>) -> Outcome {
        let mut ann = self.annotation.take().ok_or(CommandError::NoViewer)?;
        ann.viewer.quit();
        Ok(Some(format!("Closed {}", ann.document)))
    }
}

fn page_report<B: ViewerBackend>(viewer: &Viewer<B>) -> String {
    match viewer.current_page() {
        Some(page) => format!("Page {page} of {}", viewer.page_count()),
        None => format!("No page shown ({} pages)", viewer.page_count()),
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Outcome of one command in a headless run.
pub struct CommandReport {
    /// The command line as given.
    pub command: String,
    /// Whether it succeeded.
    pub ok: bool,
    /// Its message or error text.
    pub message: Option<String>,
}

/// Run `commands` in order, carrying on past failures.
pub fn run_script<B: ViewerBackend>(
    session: &mut Session<B>,
    buffer: &mut dyn NoteBuffer,
    commands: &[String],
) -> Vec<CommandReport> {
    commands
        .iter()
        .map(|command| {
            let (ok, message) = match session.execute(buffer, command) {
                Ok(message) => (true, message),
                Err(e) => (false, Some(e.to_string())),
            };
            CommandReport {
                command: command.clone(),
                ok,
                message,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/commands.rs"]
mod tests;
