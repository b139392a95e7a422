//! Control of the external PDF viewer.
//!
//! A [`Viewer`] owns one viewer session: the bound document, its page range and the page we last
//! asked the viewer to show. The viewer offers no way to ask which page it is on, so the recorded
//! page is an optimistic local copy. Every command is fire-and-forget through a
//! [`ViewerBackend`]; nothing is read back from the viewer process.
//!
//! The session moves through a small state machine:
//!
//! ```text
//! Uninitialized --open()--> Open --quit()--> Closed
//!                           ^  |               |
//!                           |__| page changes  |
//!                           |__________________|
//!                                 open()
//! ```

pub mod pdfinfo;
pub mod xpdf;

use log::{debug, info};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension a document must carry to be shown.
pub const DOCUMENT_EXTENSION: &str = "pdf";

#[derive(Debug, Error)]
/// Reasons a viewer could not be created or a page change was refused.
pub enum ViewerError {
    /// The document does not exist.
    #[error("{} could not be found in the working directory", .0.display())]
    NotFound(PathBuf),
    /// The document is not a PDF.
    #[error("{} is not a pdf file.", .0.display())]
    InvalidFormat(PathBuf),
    /// A requested page could not be read as an integer.
    #[error("Page number must be an integer, got {0:?}")]
    InvalidType(String),
    /// A requested page lies outside the document.
    #[error("Page number must be between 1 and {max}, got {page}")]
    OutOfRange {
        /// The refused page.
        page: i64,
        /// Last page of the document.
        max: u32,
    },
    /// Page changes were requested before `open` or after `quit`.
    #[error("the viewer is not open")]
    NotOpen,
    /// The page-count source gave no usable answer.
    #[error("could not read the page count: {0}")]
    PageCount(String),
    /// Running an external program failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Remote-control commands understood by the viewer.
pub enum RemoteCommand {
    /// Load a document.
    OpenFile(PathBuf),
    /// Show one page at a time.
    SinglePageMode,
    /// Hide the outline sidebar.
    CloseSidebar,
    /// Zoom so the page fills the window width.
    ZoomFitWidth,
    /// Show the given page.
    GotoPage(u32),
    /// Step forward one page.
    NextPage,
    /// Step back one page.
    PrevPage,
    /// Close the viewer.
    Quit,
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFile(path) => write!(f, "openFile({})", path.display()),
            Self::SinglePageMode => f.write_str("singlePageMode"),
            Self::CloseSidebar => f.write_str("closeSidebar"),
            Self::ZoomFitWidth => f.write_str("zoomFitWidth"),
            Self::GotoPage(page) => write!(f, "gotoPage({page})"),
            Self::NextPage => f.write_str("nextPage"),
            Self::PrevPage => f.write_str("prevPage"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pauses that give the viewer time to catch up while it starts.
pub enum Settle {
    /// After asking it to load the document.
    FileLoad,
    /// After each view-setup command.
    Command,
}

/// The external side of a viewer session.
pub trait ViewerBackend {
    /// Number of pages in `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page count cannot be determined.
    fn page_count(&self, file: &Path) -> Result<u32, ViewerError>;

    /// Issue `command` without waiting for any acknowledgement.
    fn send(&mut self, command: &RemoteCommand);

    /// Block for the pause appropriate to `pause`.
    fn settle(&mut self, pause: Settle);
}

/// Read a user-supplied page number.
///
/// Integers too large for `i64` saturate, so they are still refused as out of range rather
/// than as non-integers.
///
/// # Errors
///
/// Returns [`ViewerError::InvalidType`] if `raw` is not an integer.
pub fn parse_page(raw: &str) -> Result<i64, ViewerError> {
    let text = raw.trim();
    if let Ok(page) = text.parse() {
        return Ok(page);
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ViewerError::InvalidType(raw.to_string()));
    }
    Ok(if negative { i64::MIN } else { i64::MAX })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lifecycle of a viewer session.
pub enum SessionState {
    /// Created but not yet shown.
    Uninitialized,
    /// The document has been opened.
    Open,
    /// The viewer has been asked to quit.
    Closed,
}

/// One viewer session bound to a single document.
pub struct Viewer<B: ViewerBackend> {
    file: PathBuf,
    page_count: u32,
    current_page: Option<u32>,
    state: SessionState,
    backend: B,
}

impl<B: ViewerBackend> Viewer<B> {
    /// Bind a session to `path` after checking the document.
    ///
    /// Asks the backend for the page count but does not start the viewer.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::NotFound`] for a missing file, [`ViewerError::InvalidFormat`] for a
    /// non-PDF, or whatever the page-count query fails with.
    pub fn new(path: impl AsRef<Path>, backend: B) -> Result<Self, ViewerError> {
        let file = path.as_ref().to_path_buf();
        if !file.exists() {
            return Err(ViewerError::NotFound(file));
        }
        let is_pdf = file
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION));
        if !is_pdf {
            return Err(ViewerError::InvalidFormat(file));
        }

        let page_count = backend.page_count(&file)?;
        info!("Bound viewer to {} ({page_count} pages)", file.display());

        Ok(Self {
            file,
            page_count,
            current_page: None,
            state: SessionState::Uninitialized,
            backend,
        })
    }

    /// Show the document and lay the viewer out for reading slides.
    ///
    /// The page is recorded as 1 without confirmation from the viewer.
    pub fn open(&mut self) {
        let commands = [
            RemoteCommand::OpenFile(self.file.clone()),
            RemoteCommand::SinglePageMode,
            RemoteCommand::CloseSidebar,
            RemoteCommand::ZoomFitWidth,
        ];

        for (i, command) in commands.iter().enumerate() {
            self.backend.send(command);
            self.backend.settle(if i == 0 {
                Settle::FileLoad
            } else {
                Settle::Command
            });
        }

        self.current_page = Some(1);
        self.state = SessionState::Open;
        info!("Opened {}", self.file.display());
    }

    #[must_use]
    /// The page last asked for, `None` before the session was opened.
    pub fn current_page(&self) -> Option<u32> {
        self.current_page
    }

    #[must_use]
    /// Last valid page of the document.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    #[must_use]
    /// Where the session is in its lifecycle.
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    /// The bound document.
    pub fn file(&self) -> &Path {
        &self.file
    }

    #[must_use]
    /// The backend commands are sent through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn open_page(&self) -> Result<u32, ViewerError> {
        match (self.state, self.current_page) {
            (SessionState::Open, Some(page)) => Ok(page),
            _ => Err(ViewerError::NotOpen),
        }
    }

    /// Show `page`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OutOfRange`] outside `1..=page_count`, or
    /// [`ViewerError::NotOpen`]; the recorded page is unchanged on failure.
    pub fn set_current_page(&mut self, page: i64) -> Result<(), ViewerError> {
        self.open_page()?;
        let out_of_range = || ViewerError::OutOfRange {
            page,
            max: self.page_count,
        };
        let target = u32::try_from(page).map_err(|_| out_of_range())?;
        if !(1..=self.page_count).contains(&target) {
            return Err(out_of_range());
        }

        self.backend.send(&RemoteCommand::GotoPage(target));
        self.current_page = Some(target);
        debug!("Page set to {target}");
        Ok(())
    }

    /// Step forward one page; the viewer itself ignores the step on the last page.
    ///
    /// Returns the recorded page afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::NotOpen`] outside an open session.
    pub fn next_page(&mut self) -> Result<u32, ViewerError> {
        let page = self.open_page()?;
        self.backend.send(&RemoteCommand::NextPage);
        if page < self.page_count {
            self.current_page = Some(page + 1);
        }
        self.open_page()
    }

    /// Step back one page; the viewer itself ignores the step on the first page.
    ///
    /// Returns the recorded page afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::NotOpen`] outside an open session.
    pub fn prev_page(&mut self) -> Result<u32, ViewerError> {
        let page = self.open_page()?;
        self.backend.send(&RemoteCommand::PrevPage);
        if page > 1 {
            self.current_page = Some(page - 1);
        }
        self.open_page()
    }

    /// Ask the viewer to close. Nothing waits for it to exit.
    pub fn quit(&mut self) {
        self.backend.send(&RemoteCommand::Quit);
        self.state = SessionState::Closed;
        info!("Closed viewer for {}", self.file.display());
    }
}

#[cfg(test)]
#[path = "tests/viewer.rs"]
mod tests;
