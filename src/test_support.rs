//! Shared fixtures for unit tests.

use crate::viewer::{RemoteCommand, Settle, ViewerBackend, ViewerError};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tempfile::{Builder, NamedTempFile};

/// Backend that records what it was asked to do instead of running a viewer.
pub struct RecordingBackend {
    pub pages: u32,
    pub sent: Vec<RemoteCommand>,
    pub pauses: Vec<Settle>,
    /// Commands from every backend sharing this journal, in send order.
    pub journal: Option<Rc<RefCell<Vec<RemoteCommand>>>>,
}

impl RecordingBackend {
    pub fn new(pages: u32) -> Self {
        Self {
            pages,
            sent: Vec::new(),
            pauses: Vec::new(),
            journal: None,
        }
    }

    /// A backend that also appends to `journal`, which outlives it.
    pub fn journaled(pages: u32, journal: &Rc<RefCell<Vec<RemoteCommand>>>) -> Self {
        Self {
            journal: Some(Rc::clone(journal)),
            ..Self::new(pages)
        }
    }
}

impl ViewerBackend for RecordingBackend {
    fn page_count(&self, _file: &Path) -> Result<u32, ViewerError> {
        Ok(self.pages)
    }

    fn send(&mut self, command: &RemoteCommand) {
        self.sent.push(command.clone());
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(command.clone());
        }
    }

    fn settle(&mut self, pause: Settle) {
        self.pauses.push(pause);
    }
}

/// An empty file on disk with the given suffix, e.g. `".pdf"`.
pub fn temp_document(suffix: &str) -> NamedTempFile {
    Builder::new().suffix(suffix).tempfile().unwrap()
}
