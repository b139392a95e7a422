//! The xpdf backend: `xpdf -remote <session> <command>`.
//!
//! Each command is a short-lived process that hands its command to the viewer instance
//! registered under the session name (starting one if there is none) and exits. We never read a
//! reply. Finished children are reaped on the next send so a long editing session does not pile
//! up zombies; whatever is still running when the backend is dropped is waited on from a
//! background thread.

use crate::config::Config;
use crate::viewer::{pdfinfo, RemoteCommand, Settle, ViewerBackend, ViewerError};
use log::{debug, warn};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use uuid::Uuid;

/// Drives one xpdf instance addressed by a random session name.
pub struct XpdfBackend {
    viewer: String,
    pdfinfo: String,
    session: String,
    open_delay: Duration,
    command_delay: Duration,
    children: Vec<Child>,
}

impl XpdfBackend {
    #[must_use]
    /// A backend with a fresh session name, using the programs and delays from `cfg`.
    pub fn new(cfg: &Config) -> Self {
        Self {
            viewer: cfg.viewer.clone(),
            pdfinfo: cfg.pdfinfo.clone(),
            session: Uuid::new_v4().simple().to_string(),
            open_delay: cfg.open_delay(),
            command_delay: cfg.command_delay(),
            children: Vec::new(),
        }
    }

    #[must_use]
    /// Name the viewer instance is registered under.
    pub fn session(&self) -> &str {
        &self.session
    }

    fn reap(&mut self) {
        self.children
            .retain_mut(|child| !matches!(child.try_wait(), Ok(Some(_)) | Err(_)));
    }
}

impl Drop for XpdfBackend {
    fn drop(&mut self) {
        self.reap();
        reap_in_background(std::mem::take(&mut self.children));
    }
}

/// Wait on `children` from a detached thread; `None` when there is nothing left to wait on.
fn reap_in_background(children: Vec<Child>) -> Option<JoinHandle<()>> {
    if children.is_empty() {
        return None;
    }
    debug!("Reaping {} viewer processes in the background", children.len());
    Some(thread::spawn(move || {
        for mut child in children {
            if let Err(e) = child.wait() {
                warn!("Could not reap viewer process {}: {e}", child.id());
            }
        }
    }))
}

impl ViewerBackend for XpdfBackend {
    fn page_count(&self, file: &Path) -> Result<u32, ViewerError> {
        pdfinfo::page_count(&self.pdfinfo, file)
    }

    fn send(&mut self, command: &RemoteCommand) {
        self.reap();
        let spawned = Command::new(&self.viewer)
            .arg("-remote")
            .arg(&self.session)
            .arg(command.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => {
                debug!("{} -remote {} {command}", self.viewer, self.session);
                self.children.push(child);
            }
            Err(e) => warn!("Dropped viewer command {command}: {e}"),
        }
    }

    fn settle(&mut self, pause: Settle) {
        let delay = match pause {
            Settle::FileLoad => self.open_delay,
            Settle::Command => self.command_delay,
        };
        thread::sleep(delay);
    }
}
