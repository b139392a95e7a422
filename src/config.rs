//! Configuration to acknowledge note-taking preferences as well as set defaults.
//!
//! Specifically, we try to find a slidenotes.toml, and if present we load settings from there.
//! This provides the header templates notes are written with and the external programs used to
//! show the PDF. Settings are read again on every `Annotate`, so edits take effect without a
//! restart.

use facet::Facet;
use log::warn;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "slidenotes.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from slidenotes.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "## Slide %d".to_string())]
    /// Slide note header, with `%d` standing for the page number.
    pub slide_format: String,
    #[facet(default = true)]
    /// Read the PDF path from a `pdf: "<path>.pdf"` preamble line instead of inline headers.
    pub pdf_in_yaml: bool,
    #[facet(default = "# %s".to_string())]
    /// Inline PDF header, with `%s` standing for the filename. Unused in preamble mode.
    pub pdf_section_format: String,
    #[facet(default = "xpdf".to_string())]
    /// Viewer executable accepting `-remote <session> <command>`.
    pub viewer: String,
    #[facet(default = "pdfinfo".to_string())]
    /// Executable reporting the page count of a PDF.
    pub pdfinfo: String,
    #[facet(default = 1500)]
    /// Pause after asking the viewer to load the file, in milliseconds.
    pub open_delay_ms: u64,
    #[facet(default = 250)]
    /// Pause after each later view-setup command, in milliseconds.
    pub command_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slide_format: "## Slide %d".to_string(),
            pdf_in_yaml: true,
            pdf_section_format: "# %s".to_string(),
            viewer: "xpdf".to_string(),
            pdfinfo: "pdfinfo".to_string(),
            open_delay_ms: 1500,
            command_delay_ms: 250,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from `path`, using defaults if it is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match facet_toml::from_str::<Self>(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }

    #[must_use]
    /// Settling time after the file-open command.
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    #[must_use]
    /// Settling time after each view-setup command.
    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
