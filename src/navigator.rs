//! Pairing buffer regions with PDF pages.
//!
//! A notes buffer is split into regions by header lines. PDF headers (or a YAML `pdf:` preamble)
//! say which document the notes belong to, and slide headers inside a PDF region carry the page
//! number each note is about:
//!
//! ```text
//! # lecture-1.pdf        <- PDF region starts
//!
//! ## Slide 3             <- slide region for page 3 starts
//! - first point
//!
//! ## Slide 5             <- slide region for page 5 starts
//! ```
//!
//! Regions are never cached: every query rescans the buffer, so edits made between commands are
//! always seen. Identification is by substring containment with the first match winning, which
//! means a header such as `## Slide 3` also claims a later `## Slide 30` if it comes first.

use crate::buffer::NoteBuffer;
use crate::config::Config;
use crate::template::{HeaderTemplate, TemplateError};
use log::debug;
use regex::Regex;
use std::ops::Range;
use thiserror::Error;

/// Pattern for a YAML preamble line such as `pdf: "slides.pdf"`.
pub const PREAMBLE_PATTERN: &str = r#"^pdf: "?(.*pdf)"?$"#;

/// Text of the bullet line placed in a freshly created note.
pub const BULLET_PLACEHOLDER: &str = "- ";

#[derive(Debug, Error, PartialEq, Eq)]
/// Failures to find the section a command asked for.
pub enum NavError {
    /// No header of the requested kind contains the identifier.
    #[error("no section header contains {needle:?}")]
    NoMatch {
        /// The identifier that was searched for.
        needle: String,
    },
    /// The page has no slide note yet.
    #[error("no note exists for page {0}")]
    NoNote(u32),
    /// The cursor sits outside every slide note of the PDF region.
    #[error("the cursor is not inside a slide note")]
    NotInNote,
    /// The buffer names no PDF file.
    #[error("no PDF filename found in the buffer")]
    NoDocument,
}

#[derive(Debug, Clone)]
/// Where the identity of the annotated PDF is written in the buffer.
pub enum PdfLocation {
    /// A single `pdf: "<path>.pdf"` preamble line; the whole buffer is one PDF region.
    Preamble(Regex),
    /// Inline section headers built from a `%s` template.
    Inline(HeaderTemplate),
}

#[derive(Debug, Clone)]
/// The header conventions a notes buffer follows.
pub struct NoteLayout {
    /// Template for slide headers.
    pub slide: HeaderTemplate,
    /// How PDF regions are delimited.
    pub pdf: PdfLocation,
}

impl NoteLayout {
    /// Build the layout described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either header template is malformed.
    pub fn from_config(cfg: &Config) -> Result<Self, TemplateError> {
        let slide = HeaderTemplate::slide(&cfg.slide_format)?;
        let pdf = if cfg.pdf_in_yaml {
            PdfLocation::Preamble(Regex::new(PREAMBLE_PATTERN)?)
        } else {
            PdfLocation::Inline(HeaderTemplate::pdf(&cfg.pdf_section_format)?)
        };
        Ok(Self { slide, pdf })
    }

    /// Read the active PDF filename from the buffer.
    ///
    /// Takes the nearest PDF line at or above the cursor, falling back to the first one below it.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoDocument`] if the buffer names no PDF.
    pub fn document_name<B: NoteBuffer + ?Sized>(&self, buffer: &B) -> Result<String, NavError> {
        let extract = |line: &str| -> Option<String> {
            match &self.pdf {
                PdfLocation::Preamble(pattern) => pattern
                    .captures(line)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string()),
                PdfLocation::Inline(template) => template.extract(line).map(str::to_string),
            }
        };

        let count = buffer.line_count();
        let cursor = buffer.cursor_line().min(count.saturating_sub(1));
        let above = (0..=cursor).rev();
        let below = cursor + 1..count;

        above
            .chain(below)
            .filter_map(|n| buffer.line(n))
            .find_map(extract)
            .ok_or(NavError::NoDocument)
    }
}

/// Scans a buffer for the regions belonging to one PDF.
pub struct Navigator<'a, B: NoteBuffer + ?Sized> {
    buffer: &'a mut B,
    layout: &'a NoteLayout,
    document: &'a str,
}

impl<'a, B: NoteBuffer + ?Sized> Navigator<'a, B> {
    /// Navigate `buffer` for notes on `document` following `layout`.
    pub fn new(buffer: &'a mut B, layout: &'a NoteLayout, document: &'a str) -> Self {
        Self {
            buffer,
            layout,
            document,
        }
    }

    fn bounded(&self, range: Option<Range<usize>>) -> Range<usize> {
        let count = self.buffer.line_count();
        match range {
            Some(r) => r.start.min(count)..r.end.min(count),
            None => 0..count,
        }
    }

    #[must_use]
    /// Every line in `range` (or the whole buffer) that `pattern` matches from its first column.
    pub fn matching_lines(
        &self,
        pattern: &Regex,
        range: Option<Range<usize>>,
    ) -> Vec<(usize, &str)> {
        self.bounded(range)
            .filter_map(|n| self.buffer.line(n).map(|text| (n, text)))
            .filter(|(_, text)| pattern.find(text).is_some_and(|m| m.start() == 0))
            .collect()
    }

    #[must_use]
    /// Partition `range` into one region per header match.
    ///
    /// Each region starts at its header and stops just before the next header, the last one
    /// running to the end of `range`. Lines above the first header belong to no region.
    pub fn ranges_by_pattern(
        &self,
        pattern: &Regex,
        range: Option<Range<usize>>,
    ) -> Vec<(Range<usize>, &str)> {
        let end = self.bounded(range.clone()).end;
        let matches = self.matching_lines(pattern, range);

        matches
            .iter()
            .enumerate()
            .map(|(i, &(start, text))| {
                let stop = matches.get(i + 1).map_or(end, |&(next, _)| next);
                (start..stop, text)
            })
            .collect()
    }

    /// The first region whose header contains `unique`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoMatch`] if no header contains it.
    pub fn region_for(
        &self,
        pattern: &Regex,
        unique: &str,
        range: Option<Range<usize>>,
    ) -> Result<Range<usize>, NavError> {
        self.ranges_by_pattern(pattern, range)
            .into_iter()
            .find(|(_, header)| header.contains(unique))
            .map(|(region, _)| region)
            .ok_or_else(|| NavError::NoMatch {
                needle: unique.to_string(),
            })
    }

    /// Region holding the notes for the active PDF.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoMatch`] when inline headers are used and none names the document.
    pub fn pdf_region(&self) -> Result<Range<usize>, NavError> {
        match &self.layout.pdf {
            PdfLocation::Preamble(_) => Ok(0..self.buffer.line_count()),
            PdfLocation::Inline(template) => {
                self.region_for(template.pattern(), self.document, None)
            }
        }
    }

    /// Region holding the note for `page`, or `None` if it has not been written yet.
    ///
    /// # Errors
    ///
    /// Fails if the PDF region itself cannot be found.
    pub fn slide_region(&self, page: u32) -> Result<Option<Range<usize>>, NavError> {
        let within = self.pdf_region()?;
        let header = self.layout.slide.format(page);
        match self.region_for(self.layout.slide.pattern(), &header, Some(within)) {
            Ok(region) => Ok(Some(region)),
            Err(NavError::NoMatch { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[must_use]
    /// First non-blank line at or above `start`.
    pub fn last_non_blank_line(&self, start: usize) -> Option<usize> {
        let start = start.min(self.buffer.line_count().checked_sub(1)?);
        (0..=start)
            .rev()
            .find(|&n| self.buffer.line(n).is_some_and(|text| !text.trim().is_empty()))
    }

    /// Closest page below `page` that already has a note.
    ///
    /// # Errors
    ///
    /// Fails if the PDF region cannot be found.
    pub fn last_note_before_page(&self, page: u32) -> Result<Option<u32>, NavError> {
        for candidate in (1..page).rev() {
            if self.slide_region(candidate)?.is_some() {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Put the cursor just below the last written line of the note for `page`.
    ///
    /// A note ending on the last line of the buffer gets a blank line appended to land on.
    /// Returns the line the cursor was moved to.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoNote`] if the page has no note.
    pub fn jump_to_slide_note(&mut self, page: u32) -> Result<usize, NavError> {
        let region = self.slide_region(page)?.ok_or(NavError::NoNote(page))?;
        let last = self
            .last_non_blank_line(region.end.saturating_sub(1))
            .unwrap_or(region.start);
        let target = last + 1;
        if target >= self.buffer.line_count() {
            self.buffer.insert_lines(target, vec![String::new()]);
        }
        debug!("Jumping to note for page {page} at line {target}");
        self.buffer.set_cursor_line(target);
        Ok(self.buffer.cursor_line())
    }

    /// Jump to the note for `page`, writing an empty one first if there is none.
    ///
    /// A new note goes straight after the closest earlier note, or at the end of the PDF region
    /// when there is no earlier note.
    ///
    /// # Errors
    ///
    /// Fails if the PDF region cannot be found.
    pub fn create_or_jump_to_slide_note(&mut self, page: u32) -> Result<usize, NavError> {
        if self.slide_region(page)?.is_some() {
            return self.jump_to_slide_note(page);
        }

        let insert_at = match self.last_note_before_page(page)? {
            Some(prior) => self
                .slide_region(prior)?
                .map_or_else(|| self.buffer.line_count(), |region| region.end),
            None => self.pdf_region()?.end,
        };

        let mut block = Vec::with_capacity(5);
        let above_is_text = insert_at
            .checked_sub(1)
            .and_then(|n| self.buffer.line(n))
            .is_some_and(|text| !text.trim().is_empty());
        if above_is_text {
            block.push(String::new());
        }
        block.push(self.layout.slide.format(page));
        block.push(String::new());
        block.push(BULLET_PLACEHOLDER.to_string());
        block.push(String::new());

        debug!("Creating note for page {page} at line {insert_at}");
        self.buffer.insert_lines(insert_at, block);
        self.jump_to_slide_note(page)
    }

    /// Page number of the slide note the cursor is in.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NotInNote`] if the cursor is above the first slide header.
    pub fn page_at_cursor(&self) -> Result<u32, NavError> {
        let within = self.pdf_region()?;
        let cursor = self.buffer.cursor_line();
        self.ranges_by_pattern(self.layout.slide.pattern(), Some(within))
            .into_iter()
            .find(|(region, _)| region.contains(&cursor))
            .and_then(|(_, header)| self.layout.slide.extract_page(header))
            .ok_or(NavError::NotInNote)
    }
}

#[cfg(test)]
#[path = "tests/navigator.rs"]
mod tests;
