//! Page counts from `pdfinfo`, which ships alongside xpdf.

use crate::viewer::ViewerError;
use log::debug;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run `program` on `file` and read the page count from its report.
///
/// # Errors
///
/// Returns [`ViewerError::Io`] if the program cannot be run and [`ViewerError::PageCount`] if its
/// output has no `Pages:` line.
pub fn page_count(program: &str, file: &Path) -> Result<u32, ViewerError> {
    let output = Command::new(program)
        .arg(file)
        .stderr(Stdio::null())
        .output()?;
    let report = String::from_utf8_lossy(&output.stdout);
    debug!("{program} reported {} bytes for {}", report.len(), file.display());

    parse_page_count(&report).ok_or_else(|| {
        ViewerError::PageCount(format!(
            "{program} printed no Pages line for {}",
            file.display()
        ))
    })
}

#[must_use]
/// Pull the integer after the last `:` of the first line mentioning `Pages`.
pub fn parse_page_count(report: &str) -> Option<u32> {
    let line = report.lines().find(|line| line.contains("Pages"))?;
    let (_, value) = line.rsplit_once(':')?;
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_page_count;

    #[test]
    fn test_parse_pdfinfo_report() {
        let report = "Title:          Lecture 1\n\
                      Producer:       LaTeX with Beamer\n\
                      Pages:          21\n\
                      Encrypted:      no\n";
        assert_eq!(parse_page_count(report), Some(21));
    }

    #[test]
    fn test_missing_or_malformed_pages_line() {
        assert_eq!(parse_page_count("Title: x\nEncrypted: no\n"), None);
        assert_eq!(parse_page_count("Pages: many\n"), None);
        assert_eq!(parse_page_count(""), None);
    }
}
