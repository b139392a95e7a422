//! Section header templates.
//!
//! Notes are delimited by header lines built from a template string with a single placeholder:
//! `%d` for slide numbers (`"## Slide %d"`) and `%s` for PDF filenames (`"# %s"`). A template can
//! format a concrete header, and can be generalised into an anchored regex matching every header
//! of its kind so that the placeholder value can be read back out of a buffer line.

use regex::Regex;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Kind of value a template's placeholder stands for.
pub enum Placeholder {
    /// `%d`, generalised to one or more digits.
    Integer,
    /// `%s`, generalised to any non-empty text up to the end of the line.
    Text,
}

impl Placeholder {
    #[must_use]
    /// The literal token that marks the placeholder inside a template.
    pub fn token(self) -> &'static str {
        match self {
            Self::Integer => "%d",
            Self::Text => "%s",
        }
    }

    fn capture(self) -> &'static str {
        match self {
            Self::Integer => r"(\d+)",
            Self::Text => r"(.+?)",
        }
    }

    fn tail(self) -> &'static str {
        match self {
            Self::Integer => "",
            Self::Text => r"\s*$",
        }
    }
}

#[derive(Debug, Error)]
/// Reasons a configured header template cannot be used.
pub enum TemplateError {
    /// The template has no placeholder, or more than one.
    #[error("header template {template:?} must contain exactly one {token} placeholder")]
    Placeholder {
        /// The offending template string.
        template: String,
        /// The placeholder token that was expected once.
        token: &'static str,
    },
    /// The generalised pattern failed to compile.
    #[error("header template does not form a valid pattern: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone)]
/// A header template split around its placeholder, with the generalised pattern precompiled.
pub struct HeaderTemplate {
    prefix: String,
    suffix: String,
    placeholder: Placeholder,
    pattern: Regex,
}

impl HeaderTemplate {
    /// Split `template` around its single `placeholder` token.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Placeholder`] unless the token occurs exactly once.
    pub fn new(template: &str, placeholder: Placeholder) -> Result<Self, TemplateError> {
        let token = placeholder.token();
        let mut parts = template.split(token);
        let (Some(prefix), Some(suffix), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TemplateError::Placeholder {
                template: template.to_string(),
                token,
            });
        };

        let pattern = Regex::new(&format!(
            "^{}{}{}{}",
            regex::escape(prefix),
            placeholder.capture(),
            regex::escape(suffix),
            placeholder.tail()
        ))?;

        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            placeholder,
            pattern,
        })
    }

    /// Template for slide headers, e.g. `"## Slide %d"`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the template holds exactly one `%d`.
    pub fn slide(template: &str) -> Result<Self, TemplateError> {
        Self::new(template, Placeholder::Integer)
    }

    /// Template for inline PDF headers, e.g. `"# %s"`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the template holds exactly one `%s`.
    pub fn pdf(template: &str) -> Result<Self, TemplateError> {
        Self::new(template, Placeholder::Text)
    }

    #[must_use]
    /// Render the header line for a concrete value.
    pub fn format(&self, value: impl Display) -> String {
        format!("{}{value}{}", self.prefix, self.suffix)
    }

    #[must_use]
    /// Anchored pattern matching any header produced by this template.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    #[must_use]
    /// Which placeholder this template was built around.
    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    #[must_use]
    /// Read the placeholder value back out of a header line.
    pub fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    #[must_use]
    /// Read a page number out of a slide header line.
    pub fn extract_page(&self, line: &str) -> Option<u32> {
        self.extract(line).and_then(|digits| digits.parse().ok())
    }
}

#[cfg(test)]
#[path = "tests/template.rs"]
mod tests;
