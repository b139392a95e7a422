//! slidenotes: slide-by-slide PDF notes kept in step with an external viewer.
//!
//! Notes are plain markdown with one section per slide. The navigator finds and creates those
//! sections, the viewer drives `xpdf -remote`, and the command table ties the two together.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod buffer;
pub mod commands;
pub mod config;
pub mod navigator;
pub mod template;
pub mod ui;
pub mod viewer;

#[cfg(test)]
mod test_support;
