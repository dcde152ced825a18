//! Markdown report output.

pub mod writer;

pub use writer::{WrittenReport, write_report};
