//! Write markdown reports with a generated title and timestamp header.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use crate::error::ReportError;

/// A report that has been persisted to disk.
#[derive(Debug, Clone)]
pub struct WrittenReport {
    pub path: PathBuf,
    /// Human-readable confirmation for the caller.
    pub message: String,
}

/// Write `content` as a markdown document under `directory`.
///
/// Missing directory segments are created (idempotent); an existing file at
/// the target path is overwritten without warning. The filename gets a `.md`
/// extension when it lacks one, and the content is prefixed with a title
/// line and a UTC timestamp header:
///
/// ```text
/// # notes
///
/// *Generated on: 2026-08-30T12:00:00Z*
///
/// ---
///
/// <content>
/// ```
pub fn write_report(
    content: &str,
    filename: &str,
    directory: &Path,
) -> Result<WrittenReport, ReportError> {
    if content.trim().is_empty() {
        return Err(ReportError::EmptyContent);
    }
    if filename.trim().is_empty() {
        return Err(ReportError::EmptyFilename);
    }

    fs::create_dir_all(directory).map_err(|source| ReportError::CreateDirFailed {
        path: directory.display().to_string(),
        source,
    })?;

    let filename = normalize_filename(filename);
    let title = filename.trim_end_matches(".md");
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let composed = format!("# {title}\n\n*Generated on: {timestamp}*\n\n---\n\n{content}");

    let path = directory.join(&filename);
    fs::write(&path, composed).map_err(|source| ReportError::WriteFailed {
        path: path.display().to_string(),
        source,
    })?;

    let message = format!("Report written to {}", path.display());
    Ok(WrittenReport { path, message })
}

/// Ensure the filename ends in `.md`, without doubling the extension.
fn normalize_filename(filename: &str) -> String {
    if filename.ends_with(".md") {
        filename.to_string()
    } else {
        format!("{filename}.md")
    }
}
