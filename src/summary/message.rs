//! One-line commit message generation from changed-file records.
//!
//! Pure string assembly: classify each file into a change bucket, pick a
//! headline from the first non-empty bucket in precedence order, list up to
//! three example files, append aggregate line counts, and bound the length.

use crate::git::changes::{ChangeRecord, is_excluded};

/// Default upper bound on the rendered message length, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 72;

/// Largest winning bucket that still gets its file names listed.
pub const MAX_LISTED_FILES: usize = 3;

/// Message returned when nothing relevant changed.
const NO_CHANGES: &str = "No changes detected";

/// Classification of a single changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    /// Zero insertions and zero deletions. Joins no headline bucket.
    Unchanged,
}

impl ChangeKind {
    /// Headline verb for this kind. `Unchanged` has none.
    pub fn verb(self) -> Option<&'static str> {
        match self {
            ChangeKind::Added => Some("Add"),
            ChangeKind::Deleted => Some("Remove"),
            ChangeKind::Modified => Some("Update"),
            ChangeKind::Unchanged => None,
        }
    }
}

/// Bucket order for headline selection: the first non-empty bucket wins,
/// even when later buckets are also populated.
pub const HEADLINE_PRECEDENCE: [ChangeKind; 3] = [
    ChangeKind::Added,
    ChangeKind::Deleted,
    ChangeKind::Modified,
];

/// Classify a file by its line counts.
pub fn classify(insertions: usize, deletions: usize) -> ChangeKind {
    match (insertions > 0, deletions > 0) {
        (true, false) => ChangeKind::Added,
        (false, true) => ChangeKind::Deleted,
        (true, true) => ChangeKind::Modified,
        (false, false) => ChangeKind::Unchanged,
    }
}

/// Render a single-line commit message for a set of changed files.
///
/// The output never exceeds `max_length` characters; when it would, it is
/// cut at a hard character count (not word-aware) and suffixed with `"..."`.
/// An empty record set yields the fixed `"No changes detected"` message,
/// which is exempt from the length bound.
pub fn summarize(records: &[ChangeRecord], max_length: usize) -> String {
    // Defense in depth: the change reader already drops excluded paths.
    let filtered: Vec<&ChangeRecord> = records.iter().filter(|r| !is_excluded(&r.path)).collect();

    if filtered.is_empty() {
        return NO_CHANGES.to_string();
    }

    // Aggregate totals span every filtered record, winning bucket or not.
    let total_insertions: usize = filtered.iter().map(|r| r.insertions).sum();
    let total_deletions: usize = filtered.iter().map(|r| r.deletions).sum();

    let winner = HEADLINE_PRECEDENCE.iter().copied().find_map(|kind| {
        let members: Vec<&str> = filtered
            .iter()
            .filter(|r| classify(r.insertions, r.deletions) == kind)
            .map(|r| r.path.as_str())
            .collect();
        if members.is_empty() {
            None
        } else {
            Some((kind, members))
        }
    });

    // Every record at 0/0 leaves no bucket to headline.
    let Some((kind, members)) = winner else {
        return NO_CHANGES.to_string();
    };

    // The precedence list never yields Unchanged.
    let verb = kind.verb().unwrap_or_default();
    let plural = if members.len() == 1 { "" } else { "s" };
    let mut message = format!("{verb} {} file{plural}", members.len());

    if members.len() <= MAX_LISTED_FILES {
        message.push_str(": ");
        message.push_str(&members.join(", "));
    }

    if total_insertions + total_deletions > 0 {
        message.push_str(&format!(" (+{total_insertions} -{total_deletions})"));
    }

    if message.chars().count() > max_length {
        // Bounds too small to fit the ellipsis get a bare hard cut
        if max_length <= 3 {
            return message.chars().take(max_length).collect();
        }
        let mut cut: String = message.chars().take(max_length - 3).collect();
        cut.push_str("...");
        return cut;
    }

    message
}
