//! Working-tree change collection using git2.

use std::collections::HashSet;
use std::path::Path;

use git2::{Diff, DiffFormat, DiffOptions, ErrorCode, Repository, Tree};
use tracing::debug;

use crate::error::GitError;

/// Maximum characters of unified diff text kept per file.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// Build-output directories whose contents are never reported.
const EXCLUDED_DIRS: &[&str] = &["target", "dist", "node_modules"];

/// Dependency lock files that are never reported.
const EXCLUDED_FILES: &[&str] = &["Cargo.lock", "package-lock.json"];

/// A changed file in the working tree, with its line counts and diff text.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChangeRecord {
    pub path: String,
    pub insertions: usize,
    pub deletions: usize,
    pub diff_text: String,
    /// True when the diff text was cut at [`MAX_DIFF_LENGTH`]. Line counts
    /// still cover the whole file.
    pub truncated: bool,
}

/// Whether a repo-relative path is in the fixed exclusion set.
///
/// Directory components are matched against build-output names, the final
/// component against lock-file names.
pub fn is_excluded(path: &str) -> bool {
    let mut components = path.split('/').peekable();
    while let Some(part) = components.next() {
        if components.peek().is_none() {
            return EXCLUDED_FILES.contains(&part);
        }
        if EXCLUDED_DIRS.contains(&part) {
            return true;
        }
    }
    false
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// `Ok(Some(tree))` for repos with a valid HEAD, or `Err(GitError::DiffFailed)`
/// for real errors (corrupt HEAD, permission issues, missing objects).
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Options for the workdir side of the diff (untracked files included,
/// with their content, so new files produce real line counts).
fn workdir_diff_options() -> DiffOptions {
    let mut opts = DiffOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .show_untracked_content(true);
    opts
}

/// Collect pending changes (staged + unstaged + untracked) for a working tree.
///
/// `root` may point anywhere inside the working tree. Changed files are
/// reported in discovery order (staged diff first, then unstaged, first
/// occurrence wins); files in the fixed exclusion set are skipped before
/// their diffs are read.
pub fn collect_changes(root: &Path) -> Result<Vec<ChangeRecord>, GitError> {
    let repo = Repository::discover(root).map_err(|e| GitError::RepositoryNotFound {
        path: root.display().to_string(),
        source: e,
    })?;

    let head_tree = resolve_head_tree(&repo)?;

    let staged = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let mut opts = workdir_diff_options();
    let unstaged = repo
        .diff_index_to_workdir(None, Some(&mut opts))
        .map_err(GitError::DiffFailed)?;

    let mut paths = Vec::new();
    collect_paths_from_diff(&staged, &mut paths);
    collect_paths_from_diff(&unstaged, &mut paths);

    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        if is_excluded(&path) {
            debug!("Skipping excluded path: {path}");
            continue;
        }
        records.push(read_file_diff(&repo, head_tree.as_ref(), &path)?);
    }

    Ok(records)
}

/// Collect changed file paths from a diff, in delta order.
fn collect_paths_from_diff(diff: &Diff<'_>, paths: &mut Vec<String>) {
    for delta in diff.deltas() {
        let path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        if !path.is_empty() {
            paths.push(path);
        }
    }
}

/// Read the unified diff for a single file, counting inserted and deleted
/// lines along the way.
///
/// Merges the pathspec-scoped staged and unstaged diffs. A failed diff query
/// propagates as [`GitError::DiffUnavailable`]; nothing is silently skipped.
fn read_file_diff(
    repo: &Repository,
    head_tree: Option<&Tree<'_>>,
    path: &str,
) -> Result<ChangeRecord, GitError> {
    let unavailable = |source| GitError::DiffUnavailable {
        path: path.to_string(),
        source,
    };

    let mut staged_opts = DiffOptions::new();
    staged_opts.pathspec(path);
    let staged = repo
        .diff_tree_to_index(head_tree, None, Some(&mut staged_opts))
        .map_err(unavailable)?;

    let mut unstaged_opts = workdir_diff_options();
    unstaged_opts.pathspec(path);
    let unstaged = repo
        .diff_index_to_workdir(None, Some(&mut unstaged_opts))
        .map_err(unavailable)?;

    let mut record = ChangeRecord {
        path: path.to_string(),
        insertions: 0,
        deletions: 0,
        diff_text: String::new(),
        truncated: false,
    };

    append_diff_text(&staged, &mut record).map_err(unavailable)?;
    append_diff_text(&unstaged, &mut record).map_err(unavailable)?;

    Ok(record)
}

/// Append unified diff text from a diff object, respecting the max length.
///
/// Line counts keep accumulating after the text cap is hit, so truncation
/// never skews insertion/deletion totals.
fn append_diff_text(diff: &Diff<'_>, record: &mut ChangeRecord) -> Result<(), git2::Error> {
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        match origin {
            '+' => record.insertions += 1,
            '-' => record.deletions += 1,
            _ => {}
        }

        if record.truncated {
            return true;
        }

        let content = std::str::from_utf8(line.content()).unwrap_or("");
        if record.diff_text.len() + content.len() + 2 > MAX_DIFF_LENGTH {
            record.truncated = true;
            return true;
        }

        if origin == '+' || origin == '-' || origin == ' ' {
            record.diff_text.push(origin);
        }
        record.diff_text.push_str(content);

        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;

    fn init_repo_with_commit(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let sig = Signature::now("Test", "test@test.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
                .unwrap();
        }
        repo
    }

    fn commit_file(repo: &Repository, dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test", "test@test.com").unwrap();
        let parent = repo.head().unwrap().peel_to_commit().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "add file", &tree, &[&parent])
            .unwrap();
    }

    #[test]
    fn test_is_excluded_lock_files() {
        assert!(is_excluded("Cargo.lock"));
        assert!(is_excluded("package-lock.json"));
        assert!(is_excluded("sub/dir/Cargo.lock"));
        assert!(!is_excluded("Cargo.toml"));
    }

    #[test]
    fn test_is_excluded_build_dirs() {
        assert!(is_excluded("target/debug/main.o"));
        assert!(is_excluded("web/dist/bundle.js"));
        assert!(is_excluded("node_modules/left-pad/index.js"));
        assert!(!is_excluded("src/target.rs"));
        // "dist" as a file name is not a build directory
        assert!(!is_excluded("docs/dist"));
    }

    #[test]
    fn test_collect_changes_not_a_repo() {
        let dir = tempfile::tempdir().unwrap();
        let result = collect_changes(dir.path());
        assert!(matches!(result, Err(GitError::RepositoryNotFound { .. })));
    }

    #[test]
    fn test_collect_changes_clean_tree_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        init_repo_with_commit(dir.path());

        let records = collect_changes(dir.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_collect_changes_untracked_file_is_pure_addition() {
        let dir = tempfile::tempdir().unwrap();
        init_repo_with_commit(dir.path());
        std::fs::write(dir.path().join("new.txt"), "line one\nline two\n").unwrap();

        let records = collect_changes(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.path, "new.txt");
        assert_eq!(record.insertions, 2);
        assert_eq!(record.deletions, 0);
        assert!(record.diff_text.contains("line one"));
        assert!(!record.truncated);
    }

    #[test]
    fn test_collect_changes_modified_file_counts_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());
        commit_file(&repo, dir.path(), "file.txt", "original\n");

        std::fs::write(dir.path().join("file.txt"), "changed\n").unwrap();

        let records = collect_changes(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.path, "file.txt");
        assert_eq!(record.insertions, 1);
        assert_eq!(record.deletions, 1);
        assert!(record.diff_text.contains("-original"));
        assert!(record.diff_text.contains("+changed"));
    }

    #[test]
    fn test_collect_changes_skips_excluded_files() {
        let dir = tempfile::tempdir().unwrap();
        init_repo_with_commit(dir.path());
        std::fs::write(dir.path().join("package-lock.json"), "{}\n").unwrap();
        std::fs::write(dir.path().join("kept.txt"), "keep me\n").unwrap();

        let records = collect_changes(dir.path()).unwrap();
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert!(paths.contains(&"kept.txt"));
        assert!(!paths.contains(&"package-lock.json"));
    }

    #[test]
    fn test_collect_changes_deleted_file_is_pure_deletion() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo_with_commit(dir.path());
        commit_file(&repo, dir.path(), "doomed.txt", "a\nb\nc\n");

        std::fs::remove_file(dir.path().join("doomed.txt")).unwrap();

        let records = collect_changes(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.path, "doomed.txt");
        assert_eq!(record.insertions, 0);
        assert_eq!(record.deletions, 3);
    }

    #[test]
    fn test_collect_changes_empty_repo_reports_untracked() {
        // No commits yet: the baseline is empty, untracked files still show up
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("first.txt"), "hello\n").unwrap();

        let records = collect_changes(dir.path()).unwrap();
        assert!(records.iter().any(|r| r.path == "first.txt"));
    }
}
