//! End-to-end tests across the three capabilities: collect changes from a
//! real repository, summarize them, and write the resulting report.

use std::fs;
use std::path::Path;

use git2::{Repository, Signature};

use scriba::git::collect_changes;
use scriba::report::write_report;
use scriba::summary::{DEFAULT_MAX_LENGTH, summarize};

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

#[test]
fn test_changes_flow_into_commit_message() {
    let dir = tempfile::tempdir().unwrap();
    init_repo_with_commit(dir.path());

    fs::write(dir.path().join("alpha.rs"), "fn alpha() {}\n").unwrap();
    fs::write(dir.path().join("beta.rs"), "fn beta() {}\nfn gamma() {}\n").unwrap();

    let records = collect_changes(dir.path()).unwrap();
    let message = summarize(&records, DEFAULT_MAX_LENGTH);

    assert_eq!(message, "Add 2 files: alpha.rs, beta.rs (+3 -0)");
}

#[test]
fn test_clean_repo_summarizes_to_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    init_repo_with_commit(dir.path());

    let records = collect_changes(dir.path()).unwrap();
    assert_eq!(summarize(&records, DEFAULT_MAX_LENGTH), "No changes detected");
}

#[test]
fn test_lock_file_changes_do_not_reach_the_summary() {
    let dir = tempfile::tempdir().unwrap();
    init_repo_with_commit(dir.path());

    fs::write(dir.path().join("Cargo.lock"), "[[package]]\n").unwrap();
    fs::write(dir.path().join("src_file.rs"), "fn f() {}\n").unwrap();

    let records = collect_changes(dir.path()).unwrap();
    let message = summarize(&records, DEFAULT_MAX_LENGTH);

    assert_eq!(message, "Add 1 file: src_file.rs (+1 -0)");
}

#[test]
fn test_summary_written_as_report() {
    let repo_dir = tempfile::tempdir().unwrap();
    let report_dir = tempfile::tempdir().unwrap();
    init_repo_with_commit(repo_dir.path());
    fs::write(repo_dir.path().join("change.txt"), "new line\n").unwrap();

    let records = collect_changes(repo_dir.path()).unwrap();
    let message = summarize(&records, DEFAULT_MAX_LENGTH);

    let report = write_report(&message, "review", report_dir.path()).unwrap();
    let written = fs::read_to_string(&report.path).unwrap();

    assert!(written.starts_with("# review\n"));
    assert!(written.ends_with(&message));
}

#[test]
fn test_truncated_summary_still_fits_bound() {
    let dir = tempfile::tempdir().unwrap();
    init_repo_with_commit(dir.path());

    for i in 0..4 {
        fs::write(
            dir.path().join(format!("file_with_a_long_name_{i}.rs")),
            "fn f() {}\nfn g() {}\n",
        )
        .unwrap();
    }

    let records = collect_changes(dir.path()).unwrap();
    for max in [16, 24, 40] {
        let message = summarize(&records, max);
        assert!(message.chars().count() <= max);
    }
}
