//! Git operations using git2-rs.

pub mod changes;

pub use changes::{ChangeRecord, collect_changes, is_excluded};
