//! Heuristic commit-message summarization of working-tree changes.

pub mod message;

pub use message::{
    ChangeKind, DEFAULT_MAX_LENGTH, HEADLINE_PRECEDENCE, MAX_LISTED_FILES, classify, summarize,
};
