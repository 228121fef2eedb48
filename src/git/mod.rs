// ABOUTME: Git Driver — repo identity and worktree lifecycle

mod repository;
mod types;

pub use repository::{sanitize_branch, Repository};
pub use types::WorktreeError;
