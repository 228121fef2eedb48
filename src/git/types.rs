// ABOUTME: Shared types and error taxonomy for the Git Driver

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorktreeError {
    #[error("{0} is not a git repository")]
    NotRepository(PathBuf),
    #[error("worktree not found at {0}")]
    WorktreeNotFound(PathBuf),
    #[error("worktree already exists at {0}")]
    AlreadyExists(PathBuf),
    #[error("git repository error: {0}")]
    Git(#[from] git2::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("git command failed: {0}")]
    CommandFailed(String),
}
