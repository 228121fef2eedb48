// ABOUTME: Top-level error taxonomy for the instance & session lifecycle manager
// Composes the per-component error enums into one type the CLI can render hints from

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::container::ContainerError;
use crate::git::WorktreeError;
use crate::mux::MuxError;

#[derive(Error, Debug)]
pub enum HjkError {
    #[error("no instance found for branch {0:?}")]
    InstanceNotFound(String),

    #[error("instance {0} already exists")]
    InstanceAlreadyExists(String),

    #[error("session {0:?} not found")]
    SessionNotFound(String),

    #[error("session {0:?} already exists in this instance")]
    SessionExists(String),

    #[error("container {container_id} is {status}; check logs with '{runtime} logs {container_id}'")]
    NotRunning {
        instance_id: String,
        container_id: String,
        status: String,
        runtime: String,
    },

    #[error("no sessions available for instance {0}")]
    NoSessionsAvailable(String),

    #[error("no sessions available in any instance")]
    NoGlobalSessionsAvailable,

    #[error("failed to build image {0}")]
    BuildFailed(String),

    #[error("{0} is not a git repository")]
    NotRepository(PathBuf),

    #[error("worktree not found at {0}")]
    WorktreeNotFound(PathBuf),

    #[error("multiplexer session {0:?} not found")]
    MuxSessionNotFound(String),

    #[error("name generator exhausted {0} attempts without finding a unique name")]
    NameGeneratorExhausted(usize),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Worktree(#[from] WorktreeError),

    #[error(transparent)]
    Mux(#[from] MuxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HjkError>;
