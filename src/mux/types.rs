// ABOUTME: Shared types and error taxonomy for the Multiplexer Driver

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MuxError {
    #[error("multiplexer session {0:?} not found")]
    SessionNotFound(String),
    #[error("multiplexer session {0:?} already exists")]
    SessionExists(String),
    #[error("invalid session name {0:?}: {1}")]
    InvalidName(String, &'static str),
    #[error("{binary} not installed on PATH")]
    NotInstalled { binary: String },
    #[error("{binary} command failed: {stderr}")]
    CommandFailed { binary: String, stderr: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Arguments to `CreateSession`.
#[derive(Debug, Clone)]
pub struct CreateSessionConfig {
    pub name: String,
    pub command: Vec<String>,
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
    /// Session output is additionally teed to this file.
    pub log_path: PathBuf,
}
