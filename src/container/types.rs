// ABOUTME: Shared types for the container driver surface (uniform across docker/podman/devcontainer)

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("container already exists: {0}")]
    AlreadyExists(String),
    #[error("container not found: {0}")]
    NotFound(String),
    #[error("container is not running: {0}")]
    NotRunning(String),
    #[error("failed to build image: {0}")]
    BuildFailed(String),
    #[error("{runtime} exited with status {status}: {stderr}")]
    CommandFailed {
        runtime: String,
        status: i32,
        stderr: String,
    },
    #[error("io error invoking {runtime}: {source}")]
    Io {
        runtime: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {runtime} output: {0}")]
    MalformedOutput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    Stopped,
    Unknown,
}

impl ContainerStatus {
    /// CLI state strings → `{running, stopped, unknown}`.
    pub fn from_cli_state(state: &str) -> Self {
        match state {
            "running" => ContainerStatus::Running,
            "stopped" | "exited" | "created" => ContainerStatus::Stopped,
            _ => ContainerStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mount {
    pub host_path: PathBuf,
    pub container_path: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub name: String,
    pub image: String,
    pub mounts: Vec<Mount>,
    pub env: Vec<(String, String)>,
    /// Defaults to `sleep infinity` unless overridden.
    pub init: Option<Vec<String>>,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExecConfig {
    pub user: Option<String>,
    pub working_dir: Option<String>,
    pub env: HashMap<String, String>,
    pub interactive: bool,
    pub command: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: ContainerStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerFilter {
    pub name: Option<String>,
    pub label: Option<String>,
}

/// Result of a non-interactive exec (used for agent setup one-shots).
#[derive(Debug)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Classifies container runtime CLI stderr into typed errors.
pub fn classify_stderr(runtime: &str, status: i32, stderr: &str) -> ContainerError {
    let lower = stderr.to_lowercase();
    if lower.contains("already in use") || lower.contains("already exists") {
        ContainerError::AlreadyExists(stderr.to_string())
    } else if lower.contains("no such") || lower.contains("no container") || lower.contains("not found") {
        ContainerError::NotFound(stderr.to_string())
    } else {
        ContainerError::CommandFailed {
            runtime: runtime.to_string(),
            status,
            stderr: stderr.to_string(),
        }
    }
}
