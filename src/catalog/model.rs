// ABOUTME: Catalog data model — Instance and Session as persisted in catalog.json

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Creating,
    Running,
    Stopped,
    Error,
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InstanceStatus::Creating => "creating",
            InstanceStatus::Running => "running",
            InstanceStatus::Stopped => "stopped",
            InstanceStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Shell,
    Claude,
    Gemini,
    Codex,
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionType::Shell => "shell",
            SessionType::Claude => "claude",
            SessionType::Gemini => "gemini",
            SessionType::Codex => "codex",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shell" => Ok(SessionType::Shell),
            "claude" => Ok(SessionType::Claude),
            "gemini" => Ok(SessionType::Gemini),
            "codex" => Ok(SessionType::Codex),
            other => Err(format!("unknown session type {other:?}")),
        }
    }
}

/// A detachable, multiplexer-hosted process inside one instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub mux_session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

/// A (repo, branch) pair bound to a single container and worktree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub repo: String,
    pub repo_id: String,
    pub branch: String,
    pub worktree: String,
    #[serde(default)]
    pub container_id: String,
    #[serde(default)]
    pub remote_user: String,
    #[serde(default)]
    pub remote_workdir: String,
    pub created_at: DateTime<Utc>,
    pub status: InstanceStatus,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Instance {
    pub fn session_by_name(&self, name: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.name == name)
    }

    pub fn session_by_name_mut(&mut self, name: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.name == name)
    }

    pub fn mru_session(&self) -> Option<&Session> {
        self.sessions.iter().max_by_key(|s| s.last_accessed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogFile {
    pub instances: Vec<Instance>,
}
