// ABOUTME: Resolved runtime configuration consumed by the Instance Manager
// Stands in for the out-of-scope YAML config loader: reads a handful of HJK_* env
// vars and otherwise falls back to XDG-style defaults rooted at dirs::data_dir()

use std::collections::HashMap;
use std::path::PathBuf;

/// Which container CLI to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRuntime {
    Docker,
    Podman,
}

impl ContainerRuntime {
    pub fn binary(self) -> &'static str {
        match self {
            ContainerRuntime::Docker => "docker",
            ContainerRuntime::Podman => "podman",
        }
    }
}

impl std::fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for all hjk-managed state.
    pub data_dir: PathBuf,
    /// `<data_dir>/catalog.json`
    pub catalog_path: PathBuf,
    /// `<data_dir>/git`
    pub worktrees_dir: PathBuf,
    /// `<data_dir>/logs`
    pub logs_dir: PathBuf,
    /// `docker` or `podman`
    pub container_runtime: ContainerRuntime,
    /// Image used for vanilla (non-devcontainer) instances when `--image` is not given.
    pub default_image: String,
    /// Extra flags appended after the driver's own flags when starting a container.
    pub default_run_flags: Vec<String>,
    /// Per-agent-type extra env vars sourced from the environment (credential plumbing).
    pub agent_env: HashMap<String, String>,
}

impl Config {
    /// Resolve configuration from `HJK_*` environment variables, falling back to
    /// `dirs::data_dir()/hjk` defaults. The interactive credential-prompt UI and
    /// YAML config file loading are out of scope for the core; this
    /// is the minimal surface the core actually reads.
    pub fn from_env_or_defaults() -> Self {
        let data_dir = std::env::var_os("HJK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(std::env::temp_dir)
                    .join("hjk")
            });

        let container_runtime = match std::env::var("HJK_CONTAINER_RUNTIME").as_deref() {
            Ok("podman") => ContainerRuntime::Podman,
            _ => ContainerRuntime::Docker,
        };

        let default_image = std::env::var("HJK_DEFAULT_IMAGE")
            .unwrap_or_else(|_| "ubuntu:24.04".to_string());

        Self {
            catalog_path: data_dir.join("catalog.json"),
            worktrees_dir: data_dir.join("git"),
            logs_dir: data_dir.join("logs"),
            data_dir,
            container_runtime,
            default_image,
            default_run_flags: Vec::new(),
            agent_env: HashMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env_or_defaults()
    }
}
