// ABOUTME: Uniform container driver trait implemented by the CLI driver and the devcontainer adapter

use super::types::{Container, ContainerError, ContainerFilter, ExecConfig, ExecOutput, RunConfig};

/// Uniform capability set over Docker, Podman, and (via delegation) the devcontainer CLI.
/// Modeled as one trait parameterized at construction rather than an inheritance
/// hierarchy.
#[allow(async_fn_in_trait)]
pub trait ContainerDriver: Send + Sync {
    async fn run(&self, cfg: &RunConfig) -> Result<Container, ContainerError>;

    /// Blocking exec in a running container. When `cfg.interactive` the caller's TTY
    /// is put into raw mode and `SIGWINCH` is forwarded; the exit code
    /// of the child is returned.
    async fn exec(&self, id: &str, cfg: &ExecConfig) -> Result<ExecOutput, ContainerError>;

    async fn start(&self, id: &str) -> Result<(), ContainerError>;
    async fn stop(&self, id: &str) -> Result<(), ContainerError>;
    async fn remove(&self, id: &str) -> Result<(), ContainerError>;
    async fn get(&self, id: &str) -> Result<Container, ContainerError>;
    async fn list(&self, filter: &ContainerFilter) -> Result<Vec<Container>, ContainerError>;

    /// argv prefix used to compose in-container commands for the multiplexer,
    /// e.g. `["docker", "exec"]`.
    fn exec_command_prefix(&self) -> Vec<String>;
}
