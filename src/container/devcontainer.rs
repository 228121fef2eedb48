// ABOUTME: Devcontainer Adapter — delegates container lifecycle to the `devcontainer` CLI,
// falling back to the underlying runtime driver for operations it doesn't own

use std::process::{Command, Stdio};

use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tracing::debug;

use super::driver::ContainerDriver;
use super::types::{Container, ContainerError, ContainerFilter, ExecConfig, ExecOutput, RunConfig};

/// Wraps a concrete runtime driver (`CliDriver` for docker/podman) and delegates
/// `up`/`exec` to the `devcontainer` CLI, which owns image build, feature
/// installation, and lifecycle hooks.
/// Everything that isn't start-up (`start`/`stop`/`remove`/`get`/`list`) is
/// forwarded to the inner driver once the container id is known.
pub struct DevcontainerDriver<D: ContainerDriver> {
    inner: D,
    workspace_folder: String,
}

#[derive(Deserialize)]
struct UpResult {
    #[serde(rename = "containerId")]
    container_id: String,
    #[serde(rename = "remoteUser")]
    remote_user: Option<String>,
    #[serde(rename = "remoteWorkspaceFolder")]
    remote_workspace_folder: Option<String>,
}

impl<D: ContainerDriver> DevcontainerDriver<D> {
    pub fn new(inner: D, workspace_folder: impl Into<String>) -> Self {
        Self {
            inner,
            workspace_folder: workspace_folder.into(),
        }
    }

    /// Brings the devcontainer up and returns `(container_id, remote_user, remote_workdir)`.
    /// This is the one operation the plain `ContainerDriver::run` can't express, since the
    /// devcontainer CLI — not us — decides the image, mounts, and env.
    pub async fn up(&self) -> Result<(String, String, String), ContainerError> {
        debug!(workspace = %self.workspace_folder, "bringing up devcontainer");
        let output = TokioCommand::new("devcontainer")
            .args([
                "up",
                "--workspace-folder",
                &self.workspace_folder,
            ])
            .output()
            .await
            .map_err(|source| ContainerError::Io {
                runtime: "devcontainer".to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(ContainerError::BuildFailed(stderr));
        }

        let result: UpResult = serde_json::from_slice(&output.stdout)
            .map_err(|e| ContainerError::MalformedOutput(e.to_string()))?;

        Ok((
            result.container_id,
            result.remote_user.unwrap_or_else(|| "root".to_string()),
            result
                .remote_workspace_folder
                .unwrap_or_else(|| "/workspaces".to_string()),
        ))
    }
}

impl<D: ContainerDriver> ContainerDriver for DevcontainerDriver<D> {
    /// `run` has no devcontainer equivalent; callers use `up` instead, grouped here
    /// so `DevcontainerDriver` can still stand in wherever a `ContainerDriver` is expected.
    async fn run(&self, _cfg: &RunConfig) -> Result<Container, ContainerError> {
        let (id, _, _) = self.up().await?;
        self.inner.get(&id).await
    }

    async fn exec(&self, id: &str, cfg: &ExecConfig) -> Result<ExecOutput, ContainerError> {
        if cfg.interactive {
            let mut args = vec![
                "exec".to_string(),
                "--workspace-folder".to_string(),
                self.workspace_folder.clone(),
            ];
            args.extend(cfg.command.iter().cloned());

            let mut command = Command::new("devcontainer");
            command.args(&args).stdin(Stdio::inherit());
            let exit_code = crate::terminal::run_interactive(command).map_err(|source| {
                ContainerError::Io {
                    runtime: "devcontainer".to_string(),
                    source,
                }
            })?;
            return Ok(ExecOutput {
                exit_code,
                stdout: Vec::new(),
                stderr: Vec::new(),
            });
        }

        // Non-interactive one-shots (agent credential setup) go straight through the
        // underlying runtime driver against the already-materialized container id.
        self.inner.exec(id, cfg).await
    }

    async fn start(&self, id: &str) -> Result<(), ContainerError> {
        self.inner.start(id).await
    }

    async fn stop(&self, id: &str) -> Result<(), ContainerError> {
        self.inner.stop(id).await
    }

    async fn remove(&self, id: &str) -> Result<(), ContainerError> {
        self.inner.remove(id).await
    }

    async fn get(&self, id: &str) -> Result<Container, ContainerError> {
        self.inner.get(id).await
    }

    async fn list(&self, filter: &ContainerFilter) -> Result<Vec<Container>, ContainerError> {
        self.inner.list(filter).await
    }

    fn exec_command_prefix(&self) -> Vec<String> {
        vec![
            "devcontainer".to_string(),
            "exec".to_string(),
            "--workspace-folder".to_string(),
            self.workspace_folder.clone(),
        ]
    }
}
