// ABOUTME: ContainerDriver implementation that shells out to the docker/podman CLI
// Mirrors the host-subprocess idiom the multiplexer and worktree drivers already use

use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tracing::debug;

use super::driver::ContainerDriver;
use super::types::{
    classify_stderr, Container, ContainerError, ContainerFilter, ContainerStatus, ExecConfig,
    ExecOutput, RunConfig,
};

/// Drives `docker` or `podman` directly; both CLIs speak the same flag grammar for
/// the subset used here.
pub struct CliDriver {
    binary: String,
}

impl CliDriver {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self) -> TokioCommand {
        TokioCommand::new(&self.binary)
    }

    async fn run_capturing(&self, args: &[String]) -> Result<std::process::Output, ContainerError> {
        debug!(runtime = %self.binary, ?args, "invoking container runtime");
        self.command()
            .args(args)
            .output()
            .await
            .map_err(|source| ContainerError::Io {
                runtime: self.binary.clone(),
                source,
            })
    }

    fn check(&self, output: std::process::Output) -> Result<Vec<u8>, ContainerError> {
        if output.status.success() {
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            Err(classify_stderr(
                &self.binary,
                output.status.code().unwrap_or(-1),
                &stderr,
            ))
        }
    }
}

/// Subset of `docker/podman inspect` JSON consumed here.
#[derive(Deserialize)]
struct InspectEntry {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Config")]
    config: InspectConfig,
    #[serde(rename = "State")]
    state: InspectState,
    #[serde(rename = "Created")]
    created: DateTime<Utc>,
}

#[derive(Deserialize)]
struct InspectConfig {
    #[serde(rename = "Image")]
    image: String,
}

#[derive(Deserialize)]
struct InspectState {
    #[serde(rename = "Status")]
    status: String,
}

impl From<InspectEntry> for Container {
    fn from(entry: InspectEntry) -> Self {
        Container {
            id: entry.id,
            name: entry.name.trim_start_matches('/').to_string(),
            image: entry.config.image,
            status: ContainerStatus::from_cli_state(&entry.state.status),
            created_at: entry.created,
        }
    }
}

impl ContainerDriver for CliDriver {
    async fn run(&self, cfg: &RunConfig) -> Result<Container, ContainerError> {
        let mut args = vec!["run".to_string(), "-d".to_string(), "--name".to_string(), cfg.name.clone()];

        for mount in &cfg.mounts {
            let mut spec = format!(
                "{}:{}",
                mount.host_path.display(),
                mount.container_path
            );
            if mount.read_only {
                spec.push_str(":ro");
            }
            args.push("-v".to_string());
            args.push(spec);
        }

        for (key, value) in &cfg.env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }

        args.extend(cfg.flags.iter().cloned());
        args.push(cfg.image.clone());

        match &cfg.init {
            Some(init) => args.extend(init.iter().cloned()),
            None => args.extend(["sleep".to_string(), "infinity".to_string()]),
        }

        let output = self.run_capturing(&args).await?;
        self.check(output)?;

        self.get(&cfg.name).await
    }

    async fn exec(&self, id: &str, cfg: &ExecConfig) -> Result<ExecOutput, ContainerError> {
        let mut args = vec!["exec".to_string()];
        if cfg.interactive {
            args.push("-it".to_string());
        }
        if let Some(user) = &cfg.user {
            args.push("-u".to_string());
            args.push(user.clone());
        }
        if let Some(dir) = &cfg.working_dir {
            args.push("-w".to_string());
            args.push(dir.clone());
        }
        for (key, value) in &cfg.env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(id.to_string());
        args.extend(cfg.command.iter().cloned());

        if cfg.interactive {
            let mut command = Command::new(&self.binary);
            command.args(&args);
            let exit_code = crate::terminal::run_interactive(command).map_err(|source| {
                ContainerError::Io {
                    runtime: self.binary.clone(),
                    source,
                }
            })?;
            return Ok(ExecOutput {
                exit_code,
                stdout: Vec::new(),
                stderr: Vec::new(),
            });
        }

        let output = self
            .command()
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ContainerError::Io {
                runtime: self.binary.clone(),
                source,
            })?;

        Ok(ExecOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    async fn start(&self, id: &str) -> Result<(), ContainerError> {
        let output = self.run_capturing(&["start".to_string(), id.to_string()]).await?;
        self.check(output)?;
        Ok(())
    }

    async fn stop(&self, id: &str) -> Result<(), ContainerError> {
        let output = self.run_capturing(&["stop".to_string(), id.to_string()]).await?;
        self.check(output)?;
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), ContainerError> {
        let output = self
            .run_capturing(&["rm".to_string(), "-f".to_string(), id.to_string()])
            .await?;
        self.check(output)?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Container, ContainerError> {
        let output = self
            .run_capturing(&["inspect".to_string(), id.to_string()])
            .await?;
        let stdout = self.check(output)?;

        let mut entries: Vec<InspectEntry> = serde_json::from_slice(&stdout)
            .map_err(|e| ContainerError::MalformedOutput(e.to_string()))?;
        entries
            .pop()
            .map(Container::from)
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))
    }

    async fn list(&self, filter: &ContainerFilter) -> Result<Vec<Container>, ContainerError> {
        let mut args = vec!["ps".to_string(), "-a".to_string(), "-q".to_string()];
        if let Some(name) = &filter.name {
            args.push("--filter".to_string());
            args.push(format!("name={name}"));
        }
        if let Some(label) = &filter.label {
            args.push("--filter".to_string());
            args.push(format!("label={label}"));
        }

        let output = self.run_capturing(&args).await?;
        let stdout = self.check(output)?;
        let ids: Vec<String> = String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::to_string)
            .filter(|l| !l.is_empty())
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut inspect_args = vec!["inspect".to_string()];
        inspect_args.extend(ids);
        let output = self.run_capturing(&inspect_args).await?;
        let stdout = self.check(output)?;
        let entries: Vec<InspectEntry> = serde_json::from_slice(&stdout)
            .map_err(|e| ContainerError::MalformedOutput(e.to_string()))?;
        Ok(entries.into_iter().map(Container::from).collect())
    }

    fn exec_command_prefix(&self) -> Vec<String> {
        vec![self.binary.clone(), "exec".to_string()]
    }
}
