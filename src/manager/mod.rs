// ABOUTME: Instance Manager — the single orchestrator composing git worktree + container +
// catalog entry into one instance, and sessions inside it

mod session;
mod shutdown;

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::catalog::{CatalogStore, Instance, InstanceStatus, ListFilter};
use crate::config::Config;
use crate::container::{CliDriver, ContainerDriver, ExecConfig, Mount, RunConfig};
use crate::error::{HjkError, Result};
use crate::git::{sanitize_branch, Repository};
use crate::logs::LogPaths;
use crate::mux::TmuxDriver;

pub use session::{AgentType, CreateSessionOptions, CredentialType};

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub branch: String,
    pub image: Option<String>,
    /// Set when the caller wants devcontainer mode explicitly skipped/forced;
    /// `None` defers to whether `.devcontainer`/`.devcontainer.json` exists in the
    /// instance's own worktree (not the source repo root the worktree was cut from).
    pub workspace_folder: Option<PathBuf>,
    pub runtime_flags: Vec<String>,
}

/// Direct-exec options for `Attach(id, ...)`, bypassing the multiplexer entirely.
#[derive(Debug, Clone, Default)]
pub struct AttachOptions {
    pub command: Vec<String>,
    pub interactive: bool,
    pub workdir: Option<String>,
    pub env: Vec<(String, String)>,
}

pub struct Manager {
    config: Config,
    catalog: CatalogStore,
    mux: TmuxDriver,
    logs: LogPaths,
}

impl Manager {
    pub fn new(config: Config) -> Self {
        let catalog = CatalogStore::new(config.catalog_path.clone());
        let logs = LogPaths::new(config.logs_dir.clone());
        Self {
            config,
            catalog,
            mux: TmuxDriver::new(),
            logs,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub(crate) fn mux(&self) -> &TmuxDriver {
        &self.mux
    }

    pub(crate) fn logs(&self) -> &LogPaths {
        &self.logs
    }

    pub(crate) fn driver(&self) -> CliDriver {
        CliDriver::new(self.config.container_runtime.binary())
    }

    fn devcontainer_detected(worktree: &Path) -> Option<PathBuf> {
        let candidates = [
            worktree.join(".devcontainer").join("devcontainer.json"),
            worktree.join(".devcontainer.json"),
        ];
        candidates
            .into_iter()
            .find(|p| p.exists())
            .map(|_| worktree.to_path_buf())
    }

    /// Create an instance for `branch` at `repo_path`; fails `AlreadyExists` if one
    /// already exists for this `(repo_id, branch)`, per spec.md §4.1 step 2 — restart of
    /// a stopped instance is the CLI `run` command's job (§6), not this API's.
    pub async fn create(&self, repo_path: &Path, opts: CreateOptions) -> Result<Instance> {
        let repo = Repository::open(repo_path)?;
        let repo_id = repo.identifier();

        if self.catalog.get_by_repo_branch(&repo_id, &opts.branch).is_ok() {
            return Err(HjkError::InstanceAlreadyExists(opts.branch));
        }

        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let sanitized_branch = sanitize_branch(&opts.branch);
        let worktree = self
            .config
            .worktrees_dir
            .join(&repo_id)
            .join(&sanitized_branch);
        let container_name = format!("hjk-{repo_id}-{sanitized_branch}");

        let mut instance = Instance {
            id: id.clone(),
            repo: repo.root().display().to_string(),
            repo_id: repo_id.clone(),
            branch: opts.branch.clone(),
            worktree: worktree.display().to_string(),
            container_id: String::new(),
            remote_user: String::new(),
            remote_workdir: String::new(),
            created_at: chrono::Utc::now(),
            status: InstanceStatus::Creating,
            sessions: Vec::new(),
        };
        self.catalog.add(instance.clone())?;

        if let Err(e) = repo.create_worktree(&worktree, &opts.branch) {
            warn!(instance = %id, error = %e, "worktree creation failed, rolling back");
            let _ = self.catalog.remove(&id);
            return Err(e.into());
        }

        let workspace_folder = opts
            .workspace_folder
            .clone()
            .or_else(|| Self::devcontainer_detected(&worktree));

        let start_result = self
            .start_container(&container_name, &worktree, opts.image.as_deref(), workspace_folder.as_deref(), &opts.runtime_flags)
            .await;

        let (container_id, remote_user, remote_workdir) = match start_result {
            Ok(triple) => triple,
            Err(e) => {
                warn!(instance = %id, error = %e, "container start failed, rolling back");
                if let Err(rollback_err) = repo.remove_worktree(&worktree) {
                    warn!(instance = %id, error = %rollback_err, "worktree rollback also failed");
                }
                let _ = self.catalog.remove(&id);
                return Err(e);
            }
        };

        instance.container_id = container_id;
        instance.remote_user = remote_user;
        instance.remote_workdir = remote_workdir;
        instance.status = InstanceStatus::Running;

        if let Err(e) = self.catalog.update(instance.clone()) {
            warn!(instance = %id, error = %e, "catalog update failed, tearing down container");
            self.stop_and_remove_with_retry(&instance.container_id).await;
            if let Err(rollback_err) = repo.remove_worktree(&worktree) {
                warn!(instance = %id, error = %rollback_err, "worktree rollback also failed");
            }
            let _ = self.catalog.remove(&id);
            return Err(e.into());
        }

        Ok(instance)
    }

    async fn start_container(
        &self,
        container_name: &str,
        worktree: &Path,
        image: Option<&str>,
        workspace_folder: Option<&Path>,
        extra_flags: &[String],
    ) -> Result<(String, String, String)> {
        if let Some(workspace_folder) = workspace_folder {
            let devcontainer = crate::container::DevcontainerDriver::new(
                self.driver(),
                workspace_folder.display().to_string(),
            );
            let (container_id, remote_user, remote_workdir) = devcontainer.up().await?;
            return Ok((container_id, remote_user, remote_workdir));
        }

        let mut flags = self.config.default_run_flags.clone();
        flags.extend(extra_flags.iter().cloned());

        let run_cfg = RunConfig {
            name: container_name.to_string(),
            image: image.unwrap_or(&self.config.default_image).to_string(),
            mounts: vec![Mount {
                host_path: worktree.to_path_buf(),
                container_path: "/workspace".to_string(),
                read_only: false,
            }],
            env: Vec::new(),
            init: None,
            flags,
        };

        let container = self.driver().run(&run_cfg).await?;
        Ok((container.id, String::new(), String::new()))
    }

    /// Fetch the entry, refreshing `status` from the container driver; a container that
    /// has vanished is surfaced as `status=error` rather than failing the call.
    pub async fn get(&self, id: &str) -> Result<Instance> {
        let mut instance = self.catalog.get(id)?;
        self.refresh_status(&mut instance).await;
        Ok(instance)
    }

    pub async fn get_by_branch(&self, repo_path: &Path, branch: &str) -> Result<Instance> {
        let repo = Repository::open(repo_path)?;
        let mut instance = self
            .catalog
            .get_by_repo_branch(&repo.identifier(), branch)?;
        self.refresh_status(&mut instance).await;
        Ok(instance)
    }

    async fn refresh_status(&self, instance: &mut Instance) {
        if instance.container_id.is_empty() {
            return;
        }
        match self.driver().get(&instance.container_id).await {
            Ok(container) => {
                instance.status = match container.status {
                    crate::container::ContainerStatus::Running => InstanceStatus::Running,
                    crate::container::ContainerStatus::Stopped => InstanceStatus::Stopped,
                    crate::container::ContainerStatus::Unknown => InstanceStatus::Error,
                };
            }
            Err(_) => instance.status = InstanceStatus::Error,
        }
    }

    /// Entries whose container inspect fails are silently skipped.
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<Instance>> {
        let mut instances = self.catalog.list(filter)?;
        let mut live = Vec::with_capacity(instances.len());
        for mut instance in instances.drain(..) {
            if instance.container_id.is_empty() {
                live.push(instance);
                continue;
            }
            if self.driver().get(&instance.container_id).await.is_ok() {
                self.refresh_status(&mut instance).await;
                live.push(instance);
            }
        }
        Ok(live)
    }

    pub async fn start(&self, id: &str) -> Result<()> {
        let mut instance = self.catalog.get(id)?;
        self.driver().start(&instance.container_id).await?;
        instance.status = InstanceStatus::Running;
        self.catalog.update(instance)?;
        Ok(())
    }

    /// Stop: shutdown sequence (kill sessions, stop container), but keep the container
    /// and catalog entry.
    pub async fn stop(&self, id: &str) -> Result<()> {
        let mut instance = self.catalog.get(id)?;
        self.shutdown(&mut instance, false).await?;
        instance.status = InstanceStatus::Stopped;
        self.catalog.update(instance)?;
        Ok(())
    }

    /// Full teardown: shutdown (kill sessions → stop → remove container), remove
    /// worktree (tolerate already-gone), remove instance log directory, remove entry.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let mut instance = self.catalog.get(id)?;
        self.shutdown(&mut instance, true).await?;

        if let Ok(repo) = Repository::open(Path::new(&instance.repo)) {
            match repo.remove_worktree(Path::new(&instance.worktree)) {
                Ok(()) | Err(crate::git::WorktreeError::WorktreeNotFound(_)) => {}
                Err(e) => warn!(instance = %id, error = %e, "failed to remove worktree"),
            }
        }

        self.logs.remove_instance_logs(&instance.id);
        self.catalog.remove(id)?;
        Ok(())
    }

    /// Replace the container in place: shutdown + remove the old one, start a new one
    /// mounted at the same worktree, update `container_id`. Sessions are NOT recreated.
    pub async fn recreate(&self, id: &str, new_image: &str) -> Result<()> {
        let mut instance = self.catalog.get(id)?;
        self.shutdown(&mut instance, true).await?;

        let worktree = PathBuf::from(&instance.worktree);
        let container_name = format!(
            "hjk-{}-{}",
            instance.repo_id,
            sanitize_branch(&instance.branch)
        );
        let (container_id, remote_user, remote_workdir) = self
            .start_container(&container_name, &worktree, Some(new_image), None, &[])
            .await?;

        instance.container_id = container_id;
        instance.remote_user = remote_user;
        instance.remote_workdir = remote_workdir;
        instance.status = InstanceStatus::Running;
        instance.sessions.clear();
        self.catalog.update(instance)?;
        Ok(())
    }

    /// Direct `exec` into the container, bypassing the multiplexer entirely.
    pub async fn attach(&self, id: &str, opts: AttachOptions) -> Result<i32> {
        let instance = self.catalog.get(id)?;
        if instance.container_id.is_empty() {
            return Err(HjkError::NotRunning {
                instance_id: instance.id,
                container_id: String::new(),
                status: "creating".to_string(),
                runtime: self.config.container_runtime.to_string(),
            });
        }

        let workdir = opts.workdir.unwrap_or_else(|| {
            if instance.remote_workdir.is_empty() {
                "/workspace".to_string()
            } else {
                instance.remote_workdir.clone()
            }
        });

        let command = if opts.command.is_empty() {
            vec!["/bin/bash".to_string()]
        } else {
            opts.command
        };

        let cfg = ExecConfig {
            user: if instance.remote_user.is_empty() {
                None
            } else {
                Some(instance.remote_user.clone())
            },
            working_dir: Some(workdir),
            env: opts.env.into_iter().collect(),
            interactive: opts.interactive,
            command,
        };

        let output = self.driver().exec(&instance.container_id, &cfg).await?;
        Ok(output.exit_code)
    }
}
