// ABOUTME: Session operations on an existing instance — create/list/attach/kill, MRU
// resolution, and the one-shot in-container agent credential setup

use std::collections::HashMap;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::catalog::{Instance, InstanceStatus, Session, SessionType};
use crate::container::{ContainerDriver, ExecConfig};
use crate::error::{HjkError, Result};
use crate::mux::{format_session_name, CreateSessionConfig};
use crate::names;

use super::Manager;

pub type AgentType = SessionType;

/// How an agent's credentials are supplied; only consulted for gemini/codex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialType {
    Subscription,
    ApiKey,
}

#[derive(Debug, Clone, Default)]
pub struct CreateSessionOptions {
    pub session_type: Option<SessionType>,
    pub name: Option<String>,
    pub command: Option<Vec<String>>,
    pub env: HashMap<String, String>,
    pub credential_type: Option<CredentialType>,
    /// Gates agent setup for gemini/codex; claude's onboarding marker runs regardless.
    pub requires_agent_setup: bool,
}

impl Manager {
    pub async fn create_session(
        &self,
        instance_id: &str,
        opts: CreateSessionOptions,
    ) -> Result<Session> {
        let mut instance = self.catalog().get(instance_id)?;
        self.refresh_status(&mut instance).await;
        if instance.status != InstanceStatus::Running {
            return Err(HjkError::NotRunning {
                instance_id: instance.id.clone(),
                container_id: instance.container_id.clone(),
                status: instance.status.to_string(),
                runtime: self.config().container_runtime.to_string(),
            });
        }

        let session_id = Uuid::new_v4().simple().to_string()[..8].to_string();

        let name = match opts.name {
            Some(requested) => {
                if instance.session_by_name(&requested).is_some() {
                    return Err(HjkError::SessionExists(requested));
                }
                requested
            }
            None => {
                let taken = &instance;
                names::generate_unique(|candidate| taken.session_by_name(candidate).is_some(), 100)
                    .map_err(|e| HjkError::NameGeneratorExhausted(e.0))?
            }
        };

        let mux_session_id = format_session_name(&instance.id, &session_id)?;

        let log_path = self.logs().ensure_session_log(&instance.id, &session_id)?;

        let session_type = opts.session_type.unwrap_or(SessionType::Shell);
        let should_setup = match session_type {
            SessionType::Claude => true,
            SessionType::Gemini | SessionType::Codex => opts.requires_agent_setup,
            SessionType::Shell => false,
        };

        // Credential env vars are passed through the one-shot setup exec *and* the
        // multiplexer session itself, so the agent process also sees them.
        let mut env = opts.env;
        for (key, value) in agent_credential_env(session_type) {
            env.entry(key).or_insert(value);
        }

        if should_setup {
            self.run_agent_setup(&instance, session_type, opts.credential_type, &env)
                .await?;
        }

        let exec_prefix = self.driver().exec_command_prefix();
        let workdir = if instance.remote_workdir.is_empty() {
            "/workspace".to_string()
        } else {
            instance.remote_workdir.clone()
        };
        // For shell sessions `opts.command` replaces the default `/bin/bash` outright;
        // for agent sessions it's extra argv appended after the agent binary (a prompt,
        // pass-through flags, ...), never a replacement for it.
        let command = if matches!(session_type, SessionType::Shell) {
            opts.command
                .unwrap_or_else(|| vec![agent_binary(session_type).to_string()])
        } else {
            let mut full = vec![agent_binary(session_type).to_string()];
            full.extend(opts.command.unwrap_or_default());
            full
        };

        let mut argv = exec_prefix;
        argv.push("-it".to_string());
        if !instance.remote_user.is_empty() {
            argv.push("-u".to_string());
            argv.push(instance.remote_user.clone());
        }
        argv.push("-w".to_string());
        argv.push(workdir);
        for (key, value) in &env {
            argv.push("-e".to_string());
            argv.push(format!("{key}={value}"));
        }
        argv.push(instance.container_id.clone());
        argv.extend(command);

        let create_cfg = CreateSessionConfig {
            name: mux_session_id.clone(),
            command: argv,
            cwd: std::path::PathBuf::from(&instance.worktree),
            env,
            log_path,
        };

        if let Err(e) = self.mux().create_session(&create_cfg).await {
            self.logs().remove_session_log(&instance.id, &session_id);
            return Err(e.into());
        }

        let now = Utc::now();
        let session = Session {
            id: session_id.clone(),
            name,
            session_type,
            mux_session_id: mux_session_id.clone(),
            created_at: now,
            last_accessed: now,
        };

        instance.sessions.push(session.clone());
        if let Err(e) = self.catalog().update(instance.clone()) {
            warn!(session = %mux_session_id, error = %e, "persisting session failed, rolling back");
            let _ = self.mux().kill_session(&mux_session_id).await;
            self.logs().remove_session_log(&instance.id, &session_id);
            return Err(e.into());
        }

        Ok(session)
    }

    pub fn get_session(&self, instance_id: &str, name: &str) -> Result<Session> {
        let instance = self.catalog().get(instance_id)?;
        instance
            .session_by_name(name)
            .cloned()
            .ok_or_else(|| HjkError::SessionNotFound(name.to_string()))
    }

    pub fn list_sessions(&self, instance_id: &str) -> Result<Vec<Session>> {
        Ok(self.catalog().get(instance_id)?.sessions)
    }

    /// Blocks handing the TTY to the multiplexer until the user detaches or the session
    /// exits; reconciles the catalog afterward.
    pub async fn attach_session(&self, instance_id: &str, name: &str) -> Result<i32> {
        let mut instance = self.catalog().get(instance_id)?;
        let session = instance
            .session_by_name(name)
            .cloned()
            .ok_or_else(|| HjkError::SessionNotFound(name.to_string()))?;

        if let Some(slot) = instance.session_by_name_mut(name) {
            slot.last_accessed = Utc::now();
        }
        self.catalog().update(instance.clone())?;

        let exit_code = self.mux().attach_session(&session.mux_session_id)?;

        if let Ok(live) = self.mux().list_sessions().await {
            if !live.contains(&session.mux_session_id) {
                if let Ok(mut fresh) = self.catalog().get(instance_id) {
                    fresh.sessions.retain(|s| s.name != name);
                    let _ = self.catalog().update(fresh);
                }
            }
        }

        Ok(exit_code)
    }

    pub async fn kill_session(&self, instance_id: &str, name: &str) -> Result<()> {
        let mut instance = self.catalog().get(instance_id)?;
        let session = instance
            .session_by_name(name)
            .cloned()
            .ok_or_else(|| HjkError::SessionNotFound(name.to_string()))?;

        if let Err(e) = self.mux().kill_session(&session.mux_session_id).await {
            warn!(session = %session.mux_session_id, error = %e, "best-effort kill failed");
        }
        self.logs().remove_session_log(instance_id, &session.id);

        instance.sessions.retain(|s| s.name != name);
        self.catalog().update(instance)?;
        Ok(())
    }

    pub fn mru_session(&self, instance_id: &str) -> Result<Session> {
        let instance = self.catalog().get(instance_id)?;
        instance
            .mru_session()
            .cloned()
            .ok_or_else(|| HjkError::NoSessionsAvailable(instance_id.to_string()))
    }

    /// Enumerates every instance's sessions and returns the single most-recently-used
    /// one across the whole catalog, with the owning instance id.
    pub fn global_mru_session(&self) -> Result<(String, Session)> {
        let instances = self.catalog().list(&crate::catalog::ListFilter::default())?;
        let mut best: Option<(&Instance, &Session)> = None;
        for instance in &instances {
            if let Some(session) = instance.mru_session() {
                best = match best {
                    Some((_, current)) if current.last_accessed >= session.last_accessed => best,
                    _ => Some((instance, session)),
                };
            }
        }
        best.map(|(i, s)| (i.id.clone(), s.clone()))
            .ok_or(HjkError::NoGlobalSessionsAvailable)
    }

    async fn run_agent_setup(
        &self,
        instance: &Instance,
        agent: SessionType,
        credential_type: Option<CredentialType>,
        env: &HashMap<String, String>,
    ) -> Result<()> {
        let Some(script) = agent_setup_script(agent, credential_type) else {
            return Ok(());
        };

        let cfg = ExecConfig {
            user: if instance.remote_user.is_empty() {
                None
            } else {
                Some(instance.remote_user.clone())
            },
            working_dir: None,
            env: env.clone(),
            interactive: false,
            command: vec!["/bin/sh".to_string(), "-c".to_string(), script],
        };

        let output = self.driver().exec(&instance.container_id, &cfg).await?;
        if !output.success() {
            warn!(
                instance = %instance.id,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "agent credential setup exited non-zero"
            );
        }
        Ok(())
    }
}

fn agent_binary(agent: SessionType) -> &'static str {
    match agent {
        SessionType::Shell => "/bin/bash",
        SessionType::Claude => "claude",
        SessionType::Gemini => "gemini",
        SessionType::Codex => "codex",
    }
}

/// Shell one-liners run as `remote_user` before the multiplexer session starts.
fn agent_setup_script(agent: SessionType, credential_type: Option<CredentialType>) -> Option<String> {
    match (agent, credential_type) {
        (SessionType::Claude, _) => Some(
            r#"mkdir -p ~/.claude && echo '{"hasCompletedOnboarding":true}' > ~/.claude.json"#
                .to_string(),
        ),
        (SessionType::Gemini, Some(CredentialType::Subscription)) => Some(
            r#"mkdir -p ~/.gemini && \
echo "$GEMINI_OAUTH_CREDS" > ~/.gemini/oauth_creds.json && \
echo "$GEMINI_OAUTH_CREDS" > ~/.gemini/google_accounts.json && \
echo '{"selectedAuthType":"oauth-personal"}' > ~/.gemini/settings.json"#
                .to_string(),
        ),
        (SessionType::Gemini, _) => None,
        (SessionType::Codex, Some(CredentialType::Subscription)) => Some(
            r#"mkdir -p ~/.codex && echo "$CODEX_AUTH_JSON" > ~/.codex/auth.json"#.to_string(),
        ),
        (SessionType::Codex, _) => None,
        (SessionType::Shell, _) => None,
    }
}

/// Credential env vars passed through both the setup `exec` and the multiplexer session
/// itself, so the agent process sees them too.
fn agent_credential_env(agent: SessionType) -> HashMap<String, String> {
    let mut env = HashMap::new();
    let names: &[&str] = match agent {
        SessionType::Gemini => &["GEMINI_OAUTH_CREDS", "GEMINI_API_KEY"],
        SessionType::Codex => &["CODEX_AUTH_JSON", "OPENAI_API_KEY"],
        SessionType::Claude => &["ANTHROPIC_API_KEY"],
        SessionType::Shell => &[],
    };
    for name in names {
        if let Ok(value) = std::env::var(name) {
            env.insert((*name).to_string(), value);
        }
    }
    env
}
