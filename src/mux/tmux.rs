// ABOUTME: Multiplexer Driver implementation over tmux — create/attach/list/kill via subprocess

use std::process::{Command, Stdio};

use tokio::process::Command as TokioCommand;
use tracing::debug;

use super::types::{CreateSessionConfig, MuxError};

/// Names tmux sessions `hjk-<instance_id>-<session_id>` and validates tmux's grammar
/// (reject `.`, `:`, whitespace) before ever shelling out.
pub fn format_session_name(instance_id: &str, session_id: &str) -> Result<String, MuxError> {
    let name = format!("hjk-{instance_id}-{session_id}");
    validate_session_name(&name)?;
    Ok(name)
}

fn validate_session_name(name: &str) -> Result<(), MuxError> {
    if name.contains('.') {
        return Err(MuxError::InvalidName(name.to_string(), "contains '.'"));
    }
    if name.contains(':') {
        return Err(MuxError::InvalidName(name.to_string(), "contains ':'"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(MuxError::InvalidName(name.to_string(), "contains whitespace"));
    }
    Ok(())
}

pub struct TmuxDriver;

impl TmuxDriver {
    pub fn new() -> Self {
        Self
    }

    pub fn check_installed(&self) -> Result<(), MuxError> {
        let found = Command::new("which")
            .arg("tmux")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if found {
            Ok(())
        } else {
            Err(MuxError::NotInstalled {
                binary: "tmux".to_string(),
            })
        }
    }

    pub async fn create_session(&self, cfg: &CreateSessionConfig) -> Result<(), MuxError> {
        validate_session_name(&cfg.name)?;

        if self.has_session(&cfg.name).await? {
            return Err(MuxError::SessionExists(cfg.name.clone()));
        }

        if let Some(parent) = cfg.log_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Tee the session's output to the log file without needing tmux's `pipe-pane`
        // (which only tees *after* the session starts): wrap the command in a shell
        // that tees its own combined stdout/stderr.
        let log_path = cfg.log_path.display().to_string();
        let inner = shell_join(&cfg.command);
        let wrapped = format!("{inner} 2>&1 | tee -a {}", shell_quote(&log_path));

        let mut command = TokioCommand::new("tmux");
        command.args([
            "new-session",
            "-d",
            "-s",
            &cfg.name,
            "-c",
            &cfg.cwd.display().to_string(),
        ]);
        for (key, value) in &cfg.env {
            command.env(key, value);
        }
        command.arg(wrapped);

        debug!(session = %cfg.name, "creating tmux session");
        let output = command.output().await?;
        if !output.status.success() {
            return Err(MuxError::CommandFailed {
                binary: "tmux".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    /// Blocks until the user detaches or the session exits.
    pub fn attach_session(&self, name: &str) -> Result<i32, MuxError> {
        let mut command = Command::new("tmux");
        command.args(["attach-session", "-t", name]);
        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());
        let status = command.status()?;
        Ok(status.code().unwrap_or(-1))
    }

    pub async fn list_sessions(&self) -> Result<Vec<String>, MuxError> {
        let output = TokioCommand::new("tmux")
            .args(["list-sessions", "-F", "#{session_name}"])
            .output()
            .await?;

        if !output.status.success() {
            // tmux exits non-zero with "no server running" when there are no sessions.
            return Ok(Vec::new());
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .filter(|l| !l.is_empty())
            .collect())
    }

    pub async fn kill_session(&self, name: &str) -> Result<(), MuxError> {
        if !self.has_session(name).await? {
            return Err(MuxError::SessionNotFound(name.to_string()));
        }

        let output = TokioCommand::new("tmux")
            .args(["kill-session", "-t", name])
            .output()
            .await?;
        if !output.status.success() {
            return Err(MuxError::CommandFailed {
                binary: "tmux".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    async fn has_session(&self, name: &str) -> Result<bool, MuxError> {
        let output = TokioCommand::new("tmux")
            .args(["has-session", "-t", name])
            .output()
            .await?;
        Ok(output.status.success())
    }
}

impl Default for TmuxDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn shell_join(argv: &[String]) -> String {
    argv.iter().map(|a| shell_quote(a)).collect::<Vec<_>>().join(" ")
}

fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_rejects_invalid_characters() {
        assert!(format_session_name("a.b", "c").is_err());
        assert!(format_session_name("a:b", "c").is_err());
        assert!(format_session_name("a b", "c").is_err());
        assert_eq!(format_session_name("abcd1234", "ef01").unwrap(), "hjk-abcd1234-ef01");
    }

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
