// ABOUTME: CLI front-end — clap derive command table, dispatching to the Instance Manager
// Keeps the parsed `Cli` struct thin and separate from the business-logic crate

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::manager::Manager;

#[derive(Parser, Debug)]
#[command(
    name = "hjk",
    version,
    about = "Container-backed, per-branch development environments for interactive coding agents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Repository root; defaults to discovering one from the current directory.
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create (or restart) an instance for a branch.
    Run {
        branch: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Start an agent session inside an instance.
    Agent {
        branch: String,
        #[arg(value_enum)]
        agent_type: Option<AgentTypeArg>,
        #[arg(short = 'n', long)]
        name: Option<String>,
        #[arg(short = 'd', long)]
        detached: bool,
        #[arg(short = 'p', long)]
        prompt: Option<String>,
        #[arg(last = true)]
        pass_through: Vec<String>,
    },
    /// Open a shell (or run a command) inside an instance.
    Exec {
        branch: String,
        cmd: Vec<String>,
        #[arg(long)]
        no_mux: bool,
        #[arg(short = 'n', long)]
        name: Option<String>,
        #[arg(short = 'd', long)]
        detached: bool,
    },
    /// MRU-based attach: 0 args -> global MRU, 1 arg -> instance MRU, 2 -> explicit session.
    Attach {
        branch: Option<String>,
        session: Option<String>,
    },
    /// List instances, or sessions of one instance.
    Ps {
        branch: Option<String>,
        #[arg(short = 'a', long)]
        all: bool,
    },
    /// Read a session's log.
    Logs {
        branch: String,
        session: String,
        #[arg(short = 'f', long)]
        follow: bool,
        #[arg(short = 'n', long, default_value_t = 100)]
        lines: usize,
        #[arg(long)]
        full: bool,
    },
    /// Kill a session, addressed as `<branch>/<session>`.
    Kill { target: String },
    /// Stop an instance's container (kills all sessions first).
    Stop { branch: String },
    /// Fully remove an instance.
    Rm {
        branch: String,
        #[arg(short = 'f', long)]
        force: bool,
    },
    /// Replace an instance's container, preserving its worktree.
    Recreate {
        branch: String,
        #[arg(long)]
        base: Option<String>,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum AgentTypeArg {
    Claude,
    Gemini,
    Codex,
}

impl From<AgentTypeArg> for crate::catalog::SessionType {
    fn from(value: AgentTypeArg) -> Self {
        match value {
            AgentTypeArg::Claude => crate::catalog::SessionType::Claude,
            AgentTypeArg::Gemini => crate::catalog::SessionType::Gemini,
            AgentTypeArg::Codex => crate::catalog::SessionType::Codex,
        }
    }
}

pub async fn dispatch(cli: Cli) -> Result<i32> {
    let config = Config::from_env_or_defaults();
    let manager = Manager::new(config);
    let repo_path = resolve_repo_path(cli.repo)?;

    match cli.command {
        Command::Run { branch, image } => commands::run::run(&manager, &repo_path, branch, image).await,
        Command::Agent {
            branch,
            agent_type,
            name,
            detached,
            prompt,
            pass_through,
        } => {
            commands::agent::run(
                &manager,
                &repo_path,
                branch,
                agent_type,
                name,
                detached,
                prompt,
                pass_through,
            )
            .await
        }
        Command::Exec {
            branch,
            cmd,
            no_mux,
            name,
            detached,
        } => commands::exec::run(&manager, &repo_path, branch, cmd, no_mux, name, detached).await,
        Command::Attach { branch, session } => {
            commands::attach::run(&manager, &repo_path, branch, session).await
        }
        Command::Ps { branch, all } => commands::ps::run(&manager, &repo_path, branch, all).await,
        Command::Logs {
            branch,
            session,
            follow,
            lines,
            full,
        } => commands::logs::run(&manager, &repo_path, branch, session, follow, lines, full).await,
        Command::Kill { target } => commands::kill::run(&manager, &repo_path, target).await,
        Command::Stop { branch } => commands::stop::run(&manager, &repo_path, branch).await,
        Command::Rm { branch, force } => commands::rm::run(&manager, &repo_path, branch, force).await,
        Command::Recreate { branch, base } => {
            commands::recreate::run(&manager, &repo_path, branch, base).await
        }
    }
}

fn resolve_repo_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(std::env::current_dir()?),
    }
}
