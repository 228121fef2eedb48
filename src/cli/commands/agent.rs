// ABOUTME: `hjk agent <branch> [<type>]` — create an agent session, attach unless --detached

use std::collections::HashMap;
use std::path::Path;

use crate::cli::AgentTypeArg;
use crate::error::Result;
use crate::manager::{CreateSessionOptions, Manager};

pub async fn run(
    manager: &Manager,
    repo_path: &Path,
    branch: String,
    agent_type: Option<AgentTypeArg>,
    name: Option<String>,
    detached: bool,
    prompt: Option<String>,
    pass_through: Vec<String>,
) -> Result<i32> {
    let instance = match manager.get_by_branch(repo_path, &branch).await {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("hint: run 'hjk run {branch}' to create one");
            return Ok(1);
        }
    };

    let session_type = agent_type.map(Into::into).unwrap_or(crate::catalog::SessionType::Claude);

    let mut command = pass_through;
    if let Some(prompt) = prompt {
        command.push(prompt);
    }

    let opts = CreateSessionOptions {
        session_type: Some(session_type),
        name,
        command: if command.is_empty() { None } else { Some(command) },
        env: HashMap::new(),
        credential_type: None,
        requires_agent_setup: true,
    };

    let session = match manager.create_session(&instance.id, opts).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    println!("Created session {} ({session_type})", session.name);

    if detached {
        return Ok(0);
    }

    match manager.attach_session(&instance.id, &session.name).await {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}
