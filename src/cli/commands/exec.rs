// ABOUTME: `hjk exec <branch> [<cmd>...]` — shell/command inside an instance, via mux or direct

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::manager::{AttachOptions, CreateSessionOptions, Manager};

pub async fn run(
    manager: &Manager,
    repo_path: &Path,
    branch: String,
    cmd: Vec<String>,
    no_mux: bool,
    name: Option<String>,
    detached: bool,
) -> Result<i32> {
    let instance = match manager.get_by_branch(repo_path, &branch).await {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    if no_mux {
        let opts = AttachOptions {
            command: cmd,
            interactive: true,
            workdir: None,
            env: Vec::new(),
        };
        return match manager.attach(&instance.id, opts).await {
            Ok(code) => Ok(code),
            Err(e) => {
                eprintln!("error: {e}");
                Ok(1)
            }
        };
    }

    let opts = CreateSessionOptions {
        session_type: Some(crate::catalog::SessionType::Shell),
        name,
        command: if cmd.is_empty() { None } else { Some(cmd) },
        env: HashMap::new(),
        credential_type: None,
        requires_agent_setup: false,
    };

    let session = match manager.create_session(&instance.id, opts).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    if detached {
        println!("Created session {}", session.name);
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
