// ABOUTME: `hjk attach [<branch>] [<session>]` — MRU-based resolution over 0/1/2 args

use std::path::Path;

use crate::error::Result;
use crate::manager::Manager;

pub async fn run(
    manager: &Manager,
    repo_path: &Path,
    branch: Option<String>,
    session: Option<String>,
) -> Result<i32> {
    let (instance_id, session_name) = match (branch, session) {
        (None, None) => match manager.global_mru_session() {
            Ok((instance_id, session)) => (instance_id, session.name),
            Err(e) => {
                eprintln!("error: {e}");
                return Ok(1);
            }
        },
        (Some(branch), None) => {
            let instance = match manager.get_by_branch(repo_path, &branch).await {
                Ok(instance) => instance,
                Err(e) => {
                    eprintln!("error: {e}");
                    return Ok(1);
                }
            };
            match manager.mru_session(&instance.id) {
                Ok(session) => (instance.id, session.name),
                Err(e) => {
                    eprintln!("error: {e}");
                    return Ok(1);
                }
            }
        }
        (Some(branch), Some(session)) => {
            let instance = match manager.get_by_branch(repo_path, &branch).await {
                Ok(instance) => instance,
                Err(e) => {
                    eprintln!("error: {e}");
                    return Ok(1);
                }
            };
            (instance.id, session)
        }
        (None, Some(_)) => {
            eprintln!("error: a session name requires a branch argument");
            return Ok(1);
        }
    };

    match manager.attach_session(&instance_id, &session_name).await {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}
