// ABOUTME: `hjk kill <branch>/<session>` — kill one session; branch may itself contain `/`

use std::path::Path;

use crate::error::Result;
use crate::manager::Manager;

pub async fn run(manager: &Manager, repo_path: &Path, target: String) -> Result<i32> {
    let Some(split_at) = target.rfind('/') else {
        eprintln!("error: expected <branch>/<session>, got {target:?}");
        return Ok(1);
    };
    let (branch, session) = (&target[..split_at], &target[split_at + 1..]);

    let instance = match manager.get_by_branch(repo_path, branch).await {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    match manager.kill_session(&instance.id, session).await {
        Ok(()) => {
            println!("Killed session {session} on {branch}");
            Ok(0)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}
