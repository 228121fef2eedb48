// ABOUTME: `hjk stop <branch>` — stop an instance's container (kills all sessions first)

use std::path::Path;

use crate::error::Result;
use crate::manager::Manager;

pub async fn run(manager: &Manager, repo_path: &Path, branch: String) -> Result<i32> {
    let instance = match manager.get_by_branch(repo_path, &branch).await {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    match manager.stop(&instance.id).await {
        Ok(()) => {
            println!("Stopped instance for branch {branch}");
            Ok(0)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}
