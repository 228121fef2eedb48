// ABOUTME: `hjk rm <branch>` — full teardown; requires confirmation unless --force

use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::manager::Manager;

pub async fn run(manager: &Manager, repo_path: &Path, branch: String, force: bool) -> Result<i32> {
    let instance = match manager.get_by_branch(repo_path, &branch).await {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    if !force && !confirm(&format!(
        "Remove instance for branch {branch} (container {}, worktree {})? [y/N] ",
        instance.container_id, instance.worktree
    )) {
        println!("Aborted.");
        return Ok(1);
    }

    match manager.remove(&instance.id).await {
        Ok(()) => {
            println!("Removed instance for branch {branch}");
            Ok(0)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
