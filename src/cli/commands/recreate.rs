// ABOUTME: `hjk recreate <branch>` — replace an instance's container, preserving its worktree

use std::path::Path;

use crate::error::Result;
use crate::manager::Manager;

pub async fn run(
    manager: &Manager,
    repo_path: &Path,
    branch: String,
    base: Option<String>,
) -> Result<i32> {
    let instance = match manager.get_by_branch(repo_path, &branch).await {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    let image = base.unwrap_or_else(|| manager.config().default_image.clone());

    match manager.recreate(&instance.id, &image).await {
        Ok(()) => {
            println!("Recreated instance for branch {branch} with image {image}");
            Ok(0)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}
