// ABOUTME: `hjk run <branch>` — create, restart, or return the existing instance

use std::path::Path;

use crate::catalog::InstanceStatus;
use crate::error::{HjkError, Result};
use crate::manager::{CreateOptions, Manager};

pub async fn run(
    manager: &Manager,
    repo_path: &Path,
    branch: String,
    image: Option<String>,
) -> Result<i32> {
    // The core `Create` fails `AlreadyExists` unconditionally (spec.md §4.1 step 2);
    // restarting a stopped instance instead of erroring is this CLI command's own
    // idempotence policy (spec.md §6), so it's handled here rather than in the manager.
    if let Ok(existing) = manager.get_by_branch(repo_path, &branch).await {
        if existing.status == InstanceStatus::Running {
            println!(
                "Instance {} already running for branch {} (container {})",
                existing.id, existing.branch, existing.container_id
            );
            return Ok(0);
        }

        if existing.status == InstanceStatus::Stopped {
            return match manager.start(&existing.id).await {
                Ok(()) => {
                    println!(
                        "Restarted instance {} for branch {} (container {})",
                        existing.id, existing.branch, existing.container_id
                    );
                    Ok(0)
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    Ok(1)
                }
            };
        }
    }

    let opts = CreateOptions {
        branch: branch.clone(),
        image,
        workspace_folder: None,
        runtime_flags: Vec::new(),
    };

    match manager.create(repo_path, opts).await {
        Ok(instance) => {
            println!(
                "Instance {} ready for branch {} (container {})",
                instance.id, instance.branch, instance.container_id
            );
            Ok(0)
        }
        Err(HjkError::InstanceAlreadyExists(branch)) => {
            // Lost a race with a concurrent `hjk run` between the check above and here;
            // the other invocation won, so report its instance rather than failing.
            match manager.get_by_branch(repo_path, &branch).await {
                Ok(instance) => {
                    println!(
                        "Instance {} already running for branch {} (container {})",
                        instance.id, instance.branch, instance.container_id
                    );
                    Ok(0)
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    Ok(1)
                }
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}
