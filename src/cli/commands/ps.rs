// ABOUTME: `hjk ps [<branch>]` — list instances, or sessions of one instance

use std::path::Path;

use crate::catalog::ListFilter;
use crate::error::Result;
use crate::git::Repository;
use crate::manager::Manager;

pub async fn run(manager: &Manager, repo_path: &Path, branch: Option<String>, all: bool) -> Result<i32> {
    match branch {
        Some(branch) => {
            let instance = match manager.get_by_branch(repo_path, &branch).await {
                Ok(instance) => instance,
                Err(e) => {
                    eprintln!("error: {e}");
                    return Ok(1);
                }
            };
            println!("{:<10} {:<10} {:<20} {}", "NAME", "TYPE", "MUX SESSION", "LAST ACCESSED");
            for session in manager.list_sessions(&instance.id)? {
                println!(
                    "{:<10} {:<10} {:<20} {}",
                    session.name, session.session_type, session.mux_session_id, session.last_accessed
                );
            }
        }
        None => {
            let filter = if all {
                ListFilter::default()
            } else {
                match Repository::open(repo_path) {
                    Ok(repo) => ListFilter {
                        repo_id: Some(repo.identifier()),
                        status: None,
                    },
                    Err(_) => ListFilter::default(),
                }
            };

            let instances = manager.list(&filter).await?;
            println!("{:<10} {:<20} {:<10} {}", "ID", "BRANCH", "STATUS", "SESSIONS");
            for instance in instances {
                println!(
                    "{:<10} {:<20} {:<10} {}",
                    instance.id,
                    instance.branch,
                    instance.status,
                    instance.sessions.len()
                );
            }
        }
    }

    Ok(0)
}
