// ABOUTME: `hjk logs <branch> <session>` — read or follow a session's log file

use std::path::Path;

use crate::error::Result;
use crate::manager::Manager;

pub async fn run(
    manager: &Manager,
    repo_path: &Path,
    branch: String,
    session: String,
    follow: bool,
    lines: usize,
    full: bool,
) -> Result<i32> {
    let instance = match manager.get_by_branch(repo_path, &branch).await {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    let session = match manager.get_session(&instance.id, &session) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    if follow {
        let mut stdout = tokio::io::stdout();
        let cancel = tokio_util::sync::CancellationToken::new();
        let _ = manager
            .logs()
            .follow_with_history(
                &instance.id,
                &session.id,
                &mut stdout,
                lines,
                std::time::Duration::from_millis(500),
                &cancel,
            )
            .await;
        return Ok(0);
    }

    let output = if full {
        manager.logs().read_all(&instance.id, &session.id)?
    } else {
        manager.logs().read_last_n(&instance.id, &session.id, lines)?
    };

    for line in output {
        println!("{line}");
    }

    Ok(0)
}
