// ABOUTME: Shutdown sequence shared by Stop/Remove/Recreate
// Sessions must be fully torn down before stop, or the container's stop can fail with
// "Resource busy" while processes still hold the multiplexer's pipes open.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::warn;

use crate::catalog::Instance;
use crate::container::ContainerDriver;
use crate::error::Result;

use super::Manager;

const SESSION_POLL_INTERVAL: Duration = Duration::from_millis(100);
const SESSION_POLL_DEADLINE: Duration = Duration::from_secs(5);
const STOP_RETRY_INTERVAL: Duration = Duration::from_millis(200);
const STOP_RETRY_DEADLINE: Duration = Duration::from_secs(10);

impl Manager {
    pub(crate) async fn shutdown(&self, instance: &mut Instance, remove_container: bool) -> Result<()> {
        let session_names: Vec<String> = instance
            .sessions
            .iter()
            .map(|s| s.mux_session_id.clone())
            .collect();

        for name in &session_names {
            if let Err(e) = self.mux().kill_session(name).await {
                warn!(session = %name, error = %e, "best-effort session kill failed");
            }
        }
        for session in &instance.sessions {
            self.logs().remove_session_log(&instance.id, &session.id);
        }

        self.wait_for_sessions_terminated(&session_names).await;
        instance.sessions.clear();

        if !instance.container_id.is_empty() {
            self.stop_container_with_retry(&instance.container_id).await?;
            if remove_container {
                if let Err(e) = self.driver().remove(&instance.container_id).await {
                    warn!(instance = %instance.id, error = %e, "failed to remove container");
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    async fn wait_for_sessions_terminated(&self, session_names: &[String]) {
        if session_names.is_empty() {
            return;
        }
        let deadline = Instant::now() + SESSION_POLL_DEADLINE;
        loop {
            let live = self.mux().list_sessions().await.unwrap_or_default();
            if !session_names.iter().any(|n| live.contains(n)) {
                return;
            }
            if Instant::now() >= deadline {
                warn!("sessions still present after poll deadline, proceeding anyway");
                return;
            }
            sleep(SESSION_POLL_INTERVAL).await;
        }
    }

    /// Retries `Stop` while the error looks like "resource busy".
    async fn stop_container_with_retry(&self, container_id: &str) -> Result<()> {
        let deadline = Instant::now() + STOP_RETRY_DEADLINE;
        loop {
            match self.driver().stop(container_id).await {
                Ok(()) => return Ok(()),
                Err(e) if is_busy(&e) && Instant::now() < deadline => {
                    sleep(STOP_RETRY_INTERVAL).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Best-effort stop+remove used when rolling back a failed Create; errors are logged,
    /// not propagated, since the caller is already on a failure path.
    pub(crate) async fn stop_and_remove_with_retry(&self, container_id: &str) {
        if container_id.is_empty() {
            return;
        }
        if let Err(e) = self.stop_container_with_retry(container_id).await {
            warn!(container_id, error = %e, "rollback stop failed");
        }
        if let Err(e) = self.driver().remove(container_id).await {
            warn!(container_id, error = %e, "rollback remove failed");
        }
    }
}

fn is_busy(err: &crate::container::ContainerError) -> bool {
    matches!(err, crate::container::ContainerError::CommandFailed { stderr, .. } if stderr.to_lowercase().contains("busy"))
}
