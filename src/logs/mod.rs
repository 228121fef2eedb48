// ABOUTME: Log Path Manager & Reader — per-session append-only files, tail-N, follow-with-history

use std::io::{Seek, SeekFrom};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct LogPaths {
    logs_dir: PathBuf,
}

impl LogPaths {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
        }
    }

    fn session_log_path(&self, instance_id: &str, session_id: &str) -> PathBuf {
        self.logs_dir
            .join(instance_id)
            .join(format!("{session_id}.log"))
    }

    /// Creates `<logs_dir>/<instance_id>` (0750) and an empty `<session_id>.log` (0600)
    /// if absent, returning the absolute path.
    pub fn ensure_session_log(
        &self,
        instance_id: &str,
        session_id: &str,
    ) -> Result<PathBuf, LogError> {
        let dir = self.logs_dir.join(instance_id);
        std::fs::create_dir_all(&dir)?;
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o750))?;

        let path = self.session_log_path(instance_id, session_id);
        if !path.exists() {
            let file = std::fs::File::create(&path)?;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(path)
    }

    /// Best-effort: a missing log file is not an error.
    pub fn remove_session_log(&self, instance_id: &str, session_id: &str) {
        let path = self.session_log_path(instance_id, session_id);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "failed to remove session log");
            }
        }
    }

    pub fn remove_instance_logs(&self, instance_id: &str) {
        let dir = self.logs_dir.join(instance_id);
        if let Err(e) = std::fs::remove_dir_all(&dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %dir.display(), error = %e, "failed to remove instance log dir");
            }
        }
    }

    pub fn read_all(&self, instance_id: &str, session_id: &str) -> Result<Vec<String>, LogError> {
        let path = self.session_log_path(instance_id, session_id);
        let contents = std::fs::read_to_string(&path)?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    /// Reads the last `n` lines efficiently: seeks from the end in fixed-size chunks
    /// rather than loading the whole file, since session logs can grow unbounded.
    pub fn read_last_n(
        &self,
        instance_id: &str,
        session_id: &str,
        n: usize,
    ) -> Result<Vec<String>, LogError> {
        let path = self.session_log_path(instance_id, session_id);
        let mut file = std::fs::File::open(&path)?;
        let file_len = file.metadata()?.len();

        const CHUNK: u64 = 8192;
        let mut pos = file_len;
        let mut buf: Vec<u8> = Vec::new();
        let mut newline_count = 0usize;

        while pos > 0 && newline_count <= n {
            let read_size = CHUNK.min(pos);
            pos -= read_size;
            file.seek(SeekFrom::Start(pos))?;
            let mut chunk = vec![0u8; read_size as usize];
            std::io::Read::read_exact(&mut file, &mut chunk)?;
            newline_count += chunk.iter().filter(|&&b| b == b'\n').count();
            chunk.extend_from_slice(&buf);
            buf = chunk;
        }

        let text = String::from_utf8_lossy(&buf);
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].to_vec())
    }

    /// Writes the last `n` lines to `out`, then polls the file every `poll_interval`,
    /// writing newly appended bytes until the caller drops its future / the token
    /// cancels. Rotation and truncation are not handled.
    pub async fn follow_with_history<W: AsyncWriteExt + Unpin>(
        &self,
        instance_id: &str,
        session_id: &str,
        out: &mut W,
        n: usize,
        poll_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), LogError> {
        for line in self.read_last_n(instance_id, session_id, n)? {
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
        }

        let path = self.session_log_path(instance_id, session_id);
        let mut offset = std::fs::metadata(&path)?.len();
        let mut interval = tokio::time::interval(poll_interval);

        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }
            interval.tick().await;

            let metadata = std::fs::metadata(&path)?;
            if metadata.len() <= offset {
                continue;
            }

            let mut file = std::fs::File::open(&path)?;
            file.seek(SeekFrom::Start(offset))?;
            let mut new_bytes = Vec::new();
            std::io::Read::read_to_end(&mut file, &mut new_bytes)?;
            offset += new_bytes.len() as u64;
            out.write_all(&new_bytes).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn ensure_session_log_creates_dir_and_file() {
        let dir = TempDir::new().unwrap();
        let paths = LogPaths::new(dir.path());
        let log_path = paths.ensure_session_log("inst1", "sess1").unwrap();
        assert!(log_path.exists());
        assert!(log_path.starts_with(dir.path().join("inst1")));
    }

    #[test]
    fn read_last_n_returns_tail() {
        let dir = TempDir::new().unwrap();
        let paths = LogPaths::new(dir.path());
        let log_path = paths.ensure_session_log("inst1", "sess1").unwrap();

        let mut file = std::fs::OpenOptions::new().append(true).open(&log_path).unwrap();
        for i in 0..10 {
            writeln!(file, "line {i}").unwrap();
        }

        let tail = paths.read_last_n("inst1", "sess1", 3).unwrap();
        assert_eq!(tail, vec!["line 7", "line 8", "line 9"]);
    }

    #[test]
    fn remove_session_log_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let paths = LogPaths::new(dir.path());
        paths.remove_session_log("nonexistent", "nonexistent");
    }
}
