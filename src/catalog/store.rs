// ABOUTME: Catalog Store — advisory-locked, atomically-written JSON file of instances & sessions
// Every operation takes the file lock, reads the whole file, mutates, writes <path>.tmp, fsyncs, renames

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use tracing::debug;

use super::model::{CatalogFile, Instance, InstanceStatus};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog entry not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog file: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Filter applied by `List`.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub repo_id: Option<String>,
    pub status: Option<InstanceStatus>,
}

pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Acquire an exclusive advisory lock on the catalog file for the duration of `f`,
    /// serializing concurrent `hjk` invocations into a total order.
    fn with_locked_file<T>(
        &self,
        f: impl FnOnce(&mut CatalogFile) -> Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;
        lock_file.lock_exclusive()?;

        let result = (|| {
            let mut catalog = self.read_unlocked()?;
            let value = f(&mut catalog)?;
            self.write_unlocked(&catalog)?;
            Ok(value)
        })();

        // Best-effort: an explicit unlock isn't required (the fd closing releases it),
        // but doing it makes the critical section's end explicit.
        let _ = lock_file.unlock();
        result
    }

    fn read_unlocked(&self) -> Result<CatalogFile, CatalogError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(CatalogFile::default()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CatalogFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic write: serialize to `<path>.tmp`, fsync, rename over the original so a
    /// crash mid-write never leaves a truncated catalog.
    fn write_unlocked(&self, catalog: &CatalogFile) -> Result<(), CatalogError> {
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(catalog)?;

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), "wrote catalog");
        Ok(())
    }

    pub fn add(&self, instance: Instance) -> Result<(), CatalogError> {
        self.with_locked_file(|catalog| {
            catalog.instances.push(instance);
            Ok(())
        })
    }

    pub fn get(&self, id: &str) -> Result<Instance, CatalogError> {
        self.with_locked_file(|catalog| {
            catalog
                .instances
                .iter()
                .find(|i| i.id == id)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(id.to_string()))
        })
    }

    pub fn get_by_repo_branch(&self, repo_id: &str, branch: &str) -> Result<Instance, CatalogError> {
        self.with_locked_file(|catalog| {
            catalog
                .instances
                .iter()
                .find(|i| i.repo_id == repo_id && i.branch == branch)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(format!("{repo_id}/{branch}")))
        })
    }

    pub fn update(&self, instance: Instance) -> Result<(), CatalogError> {
        self.with_locked_file(|catalog| {
            let slot = catalog
                .instances
                .iter_mut()
                .find(|i| i.id == instance.id)
                .ok_or_else(|| CatalogError::NotFound(instance.id.clone()))?;
            *slot = instance;
            Ok(())
        })
    }

    pub fn remove(&self, id: &str) -> Result<(), CatalogError> {
        self.with_locked_file(|catalog| {
            let before = catalog.instances.len();
            catalog.instances.retain(|i| i.id != id);
            if catalog.instances.len() == before {
                return Err(CatalogError::NotFound(id.to_string()));
            }
            Ok(())
        })
    }

    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Instance>, CatalogError> {
        self.with_locked_file(|catalog| {
            Ok(catalog
                .instances
                .iter()
                .filter(|i| {
                    filter.repo_id.as_deref().map_or(true, |r| i.repo_id == r)
                        && filter.status.map_or(true, |s| i.status == s)
                })
                .cloned()
                .collect())
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Session;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_instance(id: &str, repo_id: &str, branch: &str) -> Instance {
        Instance {
            id: id.to_string(),
            repo: "/tmp/repo".to_string(),
            repo_id: repo_id.to_string(),
            branch: branch.to_string(),
            worktree: format!("/tmp/worktrees/{branch}"),
            container_id: String::new(),
            remote_user: String::new(),
            remote_workdir: String::new(),
            created_at: Utc::now(),
            status: InstanceStatus::Creating,
            sessions: Vec::new(),
        }
    }

    #[test]
    fn add_get_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        store.add(sample_instance("abc123", "repo-1", "main")).unwrap();
        let fetched = store.get("abc123").unwrap();
        assert_eq!(fetched.branch, "main");
        assert_eq!(fetched.repo_id, "repo-1");
    }

    #[test]
    fn get_by_repo_branch() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        store.add(sample_instance("a1", "repo-1", "feat/x")).unwrap();
        let fetched = store.get_by_repo_branch("repo-1", "feat/x").unwrap();
        assert_eq!(fetched.id, "a1");

        assert!(store.get_by_repo_branch("repo-1", "missing").is_err());
    }

    #[test]
    fn update_replaces_entry() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        let mut instance = sample_instance("a1", "repo-1", "main");
        store.add(instance.clone()).unwrap();

        instance.status = InstanceStatus::Running;
        instance.container_id = "c1".to_string();
        store.update(instance).unwrap();

        let fetched = store.get("a1").unwrap();
        assert_eq!(fetched.status, InstanceStatus::Running);
        assert_eq!(fetched.container_id, "c1");
    }

    #[test]
    fn remove_deletes_entry() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        store.add(sample_instance("a1", "repo-1", "main")).unwrap();
        store.remove("a1").unwrap();
        assert!(store.get("a1").is_err());
        assert!(store.remove("a1").is_err());
    }

    #[test]
    fn list_filters_by_repo_and_status() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        let mut running = sample_instance("a1", "repo-1", "main");
        running.status = InstanceStatus::Running;
        store.add(running).unwrap();
        store.add(sample_instance("a2", "repo-1", "dev")).unwrap();
        store.add(sample_instance("a3", "repo-2", "main")).unwrap();

        let all_repo1 = store
            .list(&ListFilter {
                repo_id: Some("repo-1".to_string()),
                status: None,
            })
            .unwrap();
        assert_eq!(all_repo1.len(), 2);

        let running_only = store
            .list(&ListFilter {
                repo_id: None,
                status: Some(InstanceStatus::Running),
            })
            .unwrap();
        assert_eq!(running_only.len(), 1);
        assert_eq!(running_only[0].id, "a1");
    }

    #[test]
    fn atomic_write_never_leaves_tmp_behind() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));
        store.add(sample_instance("a1", "repo-1", "main")).unwrap();

        assert!(!dir.path().join("catalog.json.tmp").exists());
        assert!(dir.path().join("catalog.json").exists());
    }

    #[test]
    fn session_round_trip_preserves_fields() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        let mut instance = sample_instance("a1", "repo-1", "main");
        instance.sessions.push(Session {
            id: "s1".to_string(),
            name: "eager-otter".to_string(),
            session_type: crate::catalog::model::SessionType::Claude,
            mux_session_id: "hjk-a1-s1".to_string(),
            created_at: Utc::now(),
            last_accessed: Utc::now(),
        });
        store.add(instance).unwrap();

        let fetched = store.get("a1").unwrap();
        assert_eq!(fetched.sessions.len(), 1);
        assert_eq!(fetched.sessions[0].mux_session_id, "hjk-a1-s1");
    }
}
