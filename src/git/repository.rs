// ABOUTME: Git Driver — repo identity and worktree lifecycle, git2 for inspection, the
// git CLI for worktree add/remove (git2 itself has no worktree API)

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository as Git2Repository;
use tracing::{debug, info, warn};

use super::types::WorktreeError;

/// A handle on a repository's root, independent of which worktree happens to be checked out.
pub struct Repository {
    root: PathBuf,
    repo: Git2Repository,
}

impl Repository {
    pub fn open(path: &Path) -> Result<Self, WorktreeError> {
        let repo = Git2Repository::discover(path)
            .map_err(|_| WorktreeError::NotRepository(path.to_path_buf()))?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| repo.path().to_path_buf());
        Ok(Self { root, repo })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stable id for this repo: `<basename>-<short-hash>`, hashing the origin remote URL
    /// when one is configured and otherwise the canonical absolute path, so two worktrees
    /// of the same repo always resolve to the same `repo_id`.
    pub fn identifier(&self) -> String {
        let basename = self
            .root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("repo");

        let hash_input = self
            .repo
            .find_remote("origin")
            .ok()
            .and_then(|remote| remote.url().map(str::to_string))
            .unwrap_or_else(|| {
                self.root
                    .canonicalize()
                    .unwrap_or_else(|_| self.root.clone())
                    .display()
                    .to_string()
            });

        format!("{basename}-{}", short_hash(&hash_input))
    }

    /// Creates `branch` from `HEAD` if it doesn't already exist, then `git worktree add`s
    /// it at `path`. Idempotent with respect to an existing worktree at that path only in
    /// the sense of reporting `AlreadyExists`; callers that already know about the worktree
    /// should not call this again.
    pub fn create_worktree(&self, path: &Path, branch: &str) -> Result<(), WorktreeError> {
        if path.exists() {
            return Err(WorktreeError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.ensure_branch_exists(branch)?;

        let path_str = path
            .to_str()
            .ok_or_else(|| WorktreeError::CommandFailed(format!("non-utf8 path {path:?}")))?;

        debug!(branch, path = path_str, "creating worktree");
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(["worktree", "add", path_str, branch])
            .output()?;

        if !output.status.success() {
            return Err(WorktreeError::CommandFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        info!(branch, path = path_str, "created worktree");
        Ok(())
    }

    /// `git worktree remove --force`; a missing worktree is tolerated during teardown
    /// and reported as `WorktreeNotFound` so callers can ignore it.
    pub fn remove_worktree(&self, path: &Path) -> Result<(), WorktreeError> {
        if !path.exists() {
            return Err(WorktreeError::WorktreeNotFound(path.to_path_buf()));
        }

        let path_str = path
            .to_str()
            .ok_or_else(|| WorktreeError::CommandFailed(format!("non-utf8 path {path:?}")))?;

        let output = Command::new("git")
            .current_dir(&self.root)
            .args(["worktree", "remove", "--force", path_str])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(path = path_str, %stderr, "git worktree remove failed");
            return Err(WorktreeError::CommandFailed(stderr.into_owned()));
        }

        Ok(())
    }

    fn ensure_branch_exists(&self, branch: &str) -> Result<(), WorktreeError> {
        if self
            .repo
            .find_branch(branch, git2::BranchType::Local)
            .is_ok()
        {
            return Ok(());
        }

        let head_commit = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(branch, &head_commit, false)?;
        info!(branch, "created branch from HEAD");
        Ok(())
    }
}

/// Sanitizes a branch name for use as a path/container-name segment: `/` → `-`, strip
/// anything outside `[A-Za-z0-9_-]`, trim leading/trailing `-`.
pub fn sanitize_branch(branch: &str) -> String {
    let replaced = branch.replace('/', "-");
    let filtered: String = replaced
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    filtered.trim_matches('-').to_string()
}

fn short_hash(input: &str) -> String {
    let mut hasher = DefaultHasher::new();
    input.hash(&mut hasher);
    format!("{:08x}", hasher.finish() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_slashes_and_strips_invalid() {
        assert_eq!(sanitize_branch("feat/auth"), "feat-auth");
        assert_eq!(sanitize_branch("feat/auth!!"), "feat-auth");
        assert_eq!(sanitize_branch("--weird--"), "weird");
        assert_eq!(sanitize_branch("a//b"), "a-b");
    }

    #[test]
    fn short_hash_is_deterministic() {
        assert_eq!(short_hash("abc"), short_hash("abc"));
        assert_ne!(short_hash("abc"), short_hash("abd"));
    }
}
