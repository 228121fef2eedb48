// ABOUTME: Integration tests for the Git Driver against a real `git` CLI and repo

use std::process::Command;

use headjack::git::{sanitize_branch, Repository};
use tempfile::TempDir;

fn init_repo(dir: &std::path::Path) {
    let run = |args: &[&str]| {
        let status = Command::new("git")
            .current_dir(dir)
            .args(args)
            .status()
            .expect("git invocation failed");
        assert!(status.success(), "git {args:?} failed");
    };

    run(&["init", "-q"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "Test"]);
    std::fs::write(dir.join("README.md"), "hello\n").unwrap();
    run(&["add", "."]);
    run(&["commit", "-q", "-m", "initial"]);
}

#[test]
fn open_fails_outside_a_repository() {
    let dir = TempDir::new().unwrap();
    assert!(Repository::open(dir.path()).is_err());
}

#[test]
fn identifier_is_stable_across_opens() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());

    let first = Repository::open(dir.path()).unwrap().identifier();
    let second = Repository::open(dir.path()).unwrap().identifier();
    assert_eq!(first, second);
    assert!(first.contains('-'));
}

#[test]
fn create_worktree_creates_branch_from_head_and_checks_it_out() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let repo = Repository::open(dir.path()).unwrap();

    let worktree_dir = TempDir::new().unwrap();
    let worktree_path = worktree_dir.path().join("feat-auth");

    repo.create_worktree(&worktree_path, "feat/auth").unwrap();

    assert!(worktree_path.join("README.md").exists());
    let branch_file = worktree_path.join(".git");
    assert!(branch_file.exists());

    repo.remove_worktree(&worktree_path).unwrap();
    assert!(!worktree_path.exists());
}

#[test]
fn remove_worktree_on_already_removed_path_is_worktree_not_found() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let repo = Repository::open(dir.path()).unwrap();

    let missing = dir.path().join("never-created");
    let err = repo.remove_worktree(&missing).unwrap_err();
    assert!(matches!(err, headjack::git::WorktreeError::WorktreeNotFound(_)));
}

#[test]
fn sanitize_branch_matches_worktree_path_segment() {
    assert_eq!(sanitize_branch("feat/auth"), "feat-auth");
    assert_eq!(sanitize_branch("release/2.0!!"), "release-20");
}
