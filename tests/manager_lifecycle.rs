// ABOUTME: End-to-end Instance Manager tests against real git/docker/tmux
// Heavyweight: requires a working `docker` daemon and `tmux` on PATH. Run explicitly with
// `cargo test --test manager_lifecycle -- --ignored`.

use std::path::Path;
use std::process::Command;

use headjack::catalog::{InstanceStatus, SessionType};
use headjack::config::Config;
use headjack::manager::{CreateOptions, CreateSessionOptions, Manager};
use tempfile::TempDir;

fn init_repo(dir: &Path) {
    let run = |args: &[&str]| {
        let status = Command::new("git").current_dir(dir).args(args).status().unwrap();
        assert!(status.success());
    };
    run(&["init", "-q"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "Test"]);
    std::fs::write(dir.join("README.md"), "hello\n").unwrap();
    run(&["add", "."]);
    run(&["commit", "-q", "-m", "initial"]);
}

fn test_config(data_dir: &Path) -> Config {
    let mut config = Config::from_env_or_defaults();
    config.data_dir = data_dir.to_path_buf();
    config.catalog_path = data_dir.join("catalog.json");
    config.worktrees_dir = data_dir.join("git");
    config.logs_dir = data_dir.join("logs");
    config.default_image = "alpine:3.19".to_string();
    config
}

/// Create-then-list shows the instance running with an empty session list.
#[tokio::test]
#[ignore]
async fn create_then_list_shows_running_instance() {
    let repo_dir = TempDir::new().unwrap();
    init_repo(repo_dir.path());
    let data_dir = TempDir::new().unwrap();
    let manager = Manager::new(test_config(data_dir.path()));

    let instance = manager
        .create(
            repo_dir.path(),
            CreateOptions {
                branch: "feat/auth".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(instance.branch, "feat/auth");
    assert_eq!(instance.status, InstanceStatus::Running);
    assert!(instance.worktree.ends_with("feat-auth"));

    let listed = manager.list(&Default::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].sessions.len(), 0);

    manager.remove(&instance.id).await.unwrap();
}

/// Session MRU ordering follows attach order.
#[tokio::test]
#[ignore]
async fn session_mru_follows_attach_order() {
    let repo_dir = TempDir::new().unwrap();
    init_repo(repo_dir.path());
    let data_dir = TempDir::new().unwrap();
    let manager = Manager::new(test_config(data_dir.path()));

    let instance = manager
        .create(
            repo_dir.path(),
            CreateOptions {
                branch: "feat/mru".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    for name in ["a", "b", "c"] {
        manager
            .create_session(
                &instance.id,
                CreateSessionOptions {
                    session_type: Some(SessionType::Shell),
                    name: Some(name.to_string()),
                    command: Some(vec!["/bin/sh".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let mru = manager.mru_session(&instance.id).unwrap();
    assert_eq!(mru.name, "c");

    manager.remove(&instance.id).await.unwrap();
}

/// Killing one session leaves the others intact.
#[tokio::test]
#[ignore]
async fn kill_one_session_leaves_others() {
    let repo_dir = TempDir::new().unwrap();
    init_repo(repo_dir.path());
    let data_dir = TempDir::new().unwrap();
    let manager = Manager::new(test_config(data_dir.path()));

    let instance = manager
        .create(
            repo_dir.path(),
            CreateOptions {
                branch: "feat/kill".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    for name in ["a", "b"] {
        manager
            .create_session(
                &instance.id,
                CreateSessionOptions {
                    session_type: Some(SessionType::Shell),
                    name: Some(name.to_string()),
                    command: Some(vec!["/bin/sh".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    manager.kill_session(&instance.id, "b").await.unwrap();

    let remaining = manager.list_sessions(&instance.id).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "a");

    manager.remove(&instance.id).await.unwrap();
}

/// A failure during Create leaves no residue (worktree, container, catalog row).
/// Simulated here by pointing at an image that cannot be pulled/run.
#[tokio::test]
#[ignore]
async fn failed_container_start_leaves_no_residue() {
    let repo_dir = TempDir::new().unwrap();
    init_repo(repo_dir.path());
    let data_dir = TempDir::new().unwrap();
    let manager = Manager::new(test_config(data_dir.path()));

    let result = manager
        .create(
            repo_dir.path(),
            CreateOptions {
                branch: "feat/broken".to_string(),
                image: Some("headjack-test/does-not-exist:latest".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(result.is_err());
    assert!(manager.list(&Default::default()).await.unwrap().is_empty());

    let worktree = data_dir.path().join("git");
    let has_leftover_worktree = worktree.exists()
        && std::fs::read_dir(&worktree)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
    assert!(!has_leftover_worktree);
}
