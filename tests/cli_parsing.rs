// ABOUTME: Argument-parsing tests for the `hjk` CLI surface

use clap::Parser;
use headjack::cli::{Cli, Command};

fn parse(args: &[&str]) -> Cli {
    let mut full = vec!["hjk"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).expect("expected parse to succeed")
}

#[test]
fn run_requires_branch_and_accepts_image() {
    let cli = parse(&["run", "feat/auth", "--image", "ubuntu:24.04"]);
    match cli.command {
        Command::Run { branch, image } => {
            assert_eq!(branch, "feat/auth");
            assert_eq!(image.as_deref(), Some("ubuntu:24.04"));
        }
        other => panic!("expected Run, got {other:?}"),
    }
}

#[test]
fn agent_parses_type_name_and_detached_flag() {
    let cli = parse(&["agent", "feat/auth", "claude", "-n", "helper", "-d"]);
    match cli.command {
        Command::Agent {
            branch,
            agent_type,
            name,
            detached,
            ..
        } => {
            assert_eq!(branch, "feat/auth");
            assert!(matches!(agent_type, Some(headjack::cli::AgentTypeArg::Claude)));
            assert_eq!(name.as_deref(), Some("helper"));
            assert!(detached);
        }
        other => panic!("expected Agent, got {other:?}"),
    }
}

#[test]
fn attach_accepts_zero_one_or_two_positional_args() {
    assert!(matches!(
        parse(&["attach"]).command,
        Command::Attach { branch: None, session: None }
    ));
    assert!(matches!(
        parse(&["attach", "feat/auth"]).command,
        Command::Attach { branch: Some(_), session: None }
    ));
    assert!(matches!(
        parse(&["attach", "feat/auth", "eager-otter"]).command,
        Command::Attach { branch: Some(_), session: Some(_) }
    ));
}

#[test]
fn kill_takes_a_single_combined_branch_session_target() {
    let cli = parse(&["kill", "feat/auth/eager-otter"]);
    match cli.command {
        Command::Kill { target } => assert_eq!(target, "feat/auth/eager-otter"),
        other => panic!("expected Kill, got {other:?}"),
    }
}

#[test]
fn rm_force_flag_is_optional() {
    assert!(matches!(
        parse(&["rm", "feat/auth"]).command,
        Command::Rm { force: false, .. }
    ));
    assert!(matches!(
        parse(&["rm", "feat/auth", "--force"]).command,
        Command::Rm { force: true, .. }
    ));
}

#[test]
fn logs_defaults_to_100_lines_and_no_follow() {
    let cli = parse(&["logs", "feat/auth", "eager-otter"]);
    match cli.command {
        Command::Logs { lines, follow, full, .. } => {
            assert_eq!(lines, 100);
            assert!(!follow);
            assert!(!full);
        }
        other => panic!("expected Logs, got {other:?}"),
    }
}

#[test]
fn ps_all_flag_and_optional_branch() {
    let cli = parse(&["ps", "-a"]);
    match cli.command {
        Command::Ps { branch, all } => {
            assert!(branch.is_none());
            assert!(all);
        }
        other => panic!("expected Ps, got {other:?}"),
    }
}

#[test]
fn global_repo_flag_is_accepted_before_the_subcommand() {
    let cli = parse(&["--repo", "/tmp/some-repo", "ps"]);
    assert_eq!(cli.repo.as_deref(), Some(std::path::Path::new("/tmp/some-repo")));
}
