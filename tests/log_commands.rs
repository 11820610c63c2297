use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

use common::command::{
    READABLE_COMMIT_DATE, commit_file, init_repository_dir, run_sprig_command, stdout_of,
};

fn messages(log: &str) -> Vec<String> {
    log.split("===\n")
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .lines()
                .find(|line| {
                    !line.starts_with("commit ")
                        && !line.starts_with("Merge: ")
                        && !line.starts_with("Date: ")
                })
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

#[rstest]
fn log_lists_current_branch_newest_first(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    commit_file(dir, "a.txt", "two\n", "second");
    commit_file(dir, "a.txt", "three\n", "third");

    let log = stdout_of(dir, &["log"]);

    assert_eq!(
        messages(&log),
        vec!["third", "second", "base", "initial commit"]
    );
    assert_eq!(
        log.matches(&format!("Date: {}", READABLE_COMMIT_DATE)).count(),
        3
    );

    Ok(())
}

#[rstest]
fn log_ignores_other_branches(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_sprig_command(dir, &["branch", "feature"])
        .assert()
        .success();
    run_sprig_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir, "c.txt", "gamma\n", "feature work");
    run_sprig_command(dir, &["checkout", "master"])
        .assert()
        .success();

    assert_eq!(
        messages(&stdout_of(dir, &["log"])),
        vec!["base", "initial commit"]
    );

    let mut everything = messages(&stdout_of(dir, &["global-log"]));
    everything.sort();
    assert_eq!(
        everything,
        vec!["base", "feature work", "initial commit"]
    );

    Ok(())
}

#[rstest]
fn find_prints_every_commit_with_the_message(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_sprig_command(dir, &["branch", "feature"])
        .assert()
        .success();
    commit_file(dir, "c.txt", "master gamma\n", "add gamma");
    run_sprig_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir, "c.txt", "feature gamma\n", "add gamma");

    let found = stdout_of(dir, &["find", "add gamma"]);
    let ids = found.lines().collect::<Vec<_>>();

    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|id| id.len() == 40));
    assert_ne!(ids[0], ids[1]);

    Ok(())
}

#[rstest]
fn find_without_match_fails(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(init_repository_dir.path(), &["find", "no such message"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Found no commit with that message.",
        ));

    Ok(())
}
