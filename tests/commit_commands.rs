use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

use common::command::{
    READABLE_COMMIT_DATE, commit_file, find_commit_id, init_repository_dir, run_sprig_command,
    sprig_commit, stdout_of,
};
use common::file::{FileSpec, write_file};

#[rstest]
fn commit_reports_branch_and_short_id(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("c.txt"), "gamma\n".to_string()));
    run_sprig_command(dir, &["add", "c.txt"]).assert().success();

    sprig_commit(dir, "add gamma")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master [0-9a-f]{7}\] add gamma\n$")?);

    let commit_id = find_commit_id(dir, "add gamma");
    let log = stdout_of(dir, &["log"]);
    assert!(log.starts_with(&format!(
        "===\ncommit {}\nDate: {}\nadd gamma\n\n",
        commit_id, READABLE_COMMIT_DATE
    )));

    Ok(())
}

#[rstest]
fn commit_without_staged_changes_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    sprig_commit(init_repository_dir.path(), "empty")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No changes added to the commit."));

    Ok(())
}

#[rstest]
fn committed_removal_untracks_the_file(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_sprig_command(dir, &["rm", "b.txt"]).assert().success();
    sprig_commit(dir, "drop b").assert().success();

    run_sprig_command(dir, &["checkout", "--", "b.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File does not exist in that commit"));

    write_file(FileSpec::new(dir.join("b.txt"), "beta\n".to_string()));
    let status = stdout_of(dir, &["status"]);
    assert!(status.contains("=== Untracked Files ===\nb.txt\n"));

    Ok(())
}

#[rstest]
fn commit_keeps_untouched_files_from_parent(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let base = find_commit_id(dir, "base");
    commit_file(dir, "a.txt", "alpha two\n", "change a");

    write_file(FileSpec::new(dir.join("b.txt"), "scribbles\n".to_string()));
    run_sprig_command(dir, &["checkout", "--", "b.txt"])
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(dir.join("b.txt"))?, "beta\n");

    run_sprig_command(dir, &["checkout", &base, "--", "a.txt"])
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(dir.join("a.txt"))?, "alpha\n");

    Ok(())
}

#[rstest]
fn modified_files_are_reported_until_staged(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("a.txt"), "edited\n".to_string()));
    std::fs::remove_file(dir.join("b.txt"))?;
    write_file(FileSpec::new(dir.join("d.txt"), "delta\n".to_string()));

    run_sprig_command(dir, &["branch", "other"]).assert().success();
    write_file(FileSpec::new(dir.join("c.txt"), "gamma\n".to_string()));
    run_sprig_command(dir, &["add", "c.txt"]).assert().success();

    run_sprig_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "=== Branches ===\n*master\nother\n\n\
             === Staged Files ===\nc.txt\n\n\
             === Removed Files ===\n\n\
             === Modifications Not Staged For Commit ===\na.txt (modified)\nb.txt (deleted)\n\n\
             === Untracked Files ===\nd.txt\n\n",
        ));

    Ok(())
}
