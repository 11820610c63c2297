use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Pinned timestamp for every commit made through the CLI in tests
pub const COMMIT_DATE: &str = "2024-01-01 12:00:00 +0000";
pub const READABLE_COMMIT_DATE: &str = "Mon Jan 1 12:00:00 2024 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository on master with `a.txt` and `b.txt` committed as "base"
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_sprig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "alpha\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("b.txt"),
        "beta\n".to_string(),
    ));

    run_sprig_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    run_sprig_command(repository_dir.path(), &["add", "b.txt"])
        .assert()
        .success();
    sprig_commit(repository_dir.path(), "base")
        .assert()
        .success();

    repository_dir
}

pub fn run_sprig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("sprig").expect("Failed to find sprig binary");
    cmd.current_dir(dir)
        .args(args)
        .env("SPRIG_COMMIT_DATE", COMMIT_DATE)
        .env("NO_COLOR", "1")
        .env_remove("CLICOLOR_FORCE")
        .env_remove("SPRIG_LOG");

    cmd
}

pub fn sprig_commit(dir: &Path, message: &str) -> Command {
    run_sprig_command(dir, &["commit", message])
}

/// Write `content` to `file`, stage it and commit it
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(file), content.to_string()));

    run_sprig_command(dir, &["add", file]).assert().success();
    sprig_commit(dir, message).assert().success();
}

/// Full id of the only commit carrying `message`
pub fn find_commit_id(dir: &Path, message: &str) -> String {
    let output = run_sprig_command(dir, &["find", message])
        .output()
        .expect("Failed to run find");
    assert!(output.status.success(), "no commit with message {message}");

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .expect("find printed an id")
        .trim()
        .to_string()
}

pub fn stdout_of(dir: &Path, args: &[&str]) -> String {
    let output = run_sprig_command(dir, args)
        .output()
        .expect("Failed to run sprig");
    assert!(output.status.success(), "sprig {:?} failed", args);

    String::from_utf8_lossy(&output.stdout).to_string()
}
