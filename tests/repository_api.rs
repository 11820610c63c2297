use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use sprig::areas::repository::Repository;
use sprig::artifacts::merge::outcome::MergeOutcome;
use sprig::errors::{RepositoryError, kind_of};
use std::path::{Path, PathBuf};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn init(dir: &Path) -> Repository {
    Repository::init(dir, Box::new(std::io::sink())).expect("Failed to initialize repository")
}

fn write(repository: &Repository, file: &str, content: &str) {
    std::fs::write(repository.path().join(file), content).expect("Failed to write file");
}

fn commit_file(repository: &mut Repository, file: &str, content: &str, message: &str) {
    write(repository, file, content);
    repository.add(Path::new(file)).expect("Failed to add file");
    repository.commit(message).expect("Failed to commit");
}

fn error_kind<T>(result: anyhow::Result<T>) -> RepositoryError {
    match result {
        Ok(_) => panic!("operation should have been refused"),
        Err(error) => kind_of(&error)
            .cloned()
            .unwrap_or_else(|| panic!("not a user error: {error:#}")),
    }
}

#[rstest]
fn persisted_state_round_trips_through_open(repository_dir: TempDir) -> TestResult {
    let mut repository = init(repository_dir.path());
    commit_file(&mut repository, "a.txt", "alpha\n", "base");
    repository.branch("feature")?;
    write(&repository, "b.txt", "beta\n");
    repository.add(Path::new("b.txt"))?;
    repository.persist()?;

    let reopened = Repository::open(repository_dir.path(), Box::new(std::io::sink()))?;

    assert_eq!(reopened.state(), repository.state());
    assert_eq!(reopened.head_commit_id()?, repository.head_commit_id()?);
    assert!(reopened.index().is_staged(Path::new("b.txt")));

    Ok(())
}

#[rstest]
fn commit_ids_are_findable_by_message(repository_dir: TempDir) -> TestResult {
    let mut repository = init(repository_dir.path());
    write(&repository, "a.txt", "alpha\n");
    repository.add(Path::new("a.txt"))?;
    let commit_id = repository.commit("first words")?;

    assert_eq!(repository.find("first words")?, vec![commit_id.clone()]);
    assert_eq!(repository.head_commit_id()?, commit_id);
    assert_eq!(
        error_kind(repository.find("last words")),
        RepositoryError::NoCommitWithMessage
    );

    Ok(())
}

#[rstest]
fn refusals_carry_their_kind(repository_dir: TempDir) -> TestResult {
    let mut repository = init(repository_dir.path());
    commit_file(&mut repository, "a.txt", "alpha\n", "base");
    write(&repository, "stray.txt", "stray\n");

    assert_eq!(
        error_kind(repository.rm(Path::new("stray.txt"))),
        RepositoryError::NothingToRemove(PathBuf::from("stray.txt"))
    );
    assert_eq!(
        error_kind(repository.rm(Path::new("ghost.txt"))),
        RepositoryError::FileNotFound(PathBuf::from("ghost.txt"))
    );
    assert_eq!(error_kind(repository.commit("nothing")), RepositoryError::NothingStaged);
    assert_eq!(error_kind(repository.merge("master")), RepositoryError::SelfMerge);
    assert_eq!(
        error_kind(repository.checkout_branch("master")),
        RepositoryError::AlreadyOnBranch
    );
    assert_eq!(
        error_kind(Repository::init(repository_dir.path(), Box::new(std::io::sink()))),
        RepositoryError::AlreadyInitialized
    );

    Ok(())
}

#[rstest]
fn untracked_conflict_names_the_files_and_keeps_state(repository_dir: TempDir) -> TestResult {
    let mut repository = init(repository_dir.path());
    commit_file(&mut repository, "a.txt", "alpha\n", "base");
    repository.branch("feature")?;
    commit_file(&mut repository, "c.txt", "gamma\n", "add c");
    repository.checkout_branch("feature")?;
    write(&repository, "c.txt", "precious\n");
    let state_before = repository.state().clone();

    assert_eq!(
        error_kind(repository.checkout_branch("master")),
        RepositoryError::UntrackedFileConflict(vec![PathBuf::from("c.txt")])
    );
    assert_eq!(repository.state(), &state_before);
    assert_eq!(
        std::fs::read_to_string(repository_dir.path().join("c.txt"))?,
        "precious\n"
    );

    Ok(())
}

#[rstest]
fn merge_reports_each_outcome(repository_dir: TempDir) -> TestResult {
    let mut repository = init(repository_dir.path());
    commit_file(&mut repository, "a.txt", "alpha\n", "base");
    repository.branch("ahead")?;
    repository.branch("behind")?;

    repository.checkout_branch("ahead")?;
    commit_file(&mut repository, "a.txt", "ahead\n", "ahead a");
    let (_, ahead_tip) = repository.refs().resolve_branch("ahead")?;
    repository.checkout_branch("master")?;

    assert_eq!(
        repository.merge("ahead")?,
        MergeOutcome::FastForwarded(ahead_tip.clone())
    );
    assert_eq!(repository.head_commit_id()?, ahead_tip);
    assert_eq!(repository.merge("behind")?, MergeOutcome::GivenIsAncestor);

    repository.checkout_branch("behind")?;
    commit_file(&mut repository, "a.txt", "behind\n", "behind a");
    repository.checkout_branch("master")?;

    let outcome = repository.merge("behind")?;
    let MergeOutcome::Merged { commit, conflicts } = &outcome else {
        panic!("expected a merge commit, got {outcome:?}");
    };
    assert!(outcome.has_conflicts());
    assert_eq!(conflicts, &vec![PathBuf::from("a.txt")]);
    assert_eq!(&repository.head_commit_id()?, commit);

    let merge_commit = repository.head_commit()?;
    assert_eq!(merge_commit.parents().len(), 2);
    assert_eq!(merge_commit.message(), "Merged behind into master.");
    assert!(repository.index().is_empty());

    Ok(())
}

#[rstest]
fn merge_of_identical_edits_stages_nothing(repository_dir: TempDir) -> TestResult {
    let mut repository = init(repository_dir.path());
    commit_file(&mut repository, "a.txt", "alpha\n", "base");
    repository.branch("other")?;
    commit_file(&mut repository, "a.txt", "same\n", "master a");
    repository.checkout_branch("other")?;
    commit_file(&mut repository, "a.txt", "same\n", "other a");
    repository.checkout_branch("master")?;
    let head_before = repository.head_commit_id()?;

    assert_eq!(error_kind(repository.merge("other")), RepositoryError::NothingStaged);
    assert_eq!(repository.head_commit_id()?, head_before);
    assert!(repository.index().is_empty());

    Ok(())
}

#[rstest]
fn untracked_files_exclude_staged_ones(repository_dir: TempDir) -> TestResult {
    let mut repository = init(repository_dir.path());
    write(&repository, "staged.txt", "staged\n");
    write(&repository, "loose.txt", "loose\n");
    repository.add(Path::new("staged.txt"))?;

    assert_eq!(repository.untracked_files()?, vec![PathBuf::from("loose.txt")]);

    let status = repository.status_info()?;
    assert_eq!(status.staged_files, vec![PathBuf::from("staged.txt")]);
    assert_eq!(status.untracked_files, vec![PathBuf::from("loose.txt")]);

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn committed_content_is_restored_byte_for_byte(
        content in proptest::collection::vec(any::<u8>(), 0..512),
        scribble in proptest::collection::vec(any::<u8>(), 1..64),
    ) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut repository = init(dir.path());
        let file = dir.path().join("data.bin");

        std::fs::write(&file, &content).expect("Failed to write file");
        repository.add(Path::new("data.bin")).expect("Failed to add file");
        let commit_id = repository.commit("snapshot").expect("Failed to commit");

        std::fs::write(&file, &scribble).expect("Failed to write file");
        repository
            .restore_file(Some(commit_id.to_string().as_str()), Path::new("data.bin"))
            .expect("Failed to restore file");

        prop_assert_eq!(std::fs::read(&file).expect("Failed to read file"), content);
    }
}
