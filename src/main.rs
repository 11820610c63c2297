use anyhow::Result;
use clap::{Parser, Subcommand};
use sprig::areas::repository::Repository;
use sprig::errors;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter
const LOG_ENV: &str = "SPRIG_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(
    name = "sprig",
    version = "0.1.0",
    about = "A small local version-control system",
    long_about = "sprig keeps a content-addressed history of snapshots of a directory, \
    with named branches and three-way merges. Everything stays local, in the .sprig directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates a repository in the current directory or at the specified path, \
        with a single root commit on the master branch."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "add",
        about = "Stage a file for the next commit",
        long_about = "This command stores the current content of a file and stages it. \
        Staging a file identical to the current commit's version drops any pending change to it."
    )]
    Add {
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged changes as a new commit on the current branch."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file or stage its removal",
        long_about = "This command unstages a file. If the current commit tracks it, \
        the file is also deleted from the working directory and untracked in the next commit."
    )]
    Rm {
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch. \
        checkout -- <file> restores a file from the current commit. \
        checkout <commit> -- <file> restores a file from the given commit."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch to switch to, or commit to restore from")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "File to restore")]
        file: Option<PathBuf>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Move the current branch to a commit",
        long_about = "This command checks out every file of the given commit, \
        removes tracked files it lacks and points the current branch at it."
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current one")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match errors::kind_of(&err) {
                Some(user_error) => eprintln!("{}", user_error),
                None => eprintln!("fatal: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::open(&pwd, Box::new(std::io::stdout()))
}

fn run(command: &Commands) -> Result<()> {
    if let Commands::Init { path } = command {
        let path = match path {
            Some(path) => path.clone(),
            None => std::env::current_dir()?,
        };
        Repository::init(&path, Box::new(std::io::stdout()))?;

        return Ok(());
    }

    let mut repository = open_repository()?;

    match command {
        Commands::Init { .. } => unreachable!("init is handled before a repository is opened"),
        Commands::Add { file } => repository.add(file)?,
        Commands::Commit { message } => {
            repository.commit(message)?;
        }
        Commands::Rm { file } => repository.rm(file)?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => {
            repository.find(message)?;
        }
        Commands::Status => repository.status()?,
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(branch)?,
            (commit, Some(file)) => repository.restore_file(commit.as_deref(), file)?,
            (None, None) => anyhow::bail!("Incorrect operands."),
        },
        Commands::Branch { name } => repository.branch(name)?,
        Commands::RmBranch { name } => repository.remove_branch(name)?,
        Commands::Reset { commit } => repository.reset(commit)?,
        Commands::Merge { branch } => {
            repository.merge(branch)?;
        }
    }

    repository.persist()
}
