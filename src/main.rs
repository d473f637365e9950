use clap::{CommandFactory, Parser, Subcommand};
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::PagerWriter;
use gitlet::artifacts::core::config::{Config, LOG_ENV};
use gitlet::errors::ErrorKind;
use is_terminal::IsTerminal;
use minus::Pager;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    about = "A tiny version control system",
    long_about = "Gitlet keeps snapshots of a working directory as commits, \
    with branches, checkouts, resets and three-way merges.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository in the current directory"
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage a tracked file for removal"
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged snapshot")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
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
    #[command(name = "status", about = "Show branches, staged files and working changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch.\n\
        checkout -- <file> restores a file from the head commit.\n\
        checkout <commit> -- <file> restores a file from the given commit."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name, or commit id when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
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
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current one")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(
        name = "hash-object",
        about = "Compute a file's blob id and optionally store it"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object store")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "cat-file", about = "Print a stored object")]
    CatFile {
        #[arg(index = 1)]
        object: String,
    },
}

impl Commands {
    fn is_paged(&self) -> bool {
        matches!(self, Commands::Log | Commands::GlobalLog)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "command failed");
            eprintln!("{error:#}");
            ErrorKind::of(&error).exit_code()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = Config::load_from_env()?;
    let is_terminal = std::io::stdout().is_terminal();

    if !is_terminal {
        colored::control::set_override(false);
    }

    let pager = (command.is_paged() && is_terminal && !config.pager_disabled()).then(Pager::new);
    let writer: Box<dyn std::io::Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };

    let pwd = std::env::current_dir()?;
    let repository = Repository::new(&pwd, writer, config)?;

    match command {
        Commands::Init => repository.init().await?,
        Commands::Add { file } => repository.add(&file).await?,
        Commands::Rm { file } => repository.rm(&file).await?,
        Commands::Commit { message } => {
            repository.commit(&message).await?;
        }
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => {
            repository.find(&message)?;
        }
        Commands::Status => {
            repository.status().await?;
        }
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(&branch).await?,
            (None, Some(file)) => repository.checkout_file(&file)?,
            (Some(commit), Some(file)) => repository.checkout_commit_file(&commit, &file)?,
            (None, None) => Cli::command()
                .error(
                    clap::error::ErrorKind::MissingRequiredArgument,
                    "checkout needs a branch or `-- <file>`",
                )
                .exit(),
        },
        Commands::Branch { name } => repository.create_branch(&name)?,
        Commands::RmBranch { name } => repository.delete_branch(&name)?,
        Commands::Reset { commit } => {
            repository.reset(&commit).await?;
        }
        Commands::Merge { branch } => {
            repository.merge(&branch).await?;
        }
        Commands::HashObject { write, file } => {
            repository.hash_object(&file, write)?;
        }
        Commands::CatFile { object } => repository.cat_file(&object)?,
    }

    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}
