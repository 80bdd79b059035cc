use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use twig::areas::repository::{METADATA_DIR, Repository};
use twig::artifacts::objects::object_type::ObjectType;
use twig::commands::plumbing::cat_file::CatFileMode;

/// Env var holding the `tracing` filter directives, `warn` when unset
const LOG_ENV_VAR: &str = "TWIG_LOG";

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    about = "A minimal content-addressed version control tool",
    long_about = "twig stores file snapshots as content-addressed objects, stages them in a \
    binary index and records flat-tree commits on a single branch.",
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
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage files and directories")]
    Add {
        #[arg(index = 1, required = true, help = "Files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object store"
    )]
    HashObject {
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object kind")]
        object_type: ObjectType,
        #[arg(short, long, help = "Write the object to the object store")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print an object resolved by digest or unique prefix"
    )]
    CatFile {
        #[arg(index = 1, value_enum)]
        mode: CatFileMode,
        #[arg(index = 2, help = "Full digest or a prefix of at least two hex digits")]
        prefix: String,
    },
    #[command(name = "ls-files", about = "List the staged files")]
    LsFiles {
        #[arg(short, long, help = "Show mode, digest and stage of each entry")]
        stage: bool,
    },
    #[command(name = "write-tree", about = "Store the index as a tree object")]
    WriteTree,
    #[command(name = "ls-tree", about = "List the entries of a tree or commit")]
    LsTree {
        #[arg(index = 1)]
        prefix: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged files as a new commit on the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(long, help = "Override the author, as \"Name <email>\"")]
        author: Option<String>,
    },
    #[command(name = "status", about = "Show changed, new and deleted files")]
    Status,
    #[command(name = "diff", about = "Show unstaged changes as a unified diff")]
    Diff,
    #[command(name = "log", about = "Show the commit history of the branch")]
    Log,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn open_repository(path: Option<&str>) -> Result<Repository> {
    match path {
        Some(path) => Repository::new(path, Box::new(std::io::stdout())),
        None => {
            let pwd = std::env::current_dir()?;
            Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
        }
    }
}

/// Open the repository in the current directory, failing unless `init` ran there
fn open_initialized() -> Result<Repository> {
    let repository = open_repository(None)?;

    if !repository.is_initialized() {
        anyhow::bail!(
            "not a repository (missing {}): {}",
            METADATA_DIR,
            repository.path().display()
        );
    }

    Ok(repository)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => open_repository(path.as_deref())?.init()?,
        Commands::Add { paths } => {
            open_initialized()?.add(paths)?;
        }
        Commands::HashObject {
            object_type,
            write,
            file,
        } => open_initialized()?.print_hash_object(file, *object_type, *write)?,
        Commands::CatFile { mode, prefix } => open_initialized()?.cat_file(*mode, prefix)?,
        Commands::LsFiles { stage } => open_initialized()?.ls_files(*stage)?,
        Commands::WriteTree => open_initialized()?.print_write_tree()?,
        Commands::LsTree { prefix } => open_initialized()?.ls_tree(prefix)?,
        Commands::Commit { message, author } => {
            open_initialized()?.print_commit(message, author.as_deref())?
        }
        Commands::Status => open_initialized()?.print_status()?,
        Commands::Diff => open_initialized()?.print_diff()?,
        Commands::Log => open_initialized()?.log()?,
    }

    Ok(())
}
