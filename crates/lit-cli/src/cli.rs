use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lit", about = "lit: a minimal content-addressed version control system", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository or reinitialize an existing one
    Init(InitArgs),
    /// Compute the blob id of a file
    HashObject(HashObjectArgs),
    /// Show the content, type or size of a stored object
    CatFile(CatFileArgs),
    /// Stage files for the next commit
    Add(AddArgs),
    /// Write a tree from the index or the working directory
    WriteTree(WriteTreeArgs),
    /// List the entries of a stored tree
    LsTree(LsTreeArgs),
    /// Commit an existing tree on the current branch
    CommitTree(CommitTreeArgs),
    /// Commit the index on the current branch
    Commit(CommitArgs),
    /// Show commit history from HEAD
    Log(LogArgs),
    /// Replace the working directory with a commit's tree
    Checkout(CheckoutArgs),
    /// Compare HEAD, index and working directory
    Status(StatusArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashObjectArgs {
    pub file: PathBuf,
    /// Also store the blob
    #[arg(short = 'w')]
    pub write: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("mode").required(true).args(["pretty", "kind", "size"])))]
pub struct CatFileArgs {
    pub object: String,
    /// Print the content
    #[arg(short = 'p')]
    pub pretty: bool,
    /// Print the type
    #[arg(short = 't')]
    pub kind: bool,
    /// Print the content size
    #[arg(short = 's')]
    pub size: bool,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct WriteTreeArgs {
    /// Scan the working directory instead of reading the index
    #[arg(long)]
    pub workdir: bool,
}

#[derive(Args)]
pub struct LsTreeArgs {
    pub tree: String,
}

#[derive(Args)]
pub struct CommitTreeArgs {
    pub tree: String,
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct CheckoutArgs {
    pub revision: String,
}

#[derive(Args)]
pub struct StatusArgs {}
