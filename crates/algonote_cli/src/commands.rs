use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "algonote")]
#[command(version, about = "Problem notes backed by a local SQLite database")]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "ALGONOTE_DB", default_value = "algonote.sqlite3", global = true)]
    pub db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "ALGONOTE_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, env = "ALGONOTE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage members
    Member(MemberCommand),
    /// Manage the problem catalog
    Problem(ProblemCommand),
    /// Create or delete notes
    Note(NoteCommand),
    /// Print the core version
    Version,
}

#[derive(Args, Debug)]
pub struct MemberCommand {
    #[command(subcommand)]
    pub action: MemberAction,
}

#[derive(Subcommand, Debug)]
pub enum MemberAction {
    /// Register a member and print its id
    Add { nickname: String },
}

#[derive(Args, Debug)]
pub struct ProblemCommand {
    #[command(subcommand)]
    pub action: ProblemAction,
}

#[derive(Subcommand, Debug)]
pub enum ProblemAction {
    /// Register a catalog problem under its number
    Add { id: i64, title: String },
}

#[derive(Args, Debug)]
pub struct NoteCommand {
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand, Debug)]
pub enum NoteAction {
    /// Create a note and print its id
    Create {
        /// Authoring member id
        #[arg(long)]
        member: i64,
        /// Problem number
        #[arg(long)]
        problem: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Delete a note authored by the given member
    Delete {
        /// Requesting member id
        #[arg(long)]
        member: i64,
        #[arg(long)]
        note: i64,
    },
}
