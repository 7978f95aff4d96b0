//! AlgoNote command-line entry point.
//!
//! # Responsibility
//! - Resolve database/logging settings from flags and environment.
//! - Map note service failures onto stable exit codes.

mod commands;

use algonote_core::db::{open_db, DbError};
use algonote_core::{
    core_version, default_log_level, init_logging, parse_log_level, LoggingError, MemberId, MemberRepository,
    NoteId, NoteService, NoteServiceError, ProblemId, ProblemRepository, RepoError,
    SqliteMemberRepository, SqliteNoteRepository, SqliteProblemRepository,
};
use clap::Parser;
use commands::{Cli, Commands, MemberAction, NoteAction, ProblemAction};
use log::info;
use std::process::ExitCode;
use thiserror::Error;

const EXIT_FAILURE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;
const EXIT_FORBIDDEN: u8 = 3;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Note(#[from] NoteServiceError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Note(NoteServiceError::NotFound(_)) => EXIT_NOT_FOUND,
            Self::Note(NoteServiceError::Forbidden { .. }) => EXIT_FORBIDDEN,
            _ => EXIT_FAILURE,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match usage_exit_code(&err) {
            Some(code) => {
                // Printing can only fail on a closed stderr; the exit code still stands.
                let _ = err.print();
                return ExitCode::from(code);
            }
            None => err.exit(),
        },
    };
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Usage errors share the generic failure code so that 2 and 3 stay
/// reserved for not-found and forbidden. `None` means help or version
/// output, which clap prints to stdout with status 0.
fn usage_exit_code(err: &clap::Error) -> Option<u8> {
    err.use_stderr().then_some(EXIT_FAILURE)
}

fn resolve_log_level(raw: Option<&str>) -> Result<&'static str, CliError> {
    Ok(raw
        .map(parse_log_level)
        .transpose()?
        .unwrap_or_else(default_log_level))
}

fn run(cli: Cli) -> Result<(), CliError> {
    let level = resolve_log_level(cli.log_level.as_deref())?;
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(level, log_dir)?;
    }

    if let Commands::Version = cli.command {
        println!("algonote_core version={}", core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db)?;
    info!(
        "event=cli_command module=cli status=start db={}",
        cli.db.display()
    );

    match cli.command {
        Commands::Member(member) => match member.action {
            MemberAction::Add { nickname } => {
                let created = SqliteMemberRepository::try_new(&conn)?.create_member(&nickname)?;
                println!("{}", created.id);
            }
        },
        Commands::Problem(problem) => match problem.action {
            ProblemAction::Add { id, title } => {
                SqliteProblemRepository::try_new(&conn)?
                    .register_problem(ProblemId::new(id), &title)?;
            }
        },
        Commands::Note(note) => {
            let service = NoteService::new(
                SqliteMemberRepository::try_new(&conn)?,
                SqliteProblemRepository::try_new(&conn)?,
                SqliteNoteRepository::try_new(&conn)?,
            );
            match note.action {
                NoteAction::Create {
                    member,
                    problem,
                    title,
                    content,
                } => {
                    let created = service.create_note(
                        MemberId::new(member),
                        ProblemId::new(problem),
                        title,
                        content,
                    )?;
                    println!("{}", created.id);
                }
                NoteAction::Delete { member, note } => {
                    service.delete_note(MemberId::new(member), NoteId::new(note))?;
                }
            }
        }
        Commands::Version => {}
    }

    Ok(())
}
