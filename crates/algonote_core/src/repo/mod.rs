//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the member/problem/note data access contracts the service needs.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Lookups report absence as `Ok(None)`, never as an application error.
//! - Writes that target a missing note row return `RepoError::NotFound`.
//! - SQLite repositories refuse connections that are not fully migrated.

use crate::db::DbError;
use crate::model::ids::NoteId;
use thiserror::Error;

pub mod member_repo;
pub mod note_repo;
pub mod problem_repo;
mod schema;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level error shared by all repositories.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    /// Targeted note row does not exist (or was removed concurrently).
    #[error("note not found: {0}")]
    NotFound(NoteId),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
    #[error("repository requires column `{column}` in table `{table}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
