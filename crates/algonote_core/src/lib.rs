//! Core domain logic for AlgoNote.
//! This crate is the single source of truth for note lifecycle invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_logging, logging_status, parse_log_level, LogSettings, LoggingError,
};
pub use model::audit::{AuditStamp, Clock, SystemClock};
pub use model::ids::{MemberId, NoteId, ProblemId};
pub use model::member::Member;
pub use model::note::{NewNote, Note};
pub use model::problem::Problem;
pub use repo::member_repo::{MemberRepository, SqliteMemberRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::problem_repo::{ProblemRepository, SqliteProblemRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{MissingEntity, NoteService, NoteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
