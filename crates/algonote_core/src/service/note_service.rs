//! Note lifecycle service.
//!
//! # Responsibility
//! - Validate author, problem and note references before any mutation.
//! - Enforce that only a note's author may delete it.
//! - Translate store-level absence into named `NotFound` errors.
//!
//! # Invariants
//! - Member existence is checked before problem/note existence.
//! - No write is attempted once any validation step fails.
//! - The service holds no note state between calls.

use crate::model::ids::{MemberId, NoteId, ProblemId};
use crate::model::member::Member;
use crate::model::note::{NewNote, Note};
use crate::model::problem::Problem;
use crate::repo::member_repo::MemberRepository;
use crate::repo::note_repo::NoteRepository;
use crate::repo::problem_repo::ProblemRepository;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Entity whose id did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    Member(MemberId),
    Problem(ProblemId),
    Note(NoteId),
}

impl Display for MissingEntity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member(id) => write!(f, "member {id}"),
            Self::Problem(id) => write!(f, "problem {id}"),
            Self::Note(id) => write!(f, "note {id}"),
        }
    }
}

/// Service error for note use-cases.
#[derive(Debug, Error)]
pub enum NoteServiceError {
    #[error("{0} not found")]
    NotFound(MissingEntity),
    /// Requesting member is not the note's author.
    #[error("member {member_id} is not the author of note {note_id}")]
    Forbidden { member_id: MemberId, note_id: NoteId },
    #[error(transparent)]
    Repo(RepoError),
}

impl NoteServiceError {
    /// Stable snake_case identifier for logs and outer surfaces.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(MissingEntity::Member(_)) => "member_not_found",
            Self::NotFound(MissingEntity::Problem(_)) => "problem_not_found",
            Self::NotFound(MissingEntity::Note(_)) => "note_not_found",
            Self::Forbidden { .. } => "note_forbidden",
            Self::Repo(_) => "storage_failure",
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(note_id) => Self::NotFound(MissingEntity::Note(note_id)),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over member, problem and note repositories.
pub struct NoteService<M, P, N> {
    members: M,
    problems: P,
    notes: N,
}

impl<M, P, N> NoteService<M, P, N>
where
    M: MemberRepository,
    P: ProblemRepository,
    N: NoteRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(members: M, problems: P, notes: N) -> Self {
        Self {
            members,
            problems,
            notes,
        }
    }

    /// Creates one note authored by `author_id` about `problem_id`.
    ///
    /// # Errors
    /// - `NotFound(Member)` when the author does not exist, even if the
    ///   problem is missing too.
    /// - `NotFound(Problem)` when the problem does not exist.
    /// - `Repo` when the store fails; no note is left behind.
    pub fn create_note(
        &self,
        author_id: MemberId,
        problem_id: ProblemId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let result = self.member(author_id).and_then(|author| {
            let problem = self.problem(problem_id)?;
            let new_note = NewNote::new(&author, &problem, title, content);
            Ok(self.notes.save_note(&new_note)?)
        });

        match &result {
            Ok(note) => info!(
                "event=note_create module=note_service status=ok member_id={author_id} problem_id={problem_id} note_id={}",
                note.id
            ),
            Err(err) => log_failure(
                "note_create",
                err,
                EventFields::Create {
                    member_id: author_id,
                    problem_id,
                },
            ),
        }
        result
    }

    /// Deletes one note on behalf of its author.
    ///
    /// # Errors
    /// - `NotFound(Member)` when the requester does not exist.
    /// - `NotFound(Note)` when the note does not exist, including when it
    ///   was already deleted.
    /// - `Forbidden` when the requester is not the note's author.
    pub fn delete_note(
        &self,
        requester_id: MemberId,
        note_id: NoteId,
    ) -> Result<(), NoteServiceError> {
        let result = self.member(requester_id).and_then(|requester| {
            let note = self
                .notes
                .find_note_by_id(note_id)?
                .ok_or(NoteServiceError::NotFound(MissingEntity::Note(note_id)))?;
            if !note.is_authored_by(requester.id) {
                return Err(NoteServiceError::Forbidden {
                    member_id: requester.id,
                    note_id,
                });
            }
            Ok(self.notes.delete_note(&note)?)
        });

        match &result {
            Ok(()) => info!(
                "event=note_delete module=note_service status=ok member_id={requester_id} note_id={note_id}"
            ),
            Err(err) => log_failure(
                "note_delete",
                err,
                EventFields::Delete {
                    member_id: requester_id,
                    note_id,
                },
            ),
        }
        result
    }

    fn member(&self, id: MemberId) -> Result<Member, NoteServiceError> {
        self.members
            .find_member_by_id(id)?
            .ok_or(NoteServiceError::NotFound(MissingEntity::Member(id)))
    }

    fn problem(&self, id: ProblemId) -> Result<Problem, NoteServiceError> {
        self.problems
            .find_problem_by_id(id)?
            .ok_or(NoteServiceError::NotFound(MissingEntity::Problem(id)))
    }
}

/// Ids carried by a note event, in log order.
#[derive(Debug, Clone, Copy)]
enum EventFields {
    Create {
        member_id: MemberId,
        problem_id: ProblemId,
    },
    Delete {
        member_id: MemberId,
        note_id: NoteId,
    },
}

impl Display for EventFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create {
                member_id,
                problem_id,
            } => write!(f, "member_id={member_id} problem_id={problem_id}"),
            Self::Delete { member_id, note_id } => {
                write!(f, "member_id={member_id} note_id={note_id}")
            }
        }
    }
}

fn log_failure(event: &str, err: &NoteServiceError, fields: EventFields) {
    match err {
        NoteServiceError::Repo(inner) => error!(
            "event={event} module=note_service status=error {fields} error_code={} error={inner}",
            err.error_code()
        ),
        _ => warn!(
            "event={event} module=note_service status=rejected {fields} error_code={}",
            err.error_code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{EventFields, MissingEntity, NoteService, NoteServiceError};
    use crate::db::DbError;
    use crate::model::audit::AuditStamp;
    use crate::model::ids::{MemberId, NoteId, ProblemId};
    use crate::model::member::Member;
    use crate::model::note::{NewNote, Note};
    use crate::model::problem::Problem;
    use crate::repo::member_repo::MemberRepository;
    use crate::repo::note_repo::NoteRepository;
    use crate::repo::problem_repo::ProblemRepository;
    use crate::repo::{RepoError, RepoResult};
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    /// In-memory store that records how often the note store is written.
    #[derive(Default)]
    struct RecordingStore {
        members: RefCell<BTreeMap<MemberId, Member>>,
        problems: RefCell<BTreeMap<ProblemId, Problem>>,
        notes: RefCell<BTreeMap<NoteId, Note>>,
        next_note_id: Cell<i64>,
        save_calls: Cell<usize>,
        delete_calls: Cell<usize>,
        // Simulates a concurrent delete landing between lookup and delete.
        vanish_before_delete: Cell<bool>,
        fail_saves: Cell<bool>,
    }

    impl RecordingStore {
        fn with_member(self, id: i64) -> Self {
            let member = Member {
                id: MemberId::new(id),
                nickname: format!("member-{id}"),
            };
            self.members.borrow_mut().insert(member.id, member);
            self
        }

        fn with_problem(self, id: i64) -> Self {
            let problem = Problem {
                id: ProblemId::new(id),
                title: format!("problem-{id}"),
            };
            self.problems.borrow_mut().insert(problem.id, problem);
            self
        }

        fn with_note(self, id: i64, author: i64) -> Self {
            let note = Note {
                id: NoteId::new(id),
                author_id: MemberId::new(author),
                problem_id: ProblemId::new(1000),
                title: "title".to_string(),
                content: "content".to_string(),
                audit: AuditStamp::on_insert(0),
            };
            self.notes.borrow_mut().insert(note.id, note);
            self
        }

        fn note_count(&self) -> usize {
            self.notes.borrow().len()
        }
    }

    impl MemberRepository for RecordingStore {
        fn create_member(&self, nickname: &str) -> RepoResult<Member> {
            let id = MemberId::new(self.members.borrow().len() as i64 + 1);
            let member = Member {
                id,
                nickname: nickname.to_string(),
            };
            self.members.borrow_mut().insert(id, member.clone());
            Ok(member)
        }

        fn find_member_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
            Ok(self.members.borrow().get(&id).cloned())
        }
    }

    impl ProblemRepository for RecordingStore {
        fn register_problem(&self, id: ProblemId, title: &str) -> RepoResult<Problem> {
            let problem = Problem {
                id,
                title: title.to_string(),
            };
            self.problems.borrow_mut().insert(id, problem.clone());
            Ok(problem)
        }

        fn find_problem_by_id(&self, id: ProblemId) -> RepoResult<Option<Problem>> {
            Ok(self.problems.borrow().get(&id).cloned())
        }
    }

    impl NoteRepository for RecordingStore {
        fn find_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
            Ok(self.notes.borrow().get(&id).cloned())
        }

        fn save_note(&self, note: &NewNote) -> RepoResult<Note> {
            self.save_calls.set(self.save_calls.get() + 1);
            if self.fail_saves.get() {
                return Err(RepoError::Db(DbError::Sqlite(
                    rusqlite::Error::InvalidQuery,
                )));
            }
            let id = NoteId::new(self.next_note_id.get() + 1);
            self.next_note_id.set(id.get());
            let saved = Note::from_new(id, note, AuditStamp::on_insert(0));
            self.notes.borrow_mut().insert(id, saved.clone());
            Ok(saved)
        }

        fn update_note(&self, note: &Note) -> RepoResult<Note> {
            let mut notes = self.notes.borrow_mut();
            let stored = notes.get_mut(&note.id).ok_or(RepoError::NotFound(note.id))?;
            stored.title = note.title.clone();
            stored.content = note.content.clone();
            Ok(stored.clone())
        }

        fn delete_note(&self, note: &Note) -> RepoResult<()> {
            self.delete_calls.set(self.delete_calls.get() + 1);
            if self.vanish_before_delete.get() {
                self.notes.borrow_mut().remove(&note.id);
            }
            self.notes
                .borrow_mut()
                .remove(&note.id)
                .map(|_| ())
                .ok_or(RepoError::NotFound(note.id))
        }
    }

    fn service(
        store: &RecordingStore,
    ) -> NoteService<&RecordingStore, &RecordingStore, &RecordingStore> {
        NoteService::new(store, store, store)
    }

    #[test]
    fn create_note_saves_exactly_once_with_resolved_references() {
        let store = RecordingStore::default().with_member(1).with_problem(1000);

        let note = service(&store)
            .create_note(MemberId::new(1), ProblemId::new(1000), "title", "content")
            .expect("create should succeed");

        assert_eq!(store.save_calls.get(), 1);
        assert_eq!(store.note_count(), 1);
        assert_eq!(note.author_id, MemberId::new(1));
        assert_eq!(note.problem_id, ProblemId::new(1000));
        assert_eq!(note.title, "title");
        assert_eq!(note.content, "content");
    }

    #[test]
    fn create_note_without_member_fails_even_when_problem_exists() {
        let store = RecordingStore::default().with_problem(1000);

        let err = service(&store)
            .create_note(MemberId::new(1), ProblemId::new(1000), "title", "content")
            .expect_err("missing member must fail");

        assert!(matches!(
            err,
            NoteServiceError::NotFound(MissingEntity::Member(id)) if id == MemberId::new(1)
        ));
        assert_eq!(store.save_calls.get(), 0);
    }

    #[test]
    fn create_note_reports_member_before_problem() {
        let store = RecordingStore::default();

        let err = service(&store)
            .create_note(MemberId::new(1), ProblemId::new(1000), "title", "content")
            .expect_err("missing member and problem must fail");

        assert_eq!(err.error_code(), "member_not_found");
        assert_eq!(store.note_count(), 0);
    }

    #[test]
    fn create_note_with_unknown_problem_fails() {
        let store = RecordingStore::default().with_member(1);

        let err = service(&store)
            .create_note(MemberId::new(1), ProblemId::new(1000), "title", "content")
            .expect_err("missing problem must fail");

        assert!(matches!(
            err,
            NoteServiceError::NotFound(MissingEntity::Problem(id)) if id == ProblemId::new(1000)
        ));
        assert_eq!(store.save_calls.get(), 0);
        assert_eq!(store.note_count(), 0);
    }

    #[test]
    fn create_note_surfaces_store_failures() {
        let store = RecordingStore::default().with_member(1).with_problem(1000);
        store.fail_saves.set(true);

        let err = service(&store)
            .create_note(MemberId::new(1), ProblemId::new(1000), "title", "content")
            .expect_err("store failure must surface");

        assert!(matches!(err, NoteServiceError::Repo(RepoError::Db(_))));
        assert_eq!(store.note_count(), 0);
    }

    #[test]
    fn delete_own_note_deletes_exactly_once() {
        let store = RecordingStore::default().with_member(1).with_note(1000, 1);

        service(&store)
            .delete_note(MemberId::new(1), NoteId::new(1000))
            .expect("delete should succeed");

        assert_eq!(store.delete_calls.get(), 1);
        assert_eq!(store.note_count(), 0);
    }

    #[test]
    fn delete_by_unknown_member_leaves_note_untouched() {
        let store = RecordingStore::default().with_note(1000, 1);

        let err = service(&store)
            .delete_note(MemberId::new(1), NoteId::new(1000))
            .expect_err("missing member must fail");

        assert!(matches!(err, NoteServiceError::NotFound(MissingEntity::Member(_))));
        assert_eq!(store.delete_calls.get(), 0);
        assert_eq!(store.note_count(), 1);
    }

    #[test]
    fn delete_unknown_note_fails_with_note_not_found() {
        let store = RecordingStore::default().with_member(1);

        let err = service(&store)
            .delete_note(MemberId::new(1), NoteId::new(1000))
            .expect_err("missing note must fail");

        assert!(matches!(
            err,
            NoteServiceError::NotFound(MissingEntity::Note(id)) if id == NoteId::new(1000)
        ));
        assert_eq!(store.delete_calls.get(), 0);
    }

    #[test]
    fn second_delete_fails_instead_of_succeeding_silently() {
        let store = RecordingStore::default().with_member(1).with_note(1000, 1);
        let service = service(&store);

        service
            .delete_note(MemberId::new(1), NoteId::new(1000))
            .expect("first delete should succeed");
        let err = service
            .delete_note(MemberId::new(1), NoteId::new(1000))
            .expect_err("second delete must fail");

        assert_eq!(err.error_code(), "note_not_found");
        assert_eq!(store.delete_calls.get(), 1);
    }

    #[test]
    fn delete_by_other_member_is_forbidden() {
        let store = RecordingStore::default()
            .with_member(1)
            .with_member(2)
            .with_note(1000, 1);

        let err = service(&store)
            .delete_note(MemberId::new(2), NoteId::new(1000))
            .expect_err("non-author delete must fail");

        assert!(matches!(
            err,
            NoteServiceError::Forbidden { member_id, note_id }
                if member_id == MemberId::new(2) && note_id == NoteId::new(1000)
        ));
        assert_eq!(store.delete_calls.get(), 0);
        assert_eq!(store.note_count(), 1);
    }

    #[test]
    fn delete_racing_a_concurrent_delete_reports_note_not_found() {
        let store = RecordingStore::default().with_member(1).with_note(1000, 1);
        store.vanish_before_delete.set(true);

        let err = service(&store)
            .delete_note(MemberId::new(1), NoteId::new(1000))
            .expect_err("row removed underneath must fail");

        assert!(matches!(err, NoteServiceError::NotFound(MissingEntity::Note(_))));
    }

    #[test]
    fn failure_event_fields_name_the_ids_each_operation_carries() {
        let create = EventFields::Create {
            member_id: MemberId::new(1),
            problem_id: ProblemId::new(1000),
        };
        let delete = EventFields::Delete {
            member_id: MemberId::new(2),
            note_id: NoteId::new(7),
        };

        assert_eq!(create.to_string(), "member_id=1 problem_id=1000");
        assert_eq!(delete.to_string(), "member_id=2 note_id=7");
    }
}
