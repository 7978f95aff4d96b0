//! Note domain model.
//!
//! # Responsibility
//! - Define the unsaved (`NewNote`) and persisted (`Note`) note shapes.
//!
//! # Invariants
//! - `author_id` and `problem_id` are fixed at construction.
//! - Only the store turns a `NewNote` into a `Note`, assigning `id` and `audit`.

use crate::model::audit::AuditStamp;
use crate::model::ids::{MemberId, NoteId, ProblemId};
use crate::model::member::Member;
use crate::model::problem::Problem;
use serde::{Deserialize, Serialize};

/// Note that has been validated but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub author_id: MemberId,
    pub problem_id: ProblemId,
    pub title: String,
    pub content: String,
}

impl NewNote {
    /// Associates a resolved author and problem with the note text.
    ///
    /// Taking the entities rather than raw ids keeps construction behind a
    /// successful lookup of both.
    pub fn new(
        author: &Member,
        problem: &Problem,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author.id,
            problem_id: problem.id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Persisted note as returned by the note store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned id, stable for the note's lifetime.
    pub id: NoteId,
    pub author_id: MemberId,
    pub problem_id: ProblemId,
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub audit: AuditStamp,
}

impl Note {
    /// Builds the persisted record from an insert payload.
    pub fn from_new(id: NoteId, new_note: &NewNote, audit: AuditStamp) -> Self {
        Self {
            id,
            author_id: new_note.author_id,
            problem_id: new_note.problem_id,
            title: new_note.title.clone(),
            content: new_note.content.clone(),
            audit,
        }
    }

    /// Returns whether `member_id` authored this note.
    pub fn is_authored_by(&self, member_id: MemberId) -> bool {
        self.author_id == member_id
    }
}
