//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist, load and remove note rows by id.
//! - Run the audit pre-save hook on every write.
//!
//! # Invariants
//! - `created_at` is written once on insert; `modified_at` on every write.
//! - Author and problem references are never rewritten after insert.
//! - Deleting a row that is already gone reports `RepoError::NotFound`.

use crate::model::audit::{AuditStamp, Clock, SystemClock};
use crate::model::ids::NoteId;
use crate::model::note::{NewNote, Note};
use crate::repo::schema::{ensure_connection_ready, TableShape};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_TABLES: &[TableShape] = &[(
    "notes",
    &[
        "id",
        "member_id",
        "problem_id",
        "title",
        "content",
        "created_at",
        "modified_at",
    ],
)];

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    member_id,
    problem_id,
    title,
    content,
    created_at,
    modified_at
FROM notes";

/// Note store.
pub trait NoteRepository {
    /// Loads one note, or `None` when the id does not resolve.
    fn find_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Inserts a new note and returns it with id and audit stamp assigned.
    fn save_note(&self, note: &NewNote) -> RepoResult<Note>;
    /// Replaces title/content of an existing note and refreshes `modified_at`.
    fn update_note(&self, note: &Note) -> RepoResult<Note>;
    /// Removes the note row.
    fn delete_note(&self, note: &Note) -> RepoResult<()>;
}

impl<T: NoteRepository + ?Sized> NoteRepository for &T {
    fn find_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        (**self).find_note_by_id(id)
    }

    fn save_note(&self, note: &NewNote) -> RepoResult<Note> {
        (**self).save_note(note)
    }

    fn update_note(&self, note: &Note) -> RepoResult<Note> {
        (**self).update_note(note)
    }

    fn delete_note(&self, note: &Note) -> RepoResult<()> {
        (**self).delete_note(note)
    }
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn, C: Clock = SystemClock> {
    conn: &'conn Connection,
    clock: C,
}

impl<'conn> SqliteNoteRepository<'conn, SystemClock> {
    /// Creates repository from migrated connection using wall-clock stamps.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_clock(conn, SystemClock)
    }
}

impl<'conn, C: Clock> SqliteNoteRepository<'conn, C> {
    /// Creates repository with a caller-provided audit time source.
    pub fn with_clock(conn: &'conn Connection, clock: C) -> RepoResult<Self> {
        ensure_connection_ready(conn, NOTE_TABLES)?;
        Ok(Self { conn, clock })
    }
}

impl<C: Clock> NoteRepository for SqliteNoteRepository<'_, C> {
    fn find_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        load_note(self.conn, id)
    }

    fn save_note(&self, note: &NewNote) -> RepoResult<Note> {
        let audit = AuditStamp::on_insert(self.clock.now_ms());
        self.conn.execute(
            "INSERT INTO notes (
                member_id,
                problem_id,
                title,
                content,
                created_at,
                modified_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                note.author_id,
                note.problem_id,
                note.title.as_str(),
                note.content.as_str(),
                audit.created_at,
                audit.modified_at,
            ],
        )?;

        let id = NoteId::new(self.conn.last_insert_rowid());
        Ok(Note::from_new(id, note, audit))
    }

    fn update_note(&self, note: &Note) -> RepoResult<Note> {
        let tx = self.conn.unchecked_transaction()?;
        let stored = load_note(&tx, note.id)?.ok_or(RepoError::NotFound(note.id))?;
        let audit = stored.audit.touch(self.clock.now_ms());

        tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                modified_at = ?4
             WHERE id = ?1;",
            params![
                note.id,
                note.title.as_str(),
                note.content.as_str(),
                audit.modified_at,
            ],
        )?;
        tx.commit()?;

        Ok(Note {
            title: note.title.clone(),
            content: note.content.clone(),
            audit,
            ..stored
        })
    }

    fn delete_note(&self, note: &Note) -> RepoResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [note.id])?;
        if removed == 0 {
            return Err(RepoError::NotFound(note.id));
        }
        Ok(())
    }
}

fn load_note(conn: &Connection, id: NoteId) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let note = stmt.query_row([id], parse_note_row).optional()?;
    note.map(validate_note).transpose()
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        author_id: row.get("member_id")?,
        problem_id: row.get("problem_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        audit: AuditStamp {
            created_at: row.get("created_at")?,
            modified_at: row.get("modified_at")?,
        },
    })
}

fn validate_note(note: Note) -> RepoResult<Note> {
    if note.audit.modified_at < note.audit.created_at {
        return Err(RepoError::InvalidData(format!(
            "note {} has modified_at {} before created_at {}",
            note.id, note.audit.modified_at, note.audit.created_at
        )));
    }
    Ok(note)
}
