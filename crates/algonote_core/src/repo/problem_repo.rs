//! Problem catalog repository contract and SQLite implementation.

use crate::model::ids::ProblemId;
use crate::model::problem::Problem;
use crate::repo::schema::{ensure_connection_ready, TableShape};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

const PROBLEM_TABLES: &[TableShape] = &[("problems", &["id", "title"])];

/// Problem catalog store.
pub trait ProblemRepository {
    /// Adds a catalog entry under its catalog number.
    ///
    /// Registering an id twice is a storage error.
    fn register_problem(&self, id: ProblemId, title: &str) -> RepoResult<Problem>;
    /// Loads one problem, or `None` when the id does not resolve.
    fn find_problem_by_id(&self, id: ProblemId) -> RepoResult<Option<Problem>>;
}

impl<T: ProblemRepository + ?Sized> ProblemRepository for &T {
    fn register_problem(&self, id: ProblemId, title: &str) -> RepoResult<Problem> {
        (**self).register_problem(id, title)
    }

    fn find_problem_by_id(&self, id: ProblemId) -> RepoResult<Option<Problem>> {
        (**self).find_problem_by_id(id)
    }
}

/// SQLite-backed problem repository.
pub struct SqliteProblemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProblemRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, PROBLEM_TABLES)?;
        Ok(Self { conn })
    }
}

impl ProblemRepository for SqliteProblemRepository<'_> {
    fn register_problem(&self, id: ProblemId, title: &str) -> RepoResult<Problem> {
        self.conn.execute(
            "INSERT INTO problems (id, title) VALUES (?1, ?2);",
            params![id, title],
        )?;
        Ok(Problem {
            id,
            title: title.to_string(),
        })
    }

    fn find_problem_by_id(&self, id: ProblemId) -> RepoResult<Option<Problem>> {
        let problem = self
            .conn
            .query_row(
                "SELECT id, title FROM problems WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Problem {
                        id: row.get("id")?,
                        title: row.get("title")?,
                    })
                },
            )
            .optional()?;
        Ok(problem)
    }
}
