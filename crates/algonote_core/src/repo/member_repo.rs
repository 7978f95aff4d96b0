//! Member repository contract and SQLite implementation.

use crate::model::ids::MemberId;
use crate::model::member::Member;
use crate::repo::schema::{ensure_connection_ready, TableShape};
use crate::repo::RepoResult;
use rusqlite::{Connection, OptionalExtension};

const MEMBER_TABLES: &[TableShape] = &[("members", &["id", "nickname"])];

/// Member account store.
pub trait MemberRepository {
    /// Registers a member and returns it with its store-assigned id.
    fn create_member(&self, nickname: &str) -> RepoResult<Member>;
    /// Loads one member, or `None` when the id does not resolve.
    fn find_member_by_id(&self, id: MemberId) -> RepoResult<Option<Member>>;
}

impl<T: MemberRepository + ?Sized> MemberRepository for &T {
    fn create_member(&self, nickname: &str) -> RepoResult<Member> {
        (**self).create_member(nickname)
    }

    fn find_member_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        (**self).find_member_by_id(id)
    }
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, MEMBER_TABLES)?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, nickname: &str) -> RepoResult<Member> {
        self.conn
            .execute("INSERT INTO members (nickname) VALUES (?1);", [nickname])?;
        Ok(Member {
            id: MemberId::new(self.conn.last_insert_rowid()),
            nickname: nickname.to_string(),
        })
    }

    fn find_member_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                "SELECT id, nickname FROM members WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Member {
                        id: row.get("id")?,
                        nickname: row.get("nickname")?,
                    })
                },
            )
            .optional()?;
        Ok(member)
    }
}
