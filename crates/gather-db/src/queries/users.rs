use rusqlite::{Connection, Row};

use super::OptionalExt;
use crate::models::{InterestRow, UserRow};
use crate::queries::interests::interest_from_row;
use crate::{Database, Result};

impl Database {
    pub fn create_user(&self, id: &str, name: &str, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| insert_user(conn, id, name, username, password_hash))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_id(conn, id))
    }

    pub fn search_users(&self, fragment: Option<&str>) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| search(conn, fragment))
    }

    /// Attach interests to a user, skipping pairs that already exist.
    /// Returns how many new pairs were stored.
    pub fn add_user_interests(&self, user_id: &str, interest_ids: &[String]) -> Result<usize> {
        self.transaction(|tx| insert_user_interests(tx, user_id, interest_ids))
    }

    pub fn get_user_interests(&self, user_id: &str) -> Result<Vec<InterestRow>> {
        self.with_conn(|conn| interests_for_user(conn, user_id))
    }
}

pub fn insert_user(
    conn: &Connection,
    id: &str,
    name: &str,
    username: &str,
    password_hash: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, username, password) VALUES (?1, ?2, ?3, ?4)",
        (id, name, username, password_hash),
    )?;
    Ok(())
}

pub fn user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    conn.query_row(
        "SELECT id, name, username, password, created_at FROM users WHERE username = ?1",
        [username],
        user_from_row,
    )
    .optional()
}

pub fn user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    conn.query_row(
        "SELECT id, name, username, password, created_at FROM users WHERE id = ?1",
        [id],
        user_from_row,
    )
    .optional()
}

fn search(conn: &Connection, fragment: Option<&str>) -> Result<Vec<UserRow>> {
    // LIKE is case-insensitive for ASCII in SQLite
    let pattern = format!("%{}%", fragment.unwrap_or_default());
    let mut stmt = conn.prepare(
        "SELECT id, name, username, password, created_at FROM users
         WHERE username LIKE ?1
         ORDER BY username",
    )?;
    let rows = stmt
        .query_map([pattern], user_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn insert_user_interests(conn: &Connection, user_id: &str, interest_ids: &[String]) -> Result<usize> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO user_interests (user_id, interest_id) VALUES (?1, ?2)")?;
    let mut added = 0;
    for interest_id in interest_ids {
        added += stmt.execute((user_id, interest_id))?;
    }
    Ok(added)
}

pub fn interests_for_user(conn: &Connection, user_id: &str) -> Result<Vec<InterestRow>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.name, i.inside, i.outside, i.free
         FROM interests i
         JOIN user_interests ui ON ui.interest_id = i.id
         WHERE ui.user_id = ?1
         ORDER BY i.name",
    )?;
    let rows = stmt
        .query_map([user_id], interest_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        created_at: row.get(4)?,
    })
}
