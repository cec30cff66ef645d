use rusqlite::{Connection, Row};

use super::OptionalExt;
use crate::models::{GroupRow, UserRow};
use crate::queries::users::user_from_row;
use crate::{Database, Result};

impl Database {
    pub fn create_group(&self, id: &str, name: &str) -> Result<()> {
        self.with_conn(|conn| insert_group(conn, id, name))
    }

    pub fn get_group(&self, id: &str) -> Result<Option<GroupRow>> {
        self.with_conn(|conn| group_by_id(conn, id))
    }

    /// Adding an existing member is a unique violation on the membership key.
    pub fn add_member(&self, group_id: &str, user_id: &str) -> Result<()> {
        self.with_conn(|conn| insert_member(conn, group_id, user_id))
    }

    /// Returns false when the user was not a member.
    pub fn remove_member(&self, group_id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM group_members WHERE group_id = ?1 AND user_id = ?2",
                (group_id, user_id),
            )?;
            Ok(removed > 0)
        })
    }

    pub fn get_members(&self, group_id: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| members(conn, group_id))
    }

    pub fn get_groups_for_user(&self, user_id: &str) -> Result<Vec<GroupRow>> {
        self.with_conn(|conn| groups_for_user(conn, user_id))
    }
}

pub fn insert_group(conn: &Connection, id: &str, name: &str) -> Result<()> {
    conn.execute("INSERT INTO groups (id, name) VALUES (?1, ?2)", (id, name))?;
    Ok(())
}

pub fn group_by_id(conn: &Connection, id: &str) -> Result<Option<GroupRow>> {
    conn.query_row(
        "SELECT id, name, created_at FROM groups WHERE id = ?1",
        [id],
        group_from_row,
    )
    .optional()
}

pub fn insert_member(conn: &Connection, group_id: &str, user_id: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO group_members (group_id, user_id) VALUES (?1, ?2)",
        (group_id, user_id),
    )?;
    Ok(())
}

pub fn is_member(conn: &Connection, group_id: &str, user_id: &str) -> Result<bool> {
    let found: i64 = conn.query_row(
        "SELECT COUNT(*) FROM group_members WHERE group_id = ?1 AND user_id = ?2",
        (group_id, user_id),
        |row| row.get(0),
    )?;
    Ok(found > 0)
}

/// Current member user ids of a group. An unknown group has no members.
pub fn member_ids(conn: &Connection, group_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT user_id FROM group_members WHERE group_id = ?1 ORDER BY joined_at, user_id")?;
    let ids = stmt
        .query_map([group_id], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub fn members(conn: &Connection, group_id: &str) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name, u.username, u.password, u.created_at
         FROM users u
         JOIN group_members gm ON gm.user_id = u.id
         WHERE gm.group_id = ?1
         ORDER BY u.username",
    )?;
    let rows = stmt
        .query_map([group_id], user_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn groups_for_user(conn: &Connection, user_id: &str) -> Result<Vec<GroupRow>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name, g.created_at
         FROM groups g
         JOIN group_members gm ON gm.group_id = g.id
         WHERE gm.user_id = ?1
         ORDER BY g.name",
    )?;
    let rows = stmt
        .query_map([user_id], group_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<GroupRow> {
    Ok(GroupRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}
