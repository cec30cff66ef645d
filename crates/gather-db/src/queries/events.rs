use rusqlite::{Connection, Row};

use super::OptionalExt;
use crate::models::EventRow;
use crate::{Database, Result};

impl Database {
    pub fn get_event(&self, id: &str) -> Result<Option<EventRow>> {
        self.with_conn(|conn| event_by_id(conn, id))
    }

    pub fn get_events_for_group(&self, group_id: &str) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| events_for_group(conn, group_id))
    }
}

/// New events always start active.
pub fn insert_event(conn: &Connection, id: &str, name: &str, group_id: &str, end_date: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO events (id, name, group_id, end_date, is_active) VALUES (?1, ?2, ?3, ?4, 1)",
        (id, name, group_id, end_date),
    )?;
    Ok(())
}

pub fn event_by_id(conn: &Connection, id: &str) -> Result<Option<EventRow>> {
    conn.query_row(
        "SELECT id, name, group_id, end_date, is_active, created_at FROM events WHERE id = ?1",
        [id],
        event_from_row,
    )
    .optional()
}

pub fn events_for_group(conn: &Connection, group_id: &str) -> Result<Vec<EventRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, group_id, end_date, is_active, created_at
         FROM events
         WHERE group_id = ?1
         ORDER BY end_date, created_at",
    )?;
    let rows = stmt
        .query_map([group_id], event_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Flip an event to inactive. Only an active event matches, so this returns
/// true at most once per event.
pub fn deactivate_event(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE events SET is_active = 0 WHERE id = ?1 AND is_active = 1",
        [id],
    )?;
    Ok(changed == 1)
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        name: row.get(1)?,
        group_id: row.get(2)?,
        end_date: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
    })
}
