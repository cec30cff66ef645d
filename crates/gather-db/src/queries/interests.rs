use rusqlite::{Connection, Row};

use super::{OptionalExt, as_params, placeholders};
use crate::models::InterestRow;
use crate::{Database, Result};

impl Database {
    /// Insert an interest. A name clash in any letter case surfaces as
    /// [`DbError::UniqueViolation`](crate::DbError::UniqueViolation) from the
    /// `COLLATE NOCASE` unique index; there is no separate pre-check.
    pub fn create_interest(
        &self,
        id: &str,
        name: &str,
        inside: bool,
        outside: bool,
        free: bool,
    ) -> Result<()> {
        self.with_conn(|conn| insert_interest(conn, id, name, inside, outside, free))
    }

    pub fn get_interest(&self, id: &str) -> Result<Option<InterestRow>> {
        self.with_conn(|conn| interest_by_id(conn, id))
    }

    pub fn list_interests(&self) -> Result<Vec<InterestRow>> {
        self.with_conn(list)
    }
}

pub fn insert_interest(
    conn: &Connection,
    id: &str,
    name: &str,
    inside: bool,
    outside: bool,
    free: bool,
) -> Result<()> {
    conn.execute(
        "INSERT INTO interests (id, name, inside, outside, free) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id, name, inside, outside, free],
    )?;
    Ok(())
}

pub fn interest_by_id(conn: &Connection, id: &str) -> Result<Option<InterestRow>> {
    conn.query_row(
        "SELECT id, name, inside, outside, free FROM interests WHERE id = ?1",
        [id],
        interest_from_row,
    )
    .optional()
}

fn list(conn: &Connection) -> Result<Vec<InterestRow>> {
    let mut stmt = conn.prepare("SELECT id, name, inside, outside, free FROM interests ORDER BY name")?;
    let rows = stmt
        .query_map([], interest_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Batch-fetch interests by id. Unknown ids are silently absent from the result.
pub fn interests_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<InterestRow>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT id, name, inside, outside, free FROM interests WHERE id IN ({}) ORDER BY name",
        placeholders(1, ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(as_params(ids).as_slice(), interest_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Distinct interest ids held by any of the given users.
pub fn interest_ids_for_users(conn: &Connection, user_ids: &[String]) -> Result<Vec<String>> {
    if user_ids.is_empty() {
        return Ok(vec![]);
    }

    let sql = format!(
        "SELECT DISTINCT interest_id FROM user_interests WHERE user_id IN ({})",
        placeholders(1, user_ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let ids = stmt
        .query_map(as_params(user_ids).as_slice(), |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn interest_from_row(row: &Row<'_>) -> rusqlite::Result<InterestRow> {
    Ok(InterestRow {
        id: row.get(0)?,
        name: row.get(1)?,
        inside: row.get(2)?,
        outside: row.get(3)?,
        free: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;

    #[test]
    fn names_are_unique_regardless_of_case() {
        let db = Database::open_in_memory().unwrap();
        db.create_interest("i1", "hiking", false, true, true).unwrap();

        let err = db.create_interest("i2", "HIKING", false, true, true).unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { table: Some(ref t), .. } if t == "interests"));
        assert_eq!(db.list_interests().unwrap().len(), 1);

        let stored = db.get_interest("i1").unwrap().unwrap();
        assert!(stored.outside && stored.free && !stored.inside);
        assert!(db.get_interest("i2").unwrap().is_none());
    }

    #[test]
    fn batch_lookup_ignores_unknown_ids() {
        let db = Database::open_in_memory().unwrap();
        db.create_interest("i1", "hiking", false, true, true).unwrap();
        db.create_interest("i2", "board games", true, false, false).unwrap();

        let rows = db
            .with_conn(|conn| {
                interests_by_ids(conn, &["i2".to_string(), "nope".to_string(), "i1".to_string()])
            })
            .unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["board games", "hiking"]);
    }
}
