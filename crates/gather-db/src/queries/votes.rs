use gather_types::models::VoteStatus;
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, Row};

use super::{OptionalExt, as_params, placeholders};
use crate::models::{InterestRow, StatusRow, VotableInterestRow};
use crate::{Database, Result};

impl Database {
    pub fn get_votable_interests(&self, event_id: &str) -> Result<Vec<VotableInterestRow>> {
        self.with_conn(|conn| votable_interests(conn, event_id))
    }

    pub fn get_statuses(&self, event_id: &str) -> Result<Vec<StatusRow>> {
        self.with_conn(|conn| statuses_for_event(conn, event_id))
    }
}

// -- Vote counters --

pub fn seed_vote(conn: &Connection, event_id: &str, interest_id: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO votes (event_id, interest_id, votes_count) VALUES (?1, ?2, 0)",
        (event_id, interest_id),
    )?;
    Ok(())
}

/// Add one to a counter in a single statement, so concurrent voters never
/// lose an update. Returns false when no counter exists for the pair.
pub fn increment_vote(conn: &Connection, event_id: &str, interest_id: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE votes SET votes_count = votes_count + 1 WHERE event_id = ?1 AND interest_id = ?2",
        (event_id, interest_id),
    )?;
    Ok(changed == 1)
}

pub fn votable_interests(conn: &Connection, event_id: &str) -> Result<Vec<VotableInterestRow>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.name, i.inside, i.outside, i.free, v.votes_count
         FROM votes v
         JOIN interests i ON i.id = v.interest_id
         WHERE v.event_id = ?1
         ORDER BY i.name",
    )?;
    let rows = stmt
        .query_map([event_id], |row| {
            Ok(VotableInterestRow {
                interest: InterestRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    inside: row.get(2)?,
                    outside: row.get(3)?,
                    free: row.get(4)?,
                },
                votes_count: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// -- Participation status --

pub fn seed_status(conn: &Connection, user_id: &str, event_id: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO user_event_status (user_id, event_id, status) VALUES (?1, ?2, ?3)",
        (user_id, event_id, VoteStatus::NotVoted.as_str()),
    )?;
    Ok(())
}

pub fn status_for(conn: &Connection, user_id: &str, event_id: &str) -> Result<Option<VoteStatus>> {
    conn.query_row(
        "SELECT status FROM user_event_status WHERE user_id = ?1 AND event_id = ?2",
        (user_id, event_id),
        |row| status_column(row, 0),
    )
    .optional()
}

/// Write a member's status, creating the row for members who joined after
/// the event was seeded.
pub fn set_status(conn: &Connection, user_id: &str, event_id: &str, status: VoteStatus) -> Result<()> {
    conn.execute(
        "INSERT INTO user_event_status (user_id, event_id, status) VALUES (?1, ?2, ?3)
         ON CONFLICT (user_id, event_id)
         DO UPDATE SET status = excluded.status, updated_at = datetime('now')",
        (user_id, event_id, status.as_str()),
    )?;
    Ok(())
}

pub fn statuses_for_event(conn: &Connection, event_id: &str) -> Result<Vec<StatusRow>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, event_id, status FROM user_event_status WHERE event_id = ?1 ORDER BY user_id",
    )?;
    let rows = stmt
        .query_map([event_id], status_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Status rows of one event, restricted to the given users.
pub fn statuses_for_users(conn: &Connection, event_id: &str, user_ids: &[String]) -> Result<Vec<StatusRow>> {
    if user_ids.is_empty() {
        return Ok(vec![]);
    }

    // ?1 is the event; user ids follow from ?2
    let sql = format!(
        "SELECT user_id, event_id, status FROM user_event_status
         WHERE event_id = ?1 AND user_id IN ({})",
        placeholders(2, user_ids.len())
    );
    let mut params = vec![&event_id as &dyn ToSql];
    params.extend(as_params(user_ids));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params.as_slice(), status_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn status_from_row(row: &Row<'_>) -> rusqlite::Result<StatusRow> {
    Ok(StatusRow {
        user_id: row.get(0)?,
        event_id: row.get(1)?,
        status: status_column(row, 2)?,
    })
}

fn status_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<VoteStatus> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;
    use crate::queries::{events, groups, interests};

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_user("u1", "Ada", "ada", "hash").unwrap();
        db.create_user("u2", "Grace", "grace", "hash").unwrap();
        db.create_group("g1", "climbers").unwrap();
        db.with_conn(|conn| {
            interests::insert_interest(conn, "i1", "hiking", false, true, true)?;
            groups::insert_member(conn, "g1", "u1")?;
            groups::insert_member(conn, "g1", "u2")?;
            events::insert_event(conn, "e1", "Saturday", "g1", "2026-11-01")?;
            seed_vote(conn, "e1", "i1")?;
            seed_status(conn, "u1", "e1")?;
            seed_status(conn, "u2", "e1")
        })
        .unwrap();
        db
    }

    #[test]
    fn increment_only_touches_seeded_counters() {
        let db = seeded();
        db.with_conn(|conn| {
            assert!(increment_vote(conn, "e1", "i1")?);
            assert!(increment_vote(conn, "e1", "i1")?);
            assert!(!increment_vote(conn, "e1", "unknown")?);
            Ok(())
        })
        .unwrap();

        let votable = db.get_votable_interests("e1").unwrap();
        assert_eq!(votable.len(), 1);
        assert_eq!(votable[0].votes_count, 2);
        assert_eq!(votable[0].interest.name, "hiking");
    }

    #[test]
    fn set_status_updates_and_upserts() {
        let db = seeded();
        db.create_user("u3", "Linus", "linus", "hash").unwrap();

        db.with_conn(|conn| {
            set_status(conn, "u1", "e1", VoteStatus::Voted)?;
            set_status(conn, "u3", "e1", VoteStatus::OptOut)
        })
        .unwrap();

        let statuses = db.get_statuses("e1").unwrap();
        let pairs: Vec<_> = statuses.iter().map(|s| (s.user_id.as_str(), s.status)).collect();
        assert_eq!(
            pairs,
            [
                ("u1", VoteStatus::Voted),
                ("u2", VoteStatus::NotVoted),
                ("u3", VoteStatus::OptOut),
            ]
        );
    }

    #[test]
    fn statuses_can_be_restricted_to_users() {
        let db = seeded();
        let rows = db
            .with_conn(|conn| statuses_for_users(conn, "e1", &["u2".to_string(), "nobody".to_string()]))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, "u2");
        assert_eq!(
            db.with_conn(|conn| status_for(conn, "u2", "e1")).unwrap(),
            Some(VoteStatus::NotVoted)
        );
    }

    #[test]
    fn counters_cannot_be_seeded_twice() {
        let db = seeded();
        let err = db.with_conn(|conn| seed_vote(conn, "e1", "i1")).unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
