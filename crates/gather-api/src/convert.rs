//! Row → API model conversion. Stored ids and timestamps are trusted; a corrupt
//! value is logged and replaced with a default rather than failing the request.

use chrono::{DateTime, NaiveDateTime, Utc};
use gather_db::models::{EventRow, GroupRow, InterestRow, UserRow, VotableInterestRow};
use gather_types::models::{Event, Group, Interest, Member, User, VotableInterest};
use tracing::warn;
use uuid::Uuid;

pub(crate) fn parse_id(raw: &str, what: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} id '{}': {}", what, raw, e);
        Uuid::default()
    })
}

pub(crate) fn parse_timestamp(raw: &str, owner: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {}: {}", raw, owner, e);
            DateTime::default()
        })
}

pub(crate) fn user(row: UserRow) -> User {
    User {
        id: parse_id(&row.id, "user"),
        created_at: parse_timestamp(&row.created_at, &row.id),
        name: row.name,
        username: row.username,
    }
}

pub(crate) fn member(row: UserRow) -> Member {
    Member {
        id: parse_id(&row.id, "user"),
        name: row.name,
        username: row.username,
    }
}

pub(crate) fn interest(row: InterestRow) -> Interest {
    Interest {
        id: parse_id(&row.id, "interest"),
        name: row.name,
        inside: row.inside,
        outside: row.outside,
        free: row.free,
    }
}

pub(crate) fn group(row: GroupRow) -> Group {
    Group {
        id: parse_id(&row.id, "group"),
        created_at: parse_timestamp(&row.created_at, &row.id),
        name: row.name,
    }
}

pub(crate) fn event(row: EventRow) -> Event {
    Event {
        id: parse_id(&row.id, "event"),
        group_id: parse_id(&row.group_id, "group"),
        created_at: parse_timestamp(&row.created_at, &row.id),
        name: row.name,
        end_date: row.end_date,
        is_active: row.is_active,
    }
}

pub(crate) fn votable_interest(row: VotableInterestRow) -> VotableInterest {
    VotableInterest {
        interest: interest(row.interest),
        votes_count: row.votes_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_timestamps_parse_as_utc() {
        let ts = parse_timestamp("2026-10-18 09:30:00", "e1");
        assert_eq!(ts.to_rfc3339(), "2026-10-18T09:30:00+00:00");
    }

    #[test]
    fn corrupt_values_fall_back_to_defaults() {
        assert_eq!(parse_id("not-a-uuid", "event"), Uuid::default());
        assert_eq!(parse_timestamp("yesterday", "e1"), DateTime::<Utc>::default());
    }
}
