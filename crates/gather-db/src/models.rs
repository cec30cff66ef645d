//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the gather-types API models so the store stays independent.

use gather_types::models::VoteStatus;

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct InterestRow {
    pub id: String,
    pub name: String,
    pub inside: bool,
    pub outside: bool,
    pub free: bool,
}

pub struct GroupRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

pub struct EventRow {
    pub id: String,
    pub name: String,
    pub group_id: String,
    pub end_date: String,
    pub is_active: bool,
    pub created_at: String,
}

/// A `votes` row joined with its interest.
pub struct VotableInterestRow {
    pub interest: InterestRow,
    pub votes_count: i64,
}

pub struct StatusRow {
    pub user_id: String,
    pub event_id: String,
    pub status: VoteStatus,
}
