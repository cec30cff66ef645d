use std::collections::HashMap;

use gather_db::Connection;
use gather_db::models::{EventRow, StatusRow};
use gather_db::queries::{events, groups, votes};
use gather_types::models::VoteStatus;
use tracing::info;

use crate::error::{ApiError, ApiResult};

/// True when every current member holds a resolved status row.
///
/// Coverage is over `member_ids`, not over `statuses`: a member without a row
/// is still pending. Rows of users who are no longer members are ignored. An
/// empty membership is vacuously resolved.
pub fn all_resolved(member_ids: &[String], statuses: &[StatusRow]) -> bool {
    let by_user: HashMap<&str, VoteStatus> = statuses
        .iter()
        .map(|row| (row.user_id.as_str(), row.status))
        .collect();

    member_ids
        .iter()
        .all(|id| by_user.get(id.as_str()).is_some_and(|status| status.is_resolved()))
}

/// Resolve event → group → current members → their statuses, then apply
/// [`all_resolved`].
pub fn evaluate(conn: &Connection, event_id: &str) -> ApiResult<bool> {
    let event = events::event_by_id(conn, event_id)?.ok_or_else(|| ApiError::not_found("Event", event_id))?;
    resolved_for(conn, &event)
}

/// Close the event if everyone is resolved. Returns whether the event is
/// inactive afterwards. An inactive event is never re-evaluated.
pub fn close_if_resolved(conn: &Connection, event_id: &str) -> ApiResult<bool> {
    let event = events::event_by_id(conn, event_id)?.ok_or_else(|| ApiError::not_found("Event", event_id))?;
    if !event.is_active {
        return Ok(true);
    }
    if !resolved_for(conn, &event)? {
        return Ok(false);
    }

    if events::deactivate_event(conn, event_id)? {
        info!("Event {} closed: all members voted or opted out", event_id);
    }
    Ok(true)
}

fn resolved_for(conn: &Connection, event: &EventRow) -> ApiResult<bool> {
    let member_ids = groups::member_ids(conn, &event.group_id)?;
    let statuses = votes::statuses_for_users(conn, &event.id, &member_ids)?;
    Ok(all_resolved(&member_ids, &statuses))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: &str, status: VoteStatus) -> StatusRow {
        StatusRow {
            user_id: user.to_string(),
            event_id: "e1".to_string(),
            status,
        }
    }

    fn members(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pending_member_keeps_event_open() {
        let statuses = [row("u1", VoteStatus::Voted), row("u2", VoteStatus::NotVoted)];
        assert!(!all_resolved(&members(&["u1", "u2"]), &statuses));
    }

    #[test]
    fn voted_and_opted_out_members_resolve() {
        let statuses = [row("u1", VoteStatus::Voted), row("u2", VoteStatus::OptOut)];
        assert!(all_resolved(&members(&["u1", "u2"]), &statuses));
    }

    #[test]
    fn member_without_row_is_pending() {
        // u3 joined after the event was seeded
        let statuses = [row("u1", VoteStatus::Voted), row("u2", VoteStatus::OptOut)];
        assert!(!all_resolved(&members(&["u1", "u2", "u3"]), &statuses));
    }

    #[test]
    fn former_members_do_not_count() {
        let statuses = [row("u1", VoteStatus::Voted), row("gone", VoteStatus::NotVoted)];
        assert!(all_resolved(&members(&["u1"]), &statuses));
    }

    #[test]
    fn empty_group_is_vacuously_resolved() {
        assert!(all_resolved(&[], &[]));
    }
}
