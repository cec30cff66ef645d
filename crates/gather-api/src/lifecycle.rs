//! Event lifecycle: creation with vote/status seeding, ballots, opt-outs and
//! the single active → inactive transition.
//!
//! Every operation runs in one store transaction. A failure part-way rolls
//! back everything the operation wrote, so no caller ever sees a half-seeded
//! event or a half-counted ballot.

use gather_db::queries::{events, groups, votes};
use gather_db::{Connection, Database};
use gather_types::api::{CreateEventRequest, OptOutRequest, SubmitVotesRequest, VoteOutcome, VoteResult};
use gather_types::models::{VotableInterest, VoteStatus};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregator::interests_for_group;
use crate::closure;
use crate::convert;
use crate::error::{ApiError, ApiResult};

#[derive(Debug)]
pub struct CreatedEvent {
    pub id: Uuid,
    pub interest_count: usize,
    pub member_count: usize,
    pub is_active: bool,
}

/// Per-entry outcome of a ballot plus whether it closed the event.
#[derive(Debug)]
pub struct Ballot {
    pub results: Vec<VoteResult>,
    pub event_closed: bool,
}

pub struct EventLifecycle<'a> {
    db: &'a Database,
}

impl<'a> EventLifecycle<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an active event and seed one zero counter per group interest and
    /// one `not-voted` status per current member.
    ///
    /// A group without members has nobody left to wait for, so its event is
    /// closed before the transaction commits.
    pub fn create_event(&self, req: &CreateEventRequest) -> ApiResult<CreatedEvent> {
        let (Some(name), Some(group_id), Some(end_date)) = (
            present(req.name.as_deref()),
            req.group_id,
            present(req.end_date.as_deref()),
        ) else {
            return Err(ApiError::Validation(
                "Event name, group ID and end date are required".to_string(),
            ));
        };

        let event_id = Uuid::new_v4();
        let eid = event_id.to_string();
        let gid = group_id.to_string();

        let created = self.db.transaction(|tx| -> ApiResult<CreatedEvent> {
            if groups::group_by_id(tx, &gid)?.is_none() {
                return Err(ApiError::not_found("Group", &gid));
            }

            events::insert_event(tx, &eid, name, &gid, end_date)?;

            let interests = interests_for_group(tx, &gid)?;
            for interest in &interests {
                votes::seed_vote(tx, &eid, &interest.id)?;
            }

            let members = groups::member_ids(tx, &gid)?;
            for user_id in &members {
                votes::seed_status(tx, user_id, &eid)?;
            }

            let closed = closure::close_if_resolved(tx, &eid)?;

            Ok(CreatedEvent {
                id: event_id,
                interest_count: interests.len(),
                member_count: members.len(),
                is_active: !closed,
            })
        })?;

        info!(
            "Event {} created for group {}: {} interests, {} members",
            event_id, group_id, created.interest_count, created.member_count
        );
        Ok(created)
    }

    /// Count a ballot: each listed interest gains one vote per occurrence.
    ///
    /// Interests that were not seeded for the event are skipped and reported
    /// as [`VoteOutcome::NotVotable`]. Any store failure aborts the whole
    /// ballot.
    pub fn submit_votes(&self, event_id: Uuid, req: &SubmitVotesRequest) -> ApiResult<Ballot> {
        let Some(entries) = req.votes.as_deref() else {
            return Err(ApiError::Validation(
                "Votes are required and should be an array".to_string(),
            ));
        };
        let user_id = req
            .user_id
            .ok_or_else(|| ApiError::Validation("User ID is required".to_string()))?;

        let eid = event_id.to_string();
        let uid = user_id.to_string();

        let ballot = self.db.transaction(|tx| -> ApiResult<Ballot> {
            let current = participant_status(tx, &eid, &uid)?;
            if current == Some(VoteStatus::OptOut) {
                return Err(ApiError::Conflict(
                    "User has already opted out of this event".to_string(),
                ));
            }

            let mut results = Vec::with_capacity(entries.len());
            for interest_id in entries {
                let outcome = if votes::increment_vote(tx, &eid, &interest_id.to_string())? {
                    VoteOutcome::Counted
                } else {
                    warn!("Interest {} is not votable in event {}; skipped", interest_id, eid);
                    VoteOutcome::NotVotable
                };
                results.push(VoteResult {
                    interest_id: *interest_id,
                    outcome,
                });
            }

            votes::set_status(tx, &uid, &eid, VoteStatus::Voted)?;
            let event_closed = closure::close_if_resolved(tx, &eid)?;

            Ok(Ballot {
                results,
                event_closed,
            })
        })?;

        debug!(
            "User {} voted in event {} ({} entries)",
            user_id,
            event_id,
            ballot.results.len()
        );
        Ok(ballot)
    }

    /// Record that a member will not vote. Returns whether the event is now closed.
    pub fn opt_out(&self, event_id: Uuid, req: &OptOutRequest) -> ApiResult<bool> {
        let user_id = req
            .user_id
            .ok_or_else(|| ApiError::Validation("User ID is required".to_string()))?;

        let eid = event_id.to_string();
        let uid = user_id.to_string();

        let closed = self.db.transaction(|tx| -> ApiResult<bool> {
            let current = participant_status(tx, &eid, &uid)?;
            if current == Some(VoteStatus::Voted) {
                return Err(ApiError::Conflict("User has already voted in this event".to_string()));
            }

            votes::set_status(tx, &uid, &eid, VoteStatus::OptOut)?;
            closure::close_if_resolved(tx, &eid)
        })?;

        debug!("User {} opted out of event {}", user_id, event_id);
        Ok(closed)
    }

    /// The interests seeded for the event, with their current counts.
    pub fn votable_interests(&self, event_id: Uuid) -> ApiResult<Vec<VotableInterest>> {
        let eid = event_id.to_string();
        let rows = self.db.transaction(|tx| -> ApiResult<_> {
            if events::event_by_id(tx, &eid)?.is_none() {
                return Err(ApiError::not_found("Event", &eid));
            }
            Ok(votes::votable_interests(tx, &eid)?)
        })?;

        Ok(rows.into_iter().map(convert::votable_interest).collect())
    }

    pub fn all_resolved(&self, event_id: Uuid) -> ApiResult<bool> {
        let eid = event_id.to_string();
        self.db.transaction(|tx| closure::evaluate(tx, &eid))
    }
}

/// Current status of a would-be voter, after checking the event accepts
/// ballots and the user may take part.
///
/// A user may take part if they hold a status row for the event or are a
/// current member of its group (members who joined after seeding have no row
/// yet).
fn participant_status(conn: &Connection, event_id: &str, user_id: &str) -> ApiResult<Option<VoteStatus>> {
    let event = events::event_by_id(conn, event_id)?.ok_or_else(|| ApiError::not_found("Event", event_id))?;
    if !event.is_active {
        return Err(ApiError::Conflict(format!("Event {} is closed", event_id)));
    }

    let status = votes::status_for(conn, user_id, event_id)?;
    if status.is_none() && !groups::is_member(conn, &event.group_id, user_id)? {
        return Err(ApiError::not_found("Participant", user_id));
    }
    Ok(status)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
