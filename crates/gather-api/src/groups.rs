use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use gather_types::api::{CreateGroupRequest, MembershipRequest, MembershipResponse, MessageResponse};
use gather_types::models::{Event, Interest, Member};

use crate::aggregator::interests_for_group;
use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, blocking};

pub async fn create_group(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateGroupRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::Validation("Group name is required".to_string()))?;

    let group_id = Uuid::new_v4();
    let group = blocking(&state, move |db| {
        let gid = group_id.to_string();
        db.create_group(&gid, &name)?;
        db.get_group(&gid)?.ok_or_else(|| ApiError::not_found("Group", &gid))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(convert::group(group))))
}

/// POST /group-members
pub async fn add_member(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<MembershipRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let (user_id, group_id) = membership_ids(&req)?;

    blocking(&state, move |db| {
        // Missing user or group surfaces as a foreign key violation (404);
        // an existing membership as a unique violation (409).
        Ok(db.add_member(&group_id.to_string(), &user_id.to_string())?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(MembershipResponse { user_id, group_id })))
}

/// DELETE /group-members
pub async fn remove_member(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<MembershipRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let (user_id, group_id) = membership_ids(&req)?;

    let removed = blocking(&state, move |db| {
        Ok(db.remove_member(&group_id.to_string(), &user_id.to_string())?)
    })
    .await?;

    if !removed {
        return Err(ApiError::not_found("Membership", format!("{}/{}", group_id, user_id)));
    }
    Ok(Json(MessageResponse::new("Left group successfully")))
}

/// GET /groups/{group_id}/members
pub async fn members(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let members: Vec<Member> = blocking(&state, move |db| {
        let gid = existing_group(db, group_id)?;
        Ok(db.get_members(&gid)?.into_iter().map(convert::member).collect())
    })
    .await?;

    Ok(Json(members))
}

/// GET /groups/{group_id}/events
pub async fn events(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let events: Vec<Event> = blocking(&state, move |db| {
        let gid = existing_group(db, group_id)?;
        Ok(db.get_events_for_group(&gid)?.into_iter().map(convert::event).collect())
    })
    .await?;

    Ok(Json(events))
}

/// GET /groups/{group_id}/interests and GET /events/{group_id}/interests:
/// the union of the members' interests.
pub async fn interests(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let interests: Vec<Interest> = blocking(&state, move |db| {
        let gid = existing_group(db, group_id)?;
        let rows = db.with_conn(|conn| interests_for_group(conn, &gid))?;
        Ok(rows.into_iter().map(convert::interest).collect())
    })
    .await?;

    Ok(Json(interests))
}

fn membership_ids(req: &MembershipRequest) -> ApiResult<(Uuid, Uuid)> {
    match (req.user_id, req.group_id) {
        (Some(user_id), Some(group_id)) => Ok((user_id, group_id)),
        _ => Err(ApiError::Validation(
            "User ID and Group ID are required".to_string(),
        )),
    }
}

fn existing_group(db: &gather_db::Database, group_id: Uuid) -> ApiResult<String> {
    let gid = group_id.to_string();
    match db.get_group(&gid)? {
        Some(_) => Ok(gid),
        None => Err(ApiError::not_found("Group", gid)),
    }
}
