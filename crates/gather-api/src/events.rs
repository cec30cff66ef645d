use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use gather_types::api::{
    CreateEventRequest, CreateEventResponse, OptOutRequest, OptOutResponse, SubmitVotesRequest,
    SubmitVotesResponse,
};

use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::lifecycle::EventLifecycle;
use crate::state::{AppState, blocking};

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateEventRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let created = blocking(&state, move |db| EventLifecycle::new(db).create_event(&req)).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            id: created.id,
            is_active: created.is_active,
        }),
    ))
}

/// GET /events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let event = blocking(&state, move |db| {
        let eid = event_id.to_string();
        db.get_event(&eid)?.ok_or_else(|| ApiError::not_found("Event", &eid))
    })
    .await?;

    Ok(Json(convert::event(event)))
}

/// GET /events/{event_id}/vote: the event's votable interests with counts.
pub async fn votable_interests(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let interests = blocking(&state, move |db| EventLifecycle::new(db).votable_interests(event_id)).await?;
    Ok(Json(interests))
}

/// POST /events/{event_id}/vote
pub async fn submit_votes(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    WithRejection(Json(req), _): WithRejection<Json<SubmitVotesRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let ballot = blocking(&state, move |db| EventLifecycle::new(db).submit_votes(event_id, &req)).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitVotesResponse {
            message: "Votes submitted successfully".to_string(),
            results: ballot.results,
            event_closed: ballot.event_closed,
        }),
    ))
}

/// POST /events/{event_id}/optout
pub async fn opt_out(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    WithRejection(Json(req), _): WithRejection<Json<OptOutRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let event_closed = blocking(&state, move |db| EventLifecycle::new(db).opt_out(event_id, &req)).await?;

    Ok(Json(OptOutResponse {
        message: "Opted out of event".to_string(),
        event_closed,
    }))
}
