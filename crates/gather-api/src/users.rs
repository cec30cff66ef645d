use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use gather_types::api::{AddUserInterestsRequest, AddUserInterestsResponse, ProfileResponse, UserSearchQuery};
use gather_types::models::{Group, User};

use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, blocking};

/// GET /users: all users, or those whose username contains `?username=`.
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let users: Vec<User> = blocking(&state, move |db| {
        let fragment = query.username.as_deref().map(str::trim).filter(|f| !f.is_empty());
        Ok(db.search_users(fragment)?.into_iter().map(convert::user).collect())
    })
    .await?;

    Ok(Json(users))
}

/// POST /users/{user_id}/interests: pairs the user already holds are skipped.
pub async fn add_interests(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    WithRejection(Json(req), _): WithRejection<Json<AddUserInterestsRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let interest_ids: Vec<String> = req
        .interest_ids
        .ok_or_else(|| ApiError::Validation("Interest IDs are required and should be an array".to_string()))?
        .iter()
        .map(Uuid::to_string)
        .collect();

    let added = blocking(&state, move |db| {
        let uid = user_id.to_string();
        if db.get_user_by_id(&uid)?.is_none() {
            return Err(ApiError::not_found("User", &uid));
        }
        // Unknown interest ids fail the whole batch through the foreign key
        Ok(db.add_user_interests(&uid, &interest_ids)?)
    })
    .await?;

    Ok(Json(AddUserInterestsResponse { added }))
}

/// GET /profile/{user_id}
pub async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let profile = blocking(&state, move |db| {
        let uid = user_id.to_string();
        let user = db.get_user_by_id(&uid)?.ok_or_else(|| ApiError::not_found("User", &uid))?;
        let interests = db.get_user_interests(&uid)?;

        Ok(ProfileResponse {
            id: user_id,
            name: user.name,
            username: user.username,
            interests: interests.into_iter().map(convert::interest).collect(),
        })
    })
    .await?;

    Ok(Json(profile))
}

/// GET /users/{user_id}/groups
pub async fn groups(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let groups: Vec<Group> = blocking(&state, move |db| {
        Ok(db
            .get_groups_for_user(&user_id.to_string())?
            .into_iter()
            .map(convert::group)
            .collect())
    })
    .await?;

    Ok(Json(groups))
}
