use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::{auth, events, groups, interests, users};

/// All REST routes. Layers (CORS, tracing) are added by the server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Users
        .route("/users", post(auth::register).get(users::search_users))
        .route("/login", post(auth::login))
        .route("/users/{user_id}/interests", post(users::add_interests))
        .route("/users/{user_id}/groups", get(users::groups))
        .route("/profile/{user_id}", get(users::profile))
        // Groups
        .route("/groups", post(groups::create_group))
        .route("/group-members", post(groups::add_member).delete(groups::remove_member))
        .route("/groups/{group_id}/members", get(groups::members))
        .route("/groups/{group_id}/events", get(groups::events))
        .route("/groups/{group_id}/interests", get(groups::interests))
        // Interests
        .route("/interests", post(interests::create_interest).get(interests::list_interests))
        // Events. The segment after /events is a group id for /interests and
        // an event id everywhere else; the router needs one name per position.
        .route("/events", post(events::create_event))
        .route("/events/{id}", get(events::get_event))
        .route("/events/{id}/interests", get(groups::interests))
        .route("/events/{id}/vote", get(events::votable_interests).post(events::submit_votes))
        .route("/events/{id}/optout", post(events::opt_out))
        .with_state(state)
}
