use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use gather_types::api::CreateInterestRequest;
use gather_types::models::Interest;

use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, blocking};

/// POST /interests: names are stored lowercase; a name that differs from an
/// existing one only by case is a conflict.
pub async fn create_interest(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateInterestRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let name = req.name.as_deref().and_then(canonical_name);
    let (Some(name), Some(inside), Some(outside)) = (name, req.inside, req.outside) else {
        return Err(ApiError::Validation(
            "Name, inside, and outside are required".to_string(),
        ));
    };
    let interest = Interest {
        id: Uuid::new_v4(),
        name,
        inside,
        outside,
        free: req.free.unwrap_or(false),
    };

    let created = interest.clone();
    blocking(&state, move |db| {
        Ok(db.create_interest(
            &interest.id.to_string(),
            &interest.name,
            interest.inside,
            interest.outside,
            interest.free,
        )?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_interests(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let interests: Vec<Interest> = blocking(&state, |db| {
        Ok(db.list_interests()?.into_iter().map(convert::interest).collect())
    })
    .await?;

    Ok(Json(interests))
}

fn canonical_name(raw: &str) -> Option<String> {
    let name = raw.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_lowercased() {
        assert_eq!(canonical_name("  Rock Climbing ").as_deref(), Some("rock climbing"));
        assert_eq!(canonical_name("   "), None);
    }
}
