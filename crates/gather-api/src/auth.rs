use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use gather_types::api::{CreateUserRequest, CreateUserResponse, LoginRequest, LoginResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, blocking};

/// POST /users: the username must be unused; the password is stored as an
/// Argon2id hash.
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let (Some(name), Some(username), Some(password)) = (req.name, req.username, req.password) else {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    };
    if name.trim().is_empty() || username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::Validation("Missing required fields".to_string()));
    }

    let user_id = Uuid::new_v4();
    blocking(&state, move |db| {
        let password_hash = hash_password(&password)?;
        // Uniqueness is left to the users.username constraint
        db.create_user(&user_id.to_string(), name.trim(), username.trim(), &password_hash)?;
        Ok(())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreateUserResponse { id: user_id })))
}

/// POST /login: returns the user id on a matching password.
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    };

    let user_id = blocking(&state, move |db| {
        let user = db.get_user_by_username(username.trim())?.ok_or(ApiError::Unauthorized)?;
        verify_password(&password, &user.password)?;
        user.id
            .parse::<Uuid>()
            .map_err(|e| ApiError::Internal(format!("parse stored user id: {}", e)))
    })
    .await?;

    Ok(Json(LoginResponse { user_id }))
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("hash password: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> ApiResult<()> {
    let parsed_hash =
        PasswordHash::new(stored).map_err(|e| ApiError::Internal(format!("parse password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();
        assert_ne!(first, second);
        assert!(!first.contains("correct horse"));

        verify_password("correct horse", &first).unwrap();
        assert!(matches!(
            verify_password("battery staple", &first),
            Err(ApiError::Unauthorized)
        ));
    }
}
