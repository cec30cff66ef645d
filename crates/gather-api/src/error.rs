use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gather_db::DbError;
use gather_types::api::MessageResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request fields
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    Unauthorized,

    /// A referenced event, group or user does not exist
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// The request clashes with current state
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] DbError),

    /// Failure outside the store, e.g. a blocking task that died
    #[error("Failed to {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::NOT_FOUND,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client. Store internals never leak.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(message) => message.clone(),
            ApiError::Unauthorized => "Invalid credentials".to_string(),
            ApiError::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            ApiError::Conflict(message) => message.clone(),
            ApiError::Store(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { table, .. } => match table.as_deref() {
                    Some("users") => "This username is already taken".to_string(),
                    Some("interests") => "An interest with this name already exists".to_string(),
                    Some("group_members") => "User is already a member of this group".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Referenced resource not found".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Internal server error".to_string(),
            },
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(DbError::Other(_)) | ApiError::Internal(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            ApiError::Store(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            ApiError::Conflict(_) => {
                tracing::warn!("Conflict error: {}", self);
            }
            ApiError::Validation(_) | ApiError::NotFound { .. } | ApiError::Unauthorized => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, Json(MessageResponse::new(self.user_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_do_not_leak_details() {
        let err = ApiError::Store(DbError::Other(anyhow::anyhow!(
            "disk I/O error at /var/lib/gather.db"
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Internal server error");
    }

    #[test]
    fn duplicate_interest_is_a_conflict() {
        let err = ApiError::Store(DbError::UniqueViolation {
            table: Some("interests".to_string()),
            message: "UNIQUE constraint failed: interests.name".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "An interest with this name already exists");
    }

    #[test]
    fn missing_reference_is_not_found() {
        let err = ApiError::Store(DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::not_found("Event", "e1").user_message(), "Event with ID e1 not found");
    }
}
