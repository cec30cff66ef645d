use rusqlite::ErrorCode;
use rusqlite::ffi;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

/// Store failures that callers can tell apart.
#[derive(Error, Debug)]
pub enum DbError {
    /// A single-row lookup matched nothing
    #[error("Entity not found")]
    NotFound,

    /// Unique or primary-key constraint violation
    #[error("Unique constraint violation: {message}")]
    UniqueViolation {
        table: Option<String>,
        message: String,
    },

    /// A referenced row does not exist
    #[error("Foreign key constraint violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound,
            rusqlite::Error::SqliteFailure(failure, msg)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let message = msg.clone().unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        DbError::UniqueViolation {
                            table: constraint_table(&message),
                            message,
                        }
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => DbError::ForeignKeyViolation { message },
                    ffi::SQLITE_CONSTRAINT_CHECK => DbError::CheckViolation { message },
                    _ => DbError::Other(err.into()),
                }
            }
            _ => DbError::Other(err.into()),
        }
    }
}

/// SQLite reports unique failures as `UNIQUE constraint failed: table.column[, ...]`.
fn constraint_table(message: &str) -> Option<String> {
    let (_, columns) = message.split_once(": ")?;
    let (table, _) = columns.split_once('.')?;
    Some(table.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_read_from_sqlite_message() {
        assert_eq!(
            constraint_table("UNIQUE constraint failed: interests.name").as_deref(),
            Some("interests")
        );
        assert_eq!(
            constraint_table("UNIQUE constraint failed: group_members.group_id, group_members.user_id")
                .as_deref(),
            Some("group_members")
        );
        assert_eq!(constraint_table("constraint failed"), None);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let err: DbError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DbError::NotFound));
    }
}
