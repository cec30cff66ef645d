//! Query functions over a borrowed `&Connection`, so they compose inside a
//! [`Database::transaction`](crate::Database::transaction). Each submodule
//! also adds single-statement convenience methods to [`Database`](crate::Database).

pub mod events;
pub mod groups;
pub mod interests;
pub mod users;
pub mod votes;

use rusqlite::types::ToSql;

use crate::Result;

/// `?first, ... ?(first + count - 1)` for an `IN (...)` clause.
pub(crate) fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn as_params(values: &[String]) -> Vec<&dyn ToSql> {
    values.iter().map(|v| v as &dyn ToSql).collect()
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_numbered() {
        assert_eq!(placeholders(1, 3), "?1, ?2, ?3");
        assert_eq!(placeholders(2, 2), "?2, ?3");
    }
}
