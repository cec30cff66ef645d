pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;

use rusqlite::TransactionBehavior;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub use error::{DbError, Result};
pub use rusqlite::{Connection, Transaction};

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let db = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// A private, throwaway database. Used by tests in place of a file-backed store.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run `f` inside an immediate transaction. Commits on `Ok`, rolls back on `Err`.
    ///
    /// The error type is the caller's so that domain failures discovered half-way
    /// (a closed event, a missing member) also roll back the writes made so far.
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DbError::from(anyhow::anyhow!("DB lock poisoned: {}", e)))?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        let value = f(&tx)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();

        let result: Result<()> = db.transaction(|tx| {
            queries::groups::insert_group(tx, "g1", "climbers")?;
            Err(DbError::NotFound)
        });
        assert!(matches!(result, Err(DbError::NotFound)));

        let group = db.with_conn(|conn| queries::groups::group_by_id(conn, "g1")).unwrap();
        assert!(group.is_none());
    }

    #[test]
    fn committed_transaction_is_visible() {
        let db = Database::open_in_memory().unwrap();

        db.transaction(|tx| queries::groups::insert_group(tx, "g1", "climbers"))
            .unwrap();

        let group = db.with_conn(|conn| queries::groups::group_by_id(conn, "g1")).unwrap();
        assert_eq!(group.unwrap().name, "climbers");
    }
}
