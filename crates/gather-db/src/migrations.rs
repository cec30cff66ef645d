use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE interests (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE COLLATE NOCASE,
                inside      INTEGER NOT NULL DEFAULT 0,
                outside     INTEGER NOT NULL DEFAULT 0,
                free        INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE groups (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE group_members (
                group_id    TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                joined_at   TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (group_id, user_id)
            );

            CREATE INDEX idx_group_members_user ON group_members(user_id);

            CREATE TABLE user_interests (
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                interest_id TEXT NOT NULL REFERENCES interests(id) ON DELETE CASCADE,
                PRIMARY KEY (user_id, interest_id)
            );

            CREATE TABLE events (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                group_id    TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
                end_date    TEXT NOT NULL,
                is_active   INTEGER NOT NULL DEFAULT 1,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_events_group ON events(group_id, end_date);

            CREATE TABLE votes (
                event_id    TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
                interest_id TEXT NOT NULL REFERENCES interests(id),
                votes_count INTEGER NOT NULL DEFAULT 0 CHECK (votes_count >= 0),
                PRIMARY KEY (event_id, interest_id)
            );

            CREATE TABLE user_event_status (
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                event_id    TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
                status      TEXT NOT NULL DEFAULT 'not-voted'
                            CHECK (status IN ('not-voted', 'voted', 'opt-out')),
                updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (user_id, event_id)
            );

            CREATE INDEX idx_user_event_status_event ON user_event_status(event_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }
}
