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
        info!("Running migration v1 (users, lists, items)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                username        TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL
            );

            CREATE TABLE todo_lists (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE users_lists (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                list_id         INTEGER NOT NULL REFERENCES todo_lists(id) ON DELETE CASCADE
            );

            CREATE INDEX idx_users_lists_user ON users_lists(user_id, list_id);

            CREATE TABLE todo_items (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL DEFAULT '',
                done            INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE lists_items (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id         INTEGER NOT NULL REFERENCES todo_items(id) ON DELETE CASCADE,
                list_id         INTEGER NOT NULL REFERENCES todo_lists(id) ON DELETE CASCADE
            );

            CREATE INDEX idx_lists_items_list ON lists_items(list_id, item_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
