use rusqlite::Connection;
use tracing::debug;

use crate::models::UserRow;
use crate::{Database, Result};

/// Where the authorization service keeps accounts. `Database` is the
/// production implementation; tests may substitute their own.
pub trait CredentialStore: Send + Sync {
    /// Inserts a user and returns its generated id. A taken username is
    /// `DbError::Duplicate`.
    fn create_user(&self, name: &str, username: &str, password_hash: &str) -> Result<i64>;

    /// Looks a user up by username and password hash. No match is
    /// `DbError::NotFound`.
    fn get_user(&self, username: &str, password_hash: &str) -> Result<UserRow>;
}

impl CredentialStore for Database {
    fn create_user(&self, name: &str, username: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (name, username, password_hash) VALUES (?1, ?2, ?3)",
                (name, username, password_hash),
            )?;
            let id = conn.last_insert_rowid();
            debug!(user_id = id, username, "user created");
            Ok(id)
        })
    }

    fn get_user(&self, username: &str, password_hash: &str) -> Result<UserRow> {
        self.with_conn(|conn| query_user(conn, username, password_hash))
    }
}

fn query_user(conn: &Connection, username: &str, password_hash: &str) -> Result<UserRow> {
    let mut stmt = conn.prepare(
        "SELECT id, name, username, password_hash FROM users
         WHERE username = ?1 AND password_hash = ?2",
    )?;

    let row = stmt.query_row((username, password_hash), |row| {
        Ok(UserRow {
            id: row.get(0)?,
            name: row.get(1)?,
            username: row.get(2)?,
            password_hash: row.get(3)?,
        })
    })?;

    Ok(row)
}
