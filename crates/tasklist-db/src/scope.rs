//! Ownership predicates shared by every scoped statement.
//!
//! A user reaches a list through `users_lists` and an item through
//! `lists_items` -> `users_lists`. Statements embed these subqueries as
//! `id IN (...)` instead of loading rows and checking owners in Rust.
//! Placeholder numbers are passed in so callers can append the fragment after
//! their own positional parameters.

use rusqlite::{Connection, ToSql};

use crate::Result;

/// Ids of the lists owned by the user bound at `?{user}`.
pub(crate) fn owned_lists(user: usize) -> String {
    format!("SELECT ul.list_id FROM users_lists ul WHERE ul.user_id = ?{user}")
}

/// Ids of the items on list `?{list}`, provided that list is owned by the
/// user bound at `?{user}`.
pub(crate) fn owned_items(user: usize, list: usize) -> String {
    format!(
        "SELECT li.item_id FROM lists_items li \
         INNER JOIN users_lists ul ON ul.list_id = li.list_id \
         WHERE ul.user_id = ?{user} AND li.list_id = ?{list}"
    )
}

pub(crate) fn list_is_owned(conn: &Connection, user_id: i64, list_id: i64) -> Result<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM todo_lists WHERE id = ?1 AND id IN ({}))",
        owned_lists(2)
    );
    let owned = conn.query_row(&sql, (list_id, user_id), |row| row.get(0))?;
    Ok(owned)
}

/// Collects `column = ?N` assignments in call order together with their
/// bound values, then appends the trailing `WHERE` parameters.
pub(crate) struct Assignments<'a> {
    columns: Vec<String>,
    params: Vec<&'a dyn ToSql>,
}

impl<'a> Assignments<'a> {
    pub(crate) fn new() -> Self {
        Self {
            columns: Vec::new(),
            params: Vec::new(),
        }
    }

    pub(crate) fn set_if<T: ToSql + 'a>(&mut self, column: &str, value: &'a Option<T>) {
        if let Some(value) = value {
            let idx = self.bind(value);
            self.columns.push(format!("{column} = ?{idx}"));
        }
    }

    /// Binds a value and returns its placeholder number.
    pub(crate) fn bind(&mut self, value: &'a dyn ToSql) -> usize {
        self.params.push(value);
        self.params.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn clause(&self) -> String {
        self.columns.join(", ")
    }

    pub(crate) fn params(&self) -> &[&'a dyn ToSql] {
        &self.params
    }
}
