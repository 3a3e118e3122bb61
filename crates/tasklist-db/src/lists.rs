use rusqlite::Row;
use tracing::debug;

use crate::models::{ListChanges, ListRow};
use crate::scope::{self, Assignments, owned_items, owned_lists};
use crate::{Database, DbError, Result};

impl Database {
    /// Inserts the list and its `users_lists` owner row in one transaction.
    pub fn create_list(&self, user_id: i64, title: &str, description: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO todo_lists (title, description) VALUES (?1, ?2)",
                (title, description),
            )?;
            let list_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO users_lists (user_id, list_id) VALUES (?1, ?2)",
                (user_id, list_id),
            )?;

            tx.commit()?;
            debug!(user_id, list_id, "list created");
            Ok(list_id)
        })
    }

    pub fn get_lists(&self, user_id: i64) -> Result<Vec<ListRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, title, description FROM todo_lists
                 WHERE id IN ({})
                 ORDER BY id",
                owned_lists(1)
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], list_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_list(&self, user_id: i64, list_id: i64) -> Result<ListRow> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, title, description FROM todo_lists
                 WHERE id = ?1 AND id IN ({})",
                owned_lists(2)
            );
            let row = conn.query_row(&sql, (list_id, user_id), list_from_row)?;
            Ok(row)
        })
    }

    /// Writes only the fields present in `changes`, in the order title,
    /// description. With nothing to write the call still checks ownership.
    pub fn update_list(&self, user_id: i64, list_id: i64, changes: &ListChanges) -> Result<()> {
        self.with_conn(|conn| {
            let mut set = Assignments::new();
            set.set_if("title", &changes.title);
            set.set_if("description", &changes.description);

            if set.is_empty() {
                return if scope::list_is_owned(conn, user_id, list_id)? {
                    Ok(())
                } else {
                    Err(DbError::NotFound)
                };
            }

            let id_idx = set.bind(&list_id);
            let user_idx = set.bind(&user_id);
            let sql = format!(
                "UPDATE todo_lists SET {} WHERE id = ?{id_idx} AND id IN ({})",
                set.clause(),
                owned_lists(user_idx)
            );

            let affected = conn.execute(&sql, set.params())?;
            if affected == 0 {
                return Err(DbError::NotFound);
            }

            debug!(user_id, list_id, "list updated");
            Ok(())
        })
    }

    /// Deletes the list together with the items attached to it.
    pub fn delete_list(&self, user_id: i64, list_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let items_sql = format!("DELETE FROM todo_items WHERE id IN ({})", owned_items(1, 2));
            let items = tx.execute(&items_sql, (user_id, list_id))?;

            let list_sql = format!(
                "DELETE FROM todo_lists WHERE id = ?1 AND id IN ({})",
                owned_lists(2)
            );
            let affected = tx.execute(&list_sql, (list_id, user_id))?;
            if affected == 0 {
                return Err(DbError::NotFound);
            }

            tx.commit()?;
            debug!(user_id, list_id, items, "list deleted");
            Ok(())
        })
    }
}

fn list_from_row(row: &Row<'_>) -> rusqlite::Result<ListRow> {
    Ok(ListRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CredentialStore;

    fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let alice = db.create_user("Alice", "alice", "a-hash").unwrap();
        let bob = db.create_user("Bob", "bob", "b-hash").unwrap();
        (db, alice, bob)
    }

    fn count(db: &Database, table: &str) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn create_and_read_back() {
        let (db, alice, _) = setup();
        let first = db.create_list(alice, "title1", "description1").unwrap();
        let second = db.create_list(alice, "title2", "description2").unwrap();

        let lists = db.get_lists(alice).unwrap();
        assert_eq!(lists.iter().map(|l| l.id).collect::<Vec<_>>(), vec![first, second]);

        let list = db.get_list(alice, second).unwrap();
        assert_eq!(list.title, "title2");
        assert_eq!(list.description, "description2");
    }

    #[test]
    fn other_users_see_nothing() {
        let (db, alice, bob) = setup();
        let id = db.create_list(alice, "t", "d").unwrap();

        assert!(db.get_lists(bob).unwrap().is_empty());
        assert!(matches!(db.get_list(bob, id), Err(DbError::NotFound)));
        assert!(matches!(
            db.update_list(bob, id, &ListChanges::new().title("stolen")),
            Err(DbError::NotFound)
        ));
        assert!(matches!(db.delete_list(bob, id), Err(DbError::NotFound)));

        assert_eq!(db.get_list(alice, id).unwrap().title, "t");
    }

    #[test]
    fn failed_owner_insert_rolls_back() {
        let (db, _, _) = setup();

        // No user 99, so the users_lists foreign key rejects the second insert.
        let err = db.create_list(99, "orphan", "").unwrap_err();
        assert!(matches!(err, DbError::Storage(_)), "got {err:?}");

        assert_eq!(count(&db, "todo_lists"), 0);
        assert_eq!(count(&db, "users_lists"), 0);
    }

    #[test]
    fn partial_update_touches_only_given_fields() {
        let (db, alice, _) = setup();
        let id = db.create_list(alice, "title", "description").unwrap();

        db.update_list(alice, id, &ListChanges::new().title("new title")).unwrap();
        let list = db.get_list(alice, id).unwrap();
        assert_eq!(list.title, "new title");
        assert_eq!(list.description, "description");

        db.update_list(alice, id, &ListChanges::new().description("")).unwrap();
        let list = db.get_list(alice, id).unwrap();
        assert_eq!(list.title, "new title");
        assert_eq!(list.description, "");
    }

    #[test]
    fn empty_title_is_written() {
        let (db, alice, _) = setup();
        let id = db.create_list(alice, "title", "description").unwrap();

        db.update_list(alice, id, &ListChanges::new().title("")).unwrap();
        let list = db.get_list(alice, id).unwrap();
        assert_eq!(list.title, "");
        assert_eq!(list.description, "description");
    }

    #[test]
    fn empty_update_checks_ownership_only() {
        let (db, alice, bob) = setup();
        let id = db.create_list(alice, "title", "description").unwrap();

        db.update_list(alice, id, &ListChanges::new()).unwrap();
        assert_eq!(db.get_list(alice, id).unwrap().title, "title");

        assert!(matches!(db.update_list(bob, id, &ListChanges::new()), Err(DbError::NotFound)));
        assert!(matches!(db.update_list(alice, 404, &ListChanges::new()), Err(DbError::NotFound)));
    }

    #[test]
    fn delete_takes_items_along() {
        let (db, alice, _) = setup();
        let id = db.create_list(alice, "groceries", "").unwrap();
        db.create_item(alice, id, "milk", "", false).unwrap();
        db.create_item(alice, id, "eggs", "", true).unwrap();

        db.delete_list(alice, id).unwrap();

        assert!(db.get_lists(alice).unwrap().is_empty());
        assert_eq!(count(&db, "todo_items"), 0);
        assert_eq!(count(&db, "lists_items"), 0);
        assert_eq!(count(&db, "users_lists"), 0);
        assert!(matches!(db.delete_list(alice, id), Err(DbError::NotFound)));
    }
}
