use rusqlite::Row;
use tracing::debug;

use crate::models::{ItemChanges, ItemRow};
use crate::scope::{self, Assignments, owned_items};
use crate::{Database, DbError, Result};

impl Database {
    /// Inserts the item and its `lists_items` row in one transaction. The
    /// list must be owned by `user_id`, otherwise nothing is written and the
    /// call fails with `NotFound`.
    pub fn create_item(
        &self,
        user_id: i64,
        list_id: i64,
        title: &str,
        description: &str,
        done: bool,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if !scope::list_is_owned(&tx, user_id, list_id)? {
                return Err(DbError::NotFound);
            }

            tx.execute(
                "INSERT INTO todo_items (title, description, done) VALUES (?1, ?2, ?3)",
                (title, description, done),
            )?;
            let item_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO lists_items (list_id, item_id) VALUES (?1, ?2)",
                (list_id, item_id),
            )?;

            tx.commit()?;
            debug!(user_id, list_id, item_id, "item created");
            Ok(item_id)
        })
    }

    /// Items on the list, empty when the list is missing or not the user's.
    pub fn get_items(&self, user_id: i64, list_id: i64) -> Result<Vec<ItemRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, title, description, done FROM todo_items
                 WHERE id IN ({})
                 ORDER BY id",
                owned_items(1, 2)
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map((user_id, list_id), item_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_item(&self, user_id: i64, list_id: i64, item_id: i64) -> Result<ItemRow> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, title, description, done FROM todo_items
                 WHERE id = ?1 AND id IN ({})",
                owned_items(2, 3)
            );
            let row = conn.query_row(&sql, (item_id, user_id, list_id), item_from_row)?;
            Ok(row)
        })
    }

    /// Writes only the fields present in `changes`, in the order title,
    /// description, done. With nothing to write the call still checks that
    /// the item is reachable.
    pub fn update_item(
        &self,
        user_id: i64,
        list_id: i64,
        item_id: i64,
        changes: &ItemChanges,
    ) -> Result<()> {
        self.with_conn(|conn| {
            let mut set = Assignments::new();
            set.set_if("title", &changes.title);
            set.set_if("description", &changes.description);
            set.set_if("done", &changes.done);

            if set.is_empty() {
                let sql = format!(
                    "SELECT EXISTS(SELECT 1 FROM todo_items WHERE id = ?1 AND id IN ({}))",
                    owned_items(2, 3)
                );
                let found: bool = conn.query_row(&sql, (item_id, user_id, list_id), |r| r.get(0))?;
                return if found { Ok(()) } else { Err(DbError::NotFound) };
            }

            let id_idx = set.bind(&item_id);
            let user_idx = set.bind(&user_id);
            let list_idx = set.bind(&list_id);
            let sql = format!(
                "UPDATE todo_items SET {} WHERE id = ?{id_idx} AND id IN ({})",
                set.clause(),
                owned_items(user_idx, list_idx)
            );

            let affected = conn.execute(&sql, set.params())?;
            if affected == 0 {
                return Err(DbError::NotFound);
            }

            debug!(user_id, list_id, item_id, "item updated");
            Ok(())
        })
    }

    pub fn delete_item(&self, user_id: i64, list_id: i64, item_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let sql = format!(
                "DELETE FROM todo_items WHERE id = ?1 AND id IN ({})",
                owned_items(2, 3)
            );
            let affected = conn.execute(&sql, (item_id, user_id, list_id))?;
            if affected == 0 {
                return Err(DbError::NotFound);
            }

            debug!(user_id, list_id, item_id, "item deleted");
            Ok(())
        })
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        done: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CredentialStore;

    struct Fixture {
        db: Database,
        alice: i64,
        bob: i64,
        list: i64,
    }

    fn setup() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let alice = db.create_user("Alice", "alice", "a-hash").unwrap();
        let bob = db.create_user("Bob", "bob", "b-hash").unwrap();
        let list = db.create_list(alice, "groceries", "weekly").unwrap();
        Fixture { db, alice, bob, list }
    }

    #[test]
    fn create_and_read_back() {
        let f = setup();
        let milk = f.db.create_item(f.alice, f.list, "milk", "2l", false).unwrap();
        let eggs = f.db.create_item(f.alice, f.list, "eggs", "", true).unwrap();

        let items = f.db.get_items(f.alice, f.list).unwrap();
        assert_eq!(
            items,
            vec![
                ItemRow { id: milk, title: "milk".into(), description: "2l".into(), done: false },
                ItemRow { id: eggs, title: "eggs".into(), description: "".into(), done: true },
            ]
        );

        assert_eq!(f.db.get_item(f.alice, f.list, eggs).unwrap().title, "eggs");
    }

    #[test]
    fn list_of_another_user_is_not_found() {
        let f = setup();

        let err = f.db.create_item(f.bob, f.list, "sneaky", "", false).unwrap_err();
        assert!(matches!(err, DbError::NotFound), "got {err:?}");

        let total: i64 = f
            .db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM todo_items", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn other_users_see_nothing() {
        let f = setup();
        let id = f.db.create_item(f.alice, f.list, "milk", "", false).unwrap();

        assert!(f.db.get_items(f.bob, f.list).unwrap().is_empty());
        assert!(matches!(f.db.get_item(f.bob, f.list, id), Err(DbError::NotFound)));
        assert!(matches!(
            f.db.update_item(f.bob, f.list, id, &ItemChanges::new().done(true)),
            Err(DbError::NotFound)
        ));
        assert!(matches!(f.db.delete_item(f.bob, f.list, id), Err(DbError::NotFound)));

        assert!(!f.db.get_item(f.alice, f.list, id).unwrap().done);
    }

    #[test]
    fn item_is_scoped_to_its_list() {
        let f = setup();
        let other_list = f.db.create_list(f.alice, "chores", "").unwrap();
        let id = f.db.create_item(f.alice, f.list, "milk", "", false).unwrap();

        assert!(matches!(f.db.get_item(f.alice, other_list, id), Err(DbError::NotFound)));
        assert!(f.db.get_items(f.alice, other_list).unwrap().is_empty());
    }

    #[test]
    fn partial_update_touches_only_given_fields() {
        let f = setup();
        let id = f.db.create_item(f.alice, f.list, "title", "description", false).unwrap();

        f.db.update_item(f.alice, f.list, id, &ItemChanges::new().title("new title")).unwrap();
        let item = f.db.get_item(f.alice, f.list, id).unwrap();
        assert_eq!(item.title, "new title");
        assert_eq!(item.description, "description");
        assert!(!item.done);

        let all = ItemChanges::new().title("t").description("d").done(true);
        f.db.update_item(f.alice, f.list, id, &all).unwrap();
        let item = f.db.get_item(f.alice, f.list, id).unwrap();
        assert_eq!(item, ItemRow { id, title: "t".into(), description: "d".into(), done: true });
    }

    #[test]
    fn empty_update_checks_reachability_only() {
        let f = setup();
        let id = f.db.create_item(f.alice, f.list, "milk", "", false).unwrap();

        f.db.update_item(f.alice, f.list, id, &ItemChanges::new()).unwrap();
        assert!(matches!(
            f.db.update_item(f.bob, f.list, id, &ItemChanges::new()),
            Err(DbError::NotFound)
        ));
    }

    #[test]
    fn delete_removes_junction_row() {
        let f = setup();
        let id = f.db.create_item(f.alice, f.list, "milk", "", false).unwrap();

        f.db.delete_item(f.alice, f.list, id).unwrap();
        assert!(f.db.get_items(f.alice, f.list).unwrap().is_empty());

        let links: i64 = f
            .db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM lists_items", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(links, 0);
        assert!(matches!(f.db.delete_item(f.alice, f.list, id), Err(DbError::NotFound)));
    }
}
