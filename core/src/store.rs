//! Persistence gateway for client records.
//!
//! # Design
//! `ClientStore` is the only component that owns client storage. The SQLite
//! implementation keeps one connection behind a mutex and stores the
//! attribute map as a JSON text column next to an autoincrement id, so ids
//! are never handed out twice even after deletes.
//!
//! Concurrent writers to the same id are ordered by the mutex; whichever
//! statement runs last wins.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::model::{Client, ClientDraft, ClientFields, ClientId, FieldValue, ID_FIELD};

const CLIENT_TABLE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS client (id INTEGER PRIMARY KEY AUTOINCREMENT, fields TEXT NOT NULL)";

/// CRUD access to client records keyed by id.
pub trait ClientStore: Send + Sync {
    /// Returns every stored client in ascending id order.
    fn list(&self) -> Result<Vec<Client>, StoreError>;

    /// Returns the client with the given id.
    /// Returns None if the client does not exist.
    fn get(&self, id: ClientId) -> Result<Option<Client>, StoreError>;

    /// Persists a new client under a freshly assigned id and returns it.
    fn create(&self, draft: ClientDraft) -> Result<Client, StoreError>;

    /// Replaces all fields of an existing client.
    /// Returns false, without creating anything, if the client does not exist.
    fn update(&self, id: ClientId, draft: &ClientDraft) -> Result<bool, StoreError>;

    /// Removes a client.
    /// Returns false if there was nothing to remove.
    fn delete(&self, id: ClientId) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct SqliteClientStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteClientStore {
    /// Opens (or creates) the database file at `db_path`.
    ///
    /// SQLite treats the path `:memory:` as a private in-memory database.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        info!("Opening SQLite client store at {:?}", db_path);
        Self::bootstrap(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        debug!("Opening in-memory SQLite client store");
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(CLIENT_TABLE_SCHEMA, [])?;
        Ok(SqliteClientStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// `id` lives in its own column, never inside the encoded attributes.
fn encode_fields(fields: &ClientFields) -> Result<String, StoreError> {
    let stored: BTreeMap<&str, &FieldValue> = fields
        .iter()
        .filter(|(name, _)| name.as_str() != ID_FIELD)
        .map(|(name, value)| (name.as_str(), value))
        .collect();
    serde_json::to_string(&stored).map_err(StoreError::Encode)
}

fn decode_client(id: ClientId, encoded: &str) -> Result<Client, StoreError> {
    let fields = serde_json::from_str(encoded).map_err(|source| StoreError::Decode { id, source })?;
    Ok(Client { id, fields })
}

impl ClientStore for SqliteClientStore {
    fn list(&self) -> Result<Vec<Client>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, fields FROM client ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<usize, ClientId>(0)?, row.get::<usize, String>(1)?))
        })?;

        let clients = rows
            .map(|row| -> Result<Client, StoreError> {
                let (id, encoded) = row?;
                decode_client(id, &encoded)
            })
            .collect::<Result<Vec<_>, _>>();
        clients
    }

    fn get(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        let encoded = self
            .lock()?
            .query_row(
                "SELECT fields FROM client WHERE id = ?1",
                params![id],
                |row| row.get::<usize, String>(0),
            )
            .optional()?;

        encoded.map(|encoded| decode_client(id, &encoded)).transpose()
    }

    fn create(&self, mut draft: ClientDraft) -> Result<Client, StoreError> {
        draft.fields.remove(ID_FIELD);
        let encoded = encode_fields(&draft.fields)?;
        let conn = self.lock()?;
        conn.execute("INSERT INTO client (fields) VALUES (?1)", params![encoded])?;
        let id = conn.last_insert_rowid();
        info!("Created client {}", id);

        Ok(Client {
            id,
            fields: draft.fields,
        })
    }

    fn update(&self, id: ClientId, draft: &ClientDraft) -> Result<bool, StoreError> {
        let encoded = encode_fields(&draft.fields)?;
        let changed = self.lock()?.execute(
            "UPDATE client SET fields = ?1 WHERE id = ?2",
            params![encoded, id],
        )?;
        if changed > 0 {
            info!("Updated client {}", id);
        } else {
            debug!("Update skipped, client {} does not exist", id);
        }
        Ok(changed > 0)
    }

    fn delete(&self, id: ClientId) -> Result<bool, StoreError> {
        let changed = self
            .lock()?
            .execute("DELETE FROM client WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!("Deleted client {}", id);
        } else {
            debug!("Delete skipped, client {} does not exist", id);
        }
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteClientStore {
        SqliteClientStore::open_in_memory().unwrap()
    }

    #[test]
    fn list_is_empty_on_fresh_store() {
        assert!(store().list().unwrap().is_empty());
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let store = store();
        let first = store.create(ClientDraft::new().field("name", "Acme")).unwrap();
        let second = store.create(ClientDraft::new().field("name", "Globex")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn get_missing_returns_none() {
        assert!(store().get(42).unwrap().is_none());
    }

    #[test]
    fn update_replaces_all_fields() {
        let store = store();
        let created = store
            .create(
                ClientDraft::new()
                    .field("name", "Acme")
                    .field("phone", "555-0100"),
            )
            .unwrap();

        let replaced = store
            .update(created.id, &ClientDraft::new().field("name", "Acme Corp"))
            .unwrap();
        assert!(replaced);

        let loaded = store.get(created.id).unwrap().unwrap();
        assert_eq!(loaded.fields, ClientDraft::new().field("name", "Acme Corp").fields);
    }

    #[test]
    fn update_missing_reports_false() {
        let store = store();
        assert!(!store.update(5, &ClientDraft::new().field("name", "Ghost")).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn id_key_in_fields_is_never_stored() {
        let store = store();
        let mut draft = ClientDraft::new().field("name", "Acme");
        draft.fields.insert(ID_FIELD.to_string(), FieldValue::from(99));

        let created = store.create(draft.clone()).unwrap();
        assert!(!created.fields.contains_key(ID_FIELD));
        assert_eq!(
            serde_json::to_string(&created).unwrap(),
            format!(r#"{{"id":{},"name":"Acme"}}"#, created.id)
        );

        assert!(store.update(created.id, &draft).unwrap());
        let loaded = store.get(created.id).unwrap().unwrap();
        assert_eq!(loaded.id, created.id);
        assert!(!loaded.fields.contains_key(ID_FIELD));
    }

    #[test]
    fn delete_reports_whether_a_row_was_removed() {
        let store = store();
        let created = store.create(ClientDraft::new()).unwrap();
        assert!(store.delete(created.id).unwrap());
        assert!(!store.delete(created.id).unwrap());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        let first = store.create(ClientDraft::new()).unwrap();
        store.delete(first.id).unwrap();
        let second = store.create(ClientDraft::new()).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn corrupt_row_surfaces_decode_error() {
        let store = store();
        store
            .lock()
            .unwrap()
            .execute("INSERT INTO client (id, fields) VALUES (3, 'not json')", [])
            .unwrap();

        let err = store.get(3).unwrap_err();
        assert!(matches!(err, StoreError::Decode { id: 3, .. }));
        assert!(matches!(store.list().unwrap_err(), StoreError::Decode { .. }));
    }
}
