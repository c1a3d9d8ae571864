//! SQLite-backed key-value store.
//!
//! Values are kept as JSON scalars in a single `kv` table so booleans,
//! numbers and strings survive a round trip with their type intact.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, Config, KeyValueStore, KvValue, KvWrite};
use crate::error::{CoreError, StoreError};

/// SQLite database holding the calendar state.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database named by `config.storage.database_file` inside
    /// `~/.config/advent/`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open(config: &Config) -> Result<Self, CoreError> {
        let path = data_dir()?.join(&config.storage.database_file);
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    fn apply_one(&self, write: &KvWrite) -> Result<(), StoreError> {
        match write {
            KvWrite::Set { key, value } => {
                if let KvValue::Number(n) = value {
                    if !n.is_finite() {
                        return Err(StoreError::Corrupt {
                            key: key.clone(),
                            message: format!("non-finite number {n}"),
                        });
                    }
                }
                let encoded = serde_json::to_string(value).map_err(|e| StoreError::Corrupt {
                    key: key.clone(),
                    message: e.to_string(),
                })?;
                self.conn.execute(
                    "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                    params![key, encoded],
                )?;
            }
            KvWrite::Remove { key } => {
                self.conn
                    .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
            }
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<KvValue>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let raw = match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => v,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<KvValue>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring undecodable stored value");
                Ok(None)
            }
        }
    }

    fn apply(&self, writes: &[KvWrite]) -> Result<(), StoreError> {
        if writes.is_empty() {
            return Ok(());
        }

        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<(), StoreError> = writes.iter().try_for_each(|w| self.apply_one(w));

        match result {
            Ok(()) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(())
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.get("test").unwrap().is_none());
        store.set_string("test", "hello").unwrap();
        assert_eq!(store.get_string("test").unwrap().unwrap(), "hello");
        store.set_bool("flag", true).unwrap();
        assert!(store.get_bool("flag").unwrap());
        store.remove("flag").unwrap();
        assert!(!store.get_bool("flag").unwrap());
    }

    #[test]
    fn failed_batch_rolls_back() {
        let store = SqliteStore::open_memory().unwrap();
        let writes = [
            KvWrite::Set {
                key: "a".into(),
                value: KvValue::String("x".into()),
            },
            KvWrite::Set {
                key: "b".into(),
                value: KvValue::Number(f64::NAN),
            },
        ];
        assert!(store.apply(&writes).is_err());
        assert!(store.get("a").unwrap().is_none());
    }

    #[test]
    fn undecodable_value_reads_as_absent() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .conn
            .execute("INSERT INTO kv (key, value) VALUES ('bad', 'not json')", [])
            .unwrap();
        assert!(store.get("bad").unwrap().is_none());
    }
}
