//! Local key-value persistence.
//!
//! Components never touch a global store: they receive a [`KeyValueStore`]
//! and build every key from a typed [`StoreKey`].

mod config;
mod keys;
mod memory;
pub mod sqlite;

pub use config::{Config, StorageConfig, SurveyConfig};
pub use keys::{StoreKey, SurveyField};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};

/// A scalar stored under a key.
///
/// Untagged so the SQLite backend can keep values as plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KvValue {
    Bool(bool),
    Number(f64),
    String(String),
}

/// One write in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum KvWrite {
    Set { key: String, value: KvValue },
    Remove { key: String },
}

impl KvWrite {
    pub fn set(key: &StoreKey, value: KvValue) -> Self {
        KvWrite::Set {
            key: key.as_key(),
            value,
        }
    }

    pub fn remove(key: &StoreKey) -> Self {
        KvWrite::Remove { key: key.as_key() }
    }
}

/// Flat, last-writer-wins key-value persistence.
///
/// Implementations must apply a batch as a unit: a reader never observes
/// half of it.
pub trait KeyValueStore {
    /// Raw value for `key`, if any.
    fn get(&self, key: &str) -> Result<Option<KvValue>, StoreError>;

    /// Apply `writes` in order as one unit.
    fn apply(&self, writes: &[KvWrite]) -> Result<(), StoreError>;

    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(match self.get(key)? {
            Some(KvValue::String(s)) => Some(s),
            _ => None,
        })
    }

    fn get_number(&self, key: &str) -> Result<Option<f64>, StoreError> {
        Ok(match self.get(key)? {
            Some(KvValue::Number(n)) => Some(n),
            _ => None,
        })
    }

    /// Booleans default to `false` when absent or of another type.
    fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        Ok(matches!(self.get(key)?, Some(KvValue::Bool(true))))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.apply(&[KvWrite::Set {
            key: key.to_string(),
            value: KvValue::String(value.to_string()),
        }])
    }

    fn set_number(&self, key: &str, value: f64) -> Result<(), StoreError> {
        self.apply(&[KvWrite::Set {
            key: key.to_string(),
            value: KvValue::Number(value),
        }])
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.apply(&[KvWrite::Set {
            key: key.to_string(),
            value: KvValue::Bool(value),
        }])
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.apply(&[KvWrite::Remove {
            key: key.to_string(),
        }])
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<KvValue>, StoreError> {
        (**self).get(key)
    }

    fn apply(&self, writes: &[KvWrite]) -> Result<(), StoreError> {
        (**self).apply(writes)
    }
}

/// Returns `~/.config/advent[-dev]/` based on ADVENT_ENV.
///
/// Set ADVENT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ADVENT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("advent-dev")
    } else {
        base_dir.join("advent")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_ignore_other_types() {
        let store = MemoryStore::new();
        store.set_string("k", "1").unwrap();
        assert_eq!(store.get_number("k").unwrap(), None);
        assert!(!store.get_bool("k").unwrap());
        assert_eq!(store.get_string("k").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn kv_value_json_shape() {
        assert_eq!(serde_json::to_string(&KvValue::Bool(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&KvValue::Number(2.5)).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&KvValue::String("a".into())).unwrap(), "\"a\"");
        let parsed: KvValue = serde_json::from_str("1700000000").unwrap();
        assert_eq!(parsed, KvValue::Number(1_700_000_000.0));
    }
}
