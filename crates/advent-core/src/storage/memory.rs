use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{KeyValueStore, KvValue, KvWrite};
use crate::error::StoreError;

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, KvValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<KvValue>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn apply(&self, writes: &[KvWrite]) -> Result<(), StoreError> {
        let mut entries = self.entries.borrow_mut();
        for write in writes {
            match write {
                KvWrite::Set { key, value } => {
                    entries.insert(key.clone(), value.clone());
                }
                KvWrite::Remove { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("a").unwrap().is_none());
        store.set_number("a", 3.0).unwrap();
        assert_eq!(store.get_number("a").unwrap(), Some(3.0));
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }
}
