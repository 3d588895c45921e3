//! Nullable record store: thread-safe in-memory storage for testing.

use beneficence_store::{RecordStore, StoreError, WriteBatch};
use beneficence_types::AccountId;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory record store for testing.
///
/// A committed batch is applied under a single lock, so readers never see
/// half of an operation's writes.
pub struct NullStore {
    records: Mutex<HashMap<AccountId, Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Number of records currently stored.
    pub fn record_count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Copy of every stored record, for before/after comparisons in tests.
    pub fn snapshot(&self) -> HashMap<AccountId, Vec<u8>> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("record store lock poisoned".into())
}

impl RecordStore for NullStore {
    fn get_record(&self, key: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn exists(&self, key: &AccountId) -> Result<bool, StoreError> {
        Ok(self.records.lock().map_err(poisoned)?.contains_key(key))
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(poisoned)?;
        for (key, bytes) in batch.into_puts() {
            records.insert(key, bytes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_then_read_back() {
        let store = NullStore::new();
        let key = AccountId::new([4u8; 32]);
        assert!(!store.exists(&key).unwrap());

        let mut batch = WriteBatch::new();
        batch.put(key, vec![1, 2, 3]);
        store.commit(batch).unwrap();

        assert!(store.exists(&key).unwrap());
        assert_eq!(store.get_record(&key).unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(store.record_count(), 1);
    }

    #[test]
    fn missing_record_is_none() {
        let store = NullStore::new();
        assert_eq!(store.get_record(&AccountId::new([9u8; 32])).unwrap(), None);
    }
}
