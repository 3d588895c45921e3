//! Keyed record storage trait.

use crate::{StoreError, WriteBatch};
use beneficence_types::AccountId;

/// Durable keyed-record storage.
///
/// Records are opaque bytes addressed by derived keys, so the store doesn't
/// depend on the crowdfunding crate; the core serializes its own types.
/// Implementations must apply a committed [`WriteBatch`] all-or-nothing and
/// serialize concurrent commits touching the same key.
pub trait RecordStore {
    /// Get a record by key, `None` if it was never created.
    fn get_record(&self, key: &AccountId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Check if a record exists.
    fn exists(&self, key: &AccountId) -> Result<bool, StoreError>;

    /// Atomically apply every write in the batch.
    ///
    /// The engine transfers tokens before committing, so a batch that was
    /// validated by the caller must not be rejected here; only a broken
    /// backend may return an error.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn get_record(&self, key: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_record(key)
    }

    fn exists(&self, key: &AccountId) -> Result<bool, StoreError> {
        (**self).exists(key)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }
}
