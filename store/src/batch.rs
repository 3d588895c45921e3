//! Write batching: groups every record write of one operation so the
//! backend can apply them as a single atomic unit.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.put(round_key, round_bytes);
//! batch.put(campaign_key, campaign_bytes);
//! store.commit(batch)?;
//! ```
//!
//! A batch that is dropped without being committed writes nothing.

use beneficence_types::AccountId;

/// Record writes staged by one operation.
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    puts: Vec<(AccountId, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a record write. A later put for the same key replaces the earlier one.
    pub fn put(&mut self, key: AccountId, bytes: Vec<u8>) {
        if let Some(slot) = self.puts.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = bytes;
        } else {
            self.puts.push((key, bytes));
        }
    }

    pub fn len(&self) -> usize {
        self.puts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puts.is_empty()
    }

    pub fn into_puts(self) -> Vec<(AccountId, Vec<u8>)> {
        self.puts
    }
}
