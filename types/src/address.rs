//! Account identities and derived record keys.
//!
//! Users, token assets and persisted records all share one 32-byte address
//! space. A record's address is derived deterministically from a namespace tag
//! and the identifiers of the entities that own it, so it can be located
//! without a separate index.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// A 32-byte account identifier.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// The unset address, used for references that have not been assigned yet.
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Derive the address of a record from its namespace and owning identifiers.
    ///
    /// Every part is length-prefixed before hashing, so `("ab", ["c"])` and
    /// `("a", ["bc"])` never collide.
    pub fn derive(namespace: &str, seeds: &[&[u8]]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update((namespace.len() as u32).to_be_bytes());
        hasher.update(namespace.as_bytes());
        for seed in seeds {
            hasher.update((seed.len() as u32).to_be_bytes());
            hasher.update(seed);
        }
        let mut output = [0u8; 32];
        output.copy_from_slice(&hasher.finalize());
        Self(output)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
