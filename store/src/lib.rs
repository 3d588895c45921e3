//! Capability traits for the Beneficence platform.
//!
//! The crowdfunding core never owns durable storage or token custody. It is
//! handed a [`RecordStore`] (keyed records with atomic batch commits) and a
//! [`TokenLedger`] (per-asset balances and transfers) by the surrounding
//! substrate. Every backend (an on-chain runtime, a database, the in-memory
//! nullables used in tests) implements these traits, and the rest of the
//! codebase depends only on the traits.

pub mod batch;
pub mod error;
pub mod record;
pub mod token;

pub use batch::WriteBatch;
pub use error::StoreError;
pub use record::RecordStore;
pub use token::TokenLedger;
