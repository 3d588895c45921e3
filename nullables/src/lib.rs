//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the crowdfunding core (record storage, token
//! custody, wall-clock time) are abstracted behind traits or explicit
//! arguments. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: hand these to the engine in tests instead of a real substrate.

pub mod clock;
pub mod store;
pub mod token;

pub use clock::NullClock;
pub use store::NullStore;
pub use token::NullTokenLedger;
