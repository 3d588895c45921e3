//! Fundamental types for the Beneficence crowdfunding platform.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identities (which double as derived record keys), timestamps and the
//! governance parameters stored in the platform configuration.

pub mod address;
pub mod params;
pub mod time;

pub use address::AccountId;
pub use params::PlatformParams;
pub use time::Timestamp;
