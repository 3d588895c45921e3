//! Shared utilities for the Beneficence platform.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat, UtilsError};
pub use time::format_duration;
