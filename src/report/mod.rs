//! Terminal reporting: run summary and utility tables.
//!
//! We keep formatting code in one place so:
//! - the estimation code stays clean and testable
//! - output changes are localized (important for snapshot tests)

pub mod format;

pub use format::*;
