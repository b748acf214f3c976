//! Input/output helpers.
//!
//! - design CSV ingest + validation (`design`)
//! - survey CSV ingest and wide-to-long reshape (`survey`)
//! - utility table and synthetic study exports (`export`)
//! - full JSON report (`json`)

pub mod design;
pub mod export;
pub mod json;
pub mod survey;

pub use design::*;
pub use export::*;
pub use json::*;
pub use survey::*;
