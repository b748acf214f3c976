//! Survey data preparation.
//!
//! - joining responses to design options (`merge`)
//! - synthetic conjoint studies for demos and tests (`sample`)

pub mod merge;
pub mod sample;

pub use merge::*;
pub use sample::*;
