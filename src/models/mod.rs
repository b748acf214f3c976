//! Categorical (indicator) encoding of attribute levels.
//!
//! The canonical schema is a pure function of the design so every partition
//! is encoded against the same, fixed column space.

pub mod schema;

pub use schema::*;
