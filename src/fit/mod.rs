//! Part-worth estimation.
//!
//! Responsibilities:
//!
//! - split merged rows into partitions (aggregate / group / respondent)
//! - fit each partition over its own restricted indicator matrix (parallel)
//! - reconcile every fit onto the canonical schema (zero-fill unseen levels)
//! - run all three granularities over the same rows and schema

pub mod estimator;
pub mod partition;
pub mod reconcile;
pub mod utilities;

pub use estimator::*;
pub use partition::*;
pub use reconcile::*;
pub use utilities::*;
