//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the design and survey records (`Design`, `ResponseRecord`, `MergedRow`)
//! - partitioning keys and identifiers (`PartitionKey`, `PartitionId`)
//! - estimation outputs (`UtilityVector`, `FitDiagnostics`, ...)
//! - run configuration (`EstimateConfig`, `SampleConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
