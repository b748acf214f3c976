//! `conjoint-utils` library crate.
//!
//! The binary (`conjoint`) is a thin wrapper around this library so that:
//!
//! - the estimation pipeline is testable without spawning processes
//! - the loaders, estimator and exports are reusable on their own
//!
//! Data flow: `io` (load) -> `data` (merge) -> `models` (schema) -> `fit`
//! (partitioned OLS + reconcile) -> `io`/`report`/`plot` (outputs).

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
