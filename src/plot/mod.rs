//! Grouped-bar charts of per-group utilities.
//!
//! - terminal rendering (`ascii`)
//! - SVG export via Plotters (`svg`)

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
