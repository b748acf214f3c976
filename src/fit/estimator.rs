//! Per-partition least-squares estimation.
//!
//! For each partition we:
//! - collect the schema columns its rows actually exercise
//! - build the indicator matrix over *only* those columns (no intercept)
//! - solve for the minimum-norm OLS coefficients
//!
//! A partition that never saw a level has no column for it, so the solver is
//! never handed an all-zero column. Filling the missing levels happens later,
//! in `reconcile`.

use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{FitDiagnostics, MergedRow, PartitionId, PartitionKey};
use crate::error::ConjointError;
use crate::fit::partition::partition_rows;
use crate::math::solve_least_squares;
use crate::models::{CanonicalSchema, fill_design_row};

/// Raw fit of one partition, restricted to the columns it exercised.
#[derive(Debug, Clone)]
pub struct RawFit {
    pub partition: PartitionId,
    /// Sorted schema indices of the restricted design matrix.
    pub columns: Vec<usize>,
    /// Coefficients parallel to `columns`.
    pub coefficients: Vec<f64>,
    pub diagnostics: FitDiagnostics,
}

impl RawFit {
    /// Fitted coefficient for a schema column, if this partition estimated it.
    pub fn coefficient(&self, column: usize) -> Option<f64> {
        self.columns.binary_search(&column).ok().map(|j| self.coefficients[j])
    }
}

/// Schema columns exercised by at least one row, in schema order.
pub fn observed_columns(rows: &[&MergedRow], schema: &CanonicalSchema) -> Vec<usize> {
    let set: BTreeSet<usize> = rows
        .iter()
        .flat_map(|r| schema.active_columns(&r.levels))
        .collect();
    set.into_iter().collect()
}

/// Fit one partition.
pub fn fit_partition(
    partition: &PartitionId,
    rows: &[&MergedRow],
    schema: &CanonicalSchema,
) -> Result<RawFit, ConjointError> {
    if rows.is_empty() {
        return Err(ConjointError::EmptyPartition(partition.to_string()));
    }

    let columns = observed_columns(rows, schema);
    let n = rows.len();
    let k = columns.len();

    let mut x = DMatrix::<f64>::zeros(n, k);
    let mut buf = vec![0.0; k];
    for (i, r) in rows.iter().enumerate() {
        fill_design_row(schema, &r.levels, &columns, &mut buf);
        for (j, v) in buf.iter().enumerate() {
            x[(i, j)] = *v;
        }
    }
    let y = DVector::from_iterator(n, rows.iter().map(|r| r.rating));

    let fit = solve_least_squares(&x, &y).ok_or_else(|| ConjointError::FitFailed(partition.to_string()))?;

    let residuals = &y - &x * &fit.beta;
    let sse = residuals.norm_squared();
    let mean = y.mean();
    let sst: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let r_squared = (sst > 0.0).then(|| 1.0 - sse / sst);

    let underdetermined = n < k;
    if underdetermined {
        warn!(
            partition = %partition,
            n_obs = n,
            n_columns = k,
            "under-determined fit; using minimum-norm solution"
        );
    }

    Ok(RawFit {
        partition: partition.clone(),
        columns,
        coefficients: fit.beta.iter().copied().collect(),
        diagnostics: FitDiagnostics {
            n_obs: n,
            n_columns: k,
            rank: fit.rank,
            sse,
            r_squared,
            underdetermined,
        },
    })
}

/// Fit every partition of `rows` under `key`.
///
/// Partitions are fitted in parallel and returned in ascending identifier
/// order. The first failure aborts the whole granularity.
pub fn estimate_partitions(
    rows: &[MergedRow],
    key: PartitionKey,
    schema: &CanonicalSchema,
) -> Result<Vec<RawFit>, ConjointError> {
    let partitions: Vec<(PartitionId, Vec<&MergedRow>)> = partition_rows(rows, key).into_iter().collect();
    debug!(key = key.display_name(), partitions = partitions.len(), "fitting partitions");

    partitions
        .par_iter()
        .map(|(id, part)| fit_partition(id, part, schema))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}
