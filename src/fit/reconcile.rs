//! Alignment of per-partition fits onto the canonical schema.
//!
//! A zero in the reconciled vector means "this partition never saw the
//! level", not "the level has zero utility"; consumers that need to tell the
//! two apart should compare against the partition's `RawFit::columns`.

use crate::domain::UtilityVector;
use crate::fit::estimator::RawFit;
use crate::models::CanonicalSchema;

/// Expand a restricted fit to full schema width.
///
/// Estimated columns keep their fitted value; every other column is exactly `0.0`.
pub fn reconcile(raw: &RawFit, schema: &CanonicalSchema) -> UtilityVector {
    let mut utilities = vec![0.0; schema.len()];
    for (&col, &beta) in raw.columns.iter().zip(&raw.coefficients) {
        utilities[col] = beta;
    }
    UtilityVector {
        partition: raw.partition.clone(),
        utilities,
        diagnostics: raw.diagnostics.clone(),
    }
}

/// Pair each utility with its level label (attribute prefix stripped).
pub fn labeled<'a>(
    vector: &'a UtilityVector,
    schema: &'a CanonicalSchema,
) -> impl Iterator<Item = (&'a str, f64)> + 'a {
    schema
        .columns()
        .iter()
        .zip(&vector.utilities)
        .map(|(col, &v)| (col.label(), v))
}
