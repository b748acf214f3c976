//! Join long-form responses to their option's attribute levels.

use crate::domain::{Design, MergedRow, ResponseRecord};
use crate::error::ConjointError;

/// Attach each response's level assignment from the design.
///
/// The option index is a key of the design, so the join is one-to-one: the
/// output has exactly one row per input record, in input order. A record
/// that references an option missing from the design aborts the merge.
pub fn merge_responses(records: &[ResponseRecord], design: &Design) -> Result<Vec<MergedRow>, ConjointError> {
    records
        .iter()
        .map(|r| {
            let levels = design.option(r.option).ok_or_else(|| ConjointError::UnknownOption {
                respondent: r.respondent.clone(),
                option: r.option,
            })?;
            Ok(MergedRow {
                respondent: r.respondent.clone(),
                group: r.group.clone(),
                option: r.option,
                rating: r.rating,
                levels: levels.to_vec(),
            })
        })
        .collect()
}
