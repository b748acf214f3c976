//! Utility estimation at all three granularities.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::domain::{GroupUtilities, MergedRow, PartitionId, PartitionKey, RespondentUtilities, UtilityVector};
use crate::error::ConjointError;
use crate::fit::estimator::estimate_partitions;
use crate::fit::reconcile::reconcile;
use crate::models::CanonicalSchema;

/// Schema-aligned utilities for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityReport {
    pub schema: CanonicalSchema,
    pub aggregate: UtilityVector,
    /// One entry per group value, ascending.
    pub by_group: Vec<GroupUtilities>,
    /// One entry per respondent with at least one rating, ascending by id.
    pub by_respondent: Vec<RespondentUtilities>,
}

impl UtilityReport {
    pub fn underdetermined_respondents(&self) -> usize {
        self.by_respondent
            .iter()
            .filter(|r| r.utilities.diagnostics.underdetermined)
            .count()
    }
}

/// Estimate and reconcile every partition of one granularity.
pub fn estimate_granularity(
    rows: &[MergedRow],
    key: PartitionKey,
    schema: &CanonicalSchema,
) -> Result<Vec<UtilityVector>, ConjointError> {
    let fits = estimate_partitions(rows, key, schema)?;
    Ok(fits.iter().map(|raw| reconcile(raw, schema)).collect())
}

/// Run the aggregate, group and respondent estimations over the same rows.
///
/// Either all three utility sets are produced or the first error is returned.
pub fn estimate_utilities(rows: &[MergedRow], schema: &CanonicalSchema) -> Result<UtilityReport, ConjointError> {
    if rows.is_empty() {
        return Err(ConjointError::EmptyInput("no rated options to estimate".into()));
    }

    let aggregate = estimate_granularity(rows, PartitionKey::Aggregate, schema)?
        .into_iter()
        .next()
        .ok_or_else(|| ConjointError::EmptyPartition(PartitionId::All.to_string()))?;

    let by_group: Vec<GroupUtilities> = estimate_granularity(rows, PartitionKey::Group, schema)?
        .into_iter()
        .map(|utilities| GroupUtilities {
            group: partition_key(&utilities),
            utilities,
        })
        .collect();

    // Every row of a respondent carries the same group (one survey row each).
    let mut group_of: HashMap<&str, &str> = HashMap::new();
    for r in rows {
        group_of.entry(r.respondent.as_str()).or_insert(r.group.as_str());
    }

    let by_respondent: Vec<RespondentUtilities> = estimate_granularity(rows, PartitionKey::Respondent, schema)?
        .into_iter()
        .map(|utilities| {
            let respondent = partition_key(&utilities);
            let group = group_of
                .get(respondent.as_str())
                .map(|g| g.to_string())
                .unwrap_or_default();
            RespondentUtilities {
                respondent,
                group,
                utilities,
            }
        })
        .collect();

    let report = UtilityReport {
        schema: schema.clone(),
        aggregate,
        by_group,
        by_respondent,
    };
    info!(
        columns = schema.len(),
        groups = report.by_group.len(),
        respondents = report.by_respondent.len(),
        underdetermined = report.underdetermined_respondents(),
        "estimated utilities"
    );
    Ok(report)
}

fn partition_key(v: &UtilityVector) -> String {
    v.partition.key().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Design;
    use crate::models::predict;
    use approx::assert_abs_diff_eq;

    fn design() -> Design {
        let s = |v: &str| v.to_string();
        Design::from_cells(
            vec![s("Screen"), s("Price")],
            vec![0, 1, 2, 3],
            vec![
                vec![s("5in"), s("5in"), s("6in"), s("6in")],
                vec![s("low"), s("high"), s("low"), s("high")],
            ],
        )
        .unwrap()
    }

    fn row(d: &Design, respondent: &str, group: &str, option: i64, rating: f64) -> MergedRow {
        MergedRow {
            respondent: respondent.to_string(),
            group: group.to_string(),
            option,
            rating,
            levels: d.option(option).unwrap().to_vec(),
        }
    }

    /// Three respondents rating options 0..3 as 1..4, plus a sparse fourth.
    fn rows(d: &Design) -> Vec<MergedRow> {
        let mut rows = Vec::new();
        for (id, group) in [("1", "iOS"), ("2", "Android"), ("3", "iOS")] {
            for o in 0..4 {
                rows.push(row(d, id, group, o, (o + 1) as f64));
            }
        }
        rows.push(row(d, "4", "Android", 0, 2.0));
        rows.push(row(d, "4", "Android", 1, 4.0));
        rows
    }

    #[test]
    fn every_vector_spans_the_full_schema() {
        let d = design();
        let schema = CanonicalSchema::from_design(&d);
        let report = estimate_utilities(&rows(&d), &schema).unwrap();

        assert_eq!(report.aggregate.utilities.len(), schema.len());
        assert_eq!(report.by_group.len(), 2);
        assert_eq!(report.by_respondent.len(), 4);
        for g in &report.by_group {
            assert_eq!(g.utilities.utilities.len(), schema.len());
        }
        for r in &report.by_respondent {
            assert_eq!(r.utilities.utilities.len(), schema.len());
        }
    }

    #[test]
    fn identities_are_attached() {
        let d = design();
        let schema = CanonicalSchema::from_design(&d);
        let report = estimate_utilities(&rows(&d), &schema).unwrap();

        let groups: Vec<&str> = report.by_group.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(groups, vec!["Android", "iOS"]);
        let ids: Vec<(&str, &str)> = report
            .by_respondent
            .iter()
            .map(|r| (r.respondent.as_str(), r.group.as_str()))
            .collect();
        assert_eq!(ids, vec![("1", "iOS"), ("2", "Android"), ("3", "iOS"), ("4", "Android")]);
        assert_eq!(report.aggregate.partition, PartitionId::All);
    }

    #[test]
    fn sparse_respondent_is_zero_filled() {
        let d = design();
        let schema = CanonicalSchema::from_design(&d);
        let report = estimate_utilities(&rows(&d), &schema).unwrap();

        let sparse = &report.by_respondent[3];
        assert_eq!(sparse.respondent, "4");
        assert!(sparse.utilities.diagnostics.underdetermined);
        // Column 1 is Screen_6in, never rated by respondent 4.
        assert_eq!(sparse.utilities.utilities[1], 0.0);
        assert_eq!(report.underdetermined_respondents(), 1);
    }

    #[test]
    fn full_respondent_reproduces_ratings() {
        let d = design();
        let schema = CanonicalSchema::from_design(&d);
        let report = estimate_utilities(&rows(&d), &schema).unwrap();

        let first = &report.by_respondent[0].utilities.utilities;
        for o in 0..4 {
            let fitted = predict(&schema, d.option(o).unwrap(), first);
            assert_abs_diff_eq!(fitted, (o + 1) as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_rows_are_rejected() {
        let schema = CanonicalSchema::from_design(&design());
        let err = estimate_utilities(&[], &schema).unwrap_err();
        assert!(matches!(err, ConjointError::EmptyInput(_)), "{err}");
    }
}
