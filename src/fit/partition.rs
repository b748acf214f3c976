//! Grouping of merged rows by partition key.

use std::collections::BTreeMap;

use crate::domain::{MergedRow, PartitionId, PartitionKey};

/// Identifier of the partition a row belongs to under `key`.
pub fn partition_of(row: &MergedRow, key: PartitionKey) -> PartitionId {
    match key {
        PartitionKey::Aggregate => PartitionId::All,
        PartitionKey::Group => PartitionId::Key(row.group.clone()),
        PartitionKey::Respondent => PartitionId::Key(row.respondent.clone()),
    }
}

/// Split rows into partitions, ordered by identifier (see `PartitionId`).
///
/// Rows keep their input order within a partition. Every returned partition
/// is non-empty; an empty input yields no partitions.
pub fn partition_rows(rows: &[MergedRow], key: PartitionKey) -> BTreeMap<PartitionId, Vec<&MergedRow>> {
    let mut out: BTreeMap<PartitionId, Vec<&MergedRow>> = BTreeMap::new();
    for row in rows {
        out.entry(partition_of(row, key)).or_default().push(row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(respondent: &str, group: &str, option: i64) -> MergedRow {
        MergedRow {
            respondent: respondent.to_string(),
            group: group.to_string(),
            option,
            rating: 1.0,
            levels: vec![0],
        }
    }

    fn rows() -> Vec<MergedRow> {
        vec![
            row("10", "iOS", 0),
            row("2", "Android", 0),
            row("10", "iOS", 1),
            row("2", "Android", 1),
            row("3", "iOS", 0),
        ]
    }

    #[test]
    fn aggregate_is_single_partition() {
        let rows = rows();
        let parts = partition_rows(&rows, PartitionKey::Aggregate);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[&PartitionId::All].len(), rows.len());
    }

    #[test]
    fn groups_are_sorted_and_complete() {
        let rows = rows();
        let parts = partition_rows(&rows, PartitionKey::Group);
        let keys: Vec<String> = parts.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["Android", "iOS"]);
        assert_eq!(parts.values().map(Vec::len).sum::<usize>(), rows.len());
    }

    #[test]
    fn respondents_sort_numerically() {
        let rows = rows();
        let parts = partition_rows(&rows, PartitionKey::Respondent);
        let keys: Vec<String> = parts.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["2", "3", "10"]);
        let opts: Vec<i64> = parts[&PartitionId::Key("10".into())].iter().map(|r| r.option).collect();
        assert_eq!(opts, vec![0, 1]);
    }

    #[test]
    fn empty_input_has_no_partitions() {
        assert!(partition_rows(&[], PartitionKey::Aggregate).is_empty());
    }
}
