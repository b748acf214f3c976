//! Canonical indicator schema and design-row encoding.
//!
//! The estimator relies on two primitive operations:
//! - build an indicator row over a (restricted) set of schema columns (for OLS)
//! - predict a rating from a full-width utility vector (for residuals/tests)
//!
//! Every column is tagged with its `(attribute, level)` pair when the schema
//! is built, so presentation labels never have to be recovered by parsing the
//! joined column name.

use serde::Serialize;

use crate::domain::Design;

/// Separator between attribute and level in canonical column names.
pub const COLUMN_SEPARATOR: &str = "_";

/// One indicator column: "attribute `attribute` takes level `level`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaColumn {
    pub attribute: usize,
    pub level: usize,
    pub attribute_name: String,
    pub level_name: String,
}

impl SchemaColumn {
    /// Canonical column name, `Attribute_Level`.
    pub fn name(&self) -> String {
        format!("{}{COLUMN_SEPARATOR}{}", self.attribute_name, self.level_name)
    }

    /// Human-facing label: the level name without its attribute prefix.
    pub fn label(&self) -> &str {
        &self.level_name
    }
}

/// Ordered indicator columns of the complete design.
///
/// Attributes appear in source order; within an attribute, levels appear in
/// lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalSchema {
    columns: Vec<SchemaColumn>,
    #[serde(skip)]
    offsets: Vec<usize>,
}

impl CanonicalSchema {
    pub fn from_design(design: &Design) -> Self {
        let mut columns = Vec::new();
        let mut offsets = Vec::with_capacity(design.attributes.len());
        for (a, attr) in design.attributes.iter().enumerate() {
            offsets.push(columns.len());
            for (l, level) in attr.levels.iter().enumerate() {
                columns.push(SchemaColumn {
                    attribute: a,
                    level: l,
                    attribute_name: attr.name.clone(),
                    level_name: level.clone(),
                });
            }
        }
        Self { columns, offsets }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    /// Schema index of `(attribute, level)`.
    pub fn column_index(&self, attribute: usize, level: usize) -> usize {
        self.offsets[attribute] + level
    }

    /// Schema indices switched on by a row's level assignment (one per attribute).
    pub fn active_columns<'a>(&'a self, levels: &'a [usize]) -> impl Iterator<Item = usize> + 'a {
        levels
            .iter()
            .enumerate()
            .map(|(a, &l)| self.column_index(a, l))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(SchemaColumn::label).collect()
    }
}

/// Fill an indicator row restricted to `columns` (sorted schema indices).
///
/// Active levels that are not part of `columns` are ignored; callers build
/// `columns` from the same rows they encode, so this does not happen in
/// practice.
///
/// # Panics
/// Panics if `out.len() != columns.len()`.
pub fn fill_design_row(schema: &CanonicalSchema, levels: &[usize], columns: &[usize], out: &mut [f64]) {
    assert_eq!(out.len(), columns.len());
    out.fill(0.0);
    for col in schema.active_columns(levels) {
        if let Ok(j) = columns.binary_search(&col) {
            out[j] = 1.0;
        }
    }
}

/// Predicted rating for a level assignment under full-width utilities.
pub fn predict(schema: &CanonicalSchema, levels: &[usize], utilities: &[f64]) -> f64 {
    schema.active_columns(levels).map(|c| utilities[c]).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn schema_width_is_sum_of_levels() {
        let schema = CanonicalSchema::from_design(&design());
        assert_eq!(schema.len(), 4);
        let names: Vec<String> = schema.columns().iter().map(SchemaColumn::name).collect();
        assert_eq!(names, vec!["Screen_5in", "Screen_6in", "Price_high", "Price_low"]);
        assert_eq!(schema.column_index(1, 0), 2);
    }

    #[test]
    fn labels_round_trip_to_column_names() {
        let schema = CanonicalSchema::from_design(&design());
        for col in schema.columns() {
            let rebuilt = format!("{}{COLUMN_SEPARATOR}{}", col.attribute_name, col.label());
            assert_eq!(rebuilt, col.name());
        }
    }

    #[test]
    fn labels_survive_separator_inside_names() {
        let s = |v: &str| v.to_string();
        let design = Design::from_cells(
            vec![s("OS"), s("OS_version")],
            vec![0, 1],
            vec![vec![s("version_2"), s("a")], vec![s("x"), s("y")]],
        )
        .unwrap();
        let schema = CanonicalSchema::from_design(&design);
        assert_eq!(schema.labels(), vec!["a", "version_2", "x", "y"]);
        assert_eq!(schema.columns()[2].name(), "OS_version_x");
        assert_eq!(schema.columns()[2].attribute_name, "OS_version");
    }

    #[test]
    fn restricted_row_sets_only_known_columns() {
        let d = design();
        let schema = CanonicalSchema::from_design(&d);
        let levels = d.option(3).unwrap();
        let mut row = [9.0; 2];
        // Columns 1 (Screen_6in) and 3 (Price_low); option 3 is (6in, high).
        fill_design_row(&schema, levels, &[1, 3], &mut row);
        assert_eq!(row, [1.0, 0.0]);
    }

    #[test]
    fn predict_sums_active_utilities() {
        let d = design();
        let schema = CanonicalSchema::from_design(&d);
        let u = [1.0, 3.0, 1.0, 0.0];
        assert_eq!(predict(&schema, d.option(0).unwrap(), &u), 1.0);
        assert_eq!(predict(&schema, d.option(1).unwrap(), &u), 2.0);
    }
}
