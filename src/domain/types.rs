//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during estimation
//! - exported to JSON/CSV
//! - compared across runs (determinism checks)

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ConjointError;

/// A categorical factor of the design with its closed set of levels.
///
/// Levels are stored in lexicographic order; this is the order the indicator
/// columns of the attribute appear in the canonical schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub levels: Vec<String>,
}

impl Attribute {
    pub fn level_index(&self, level: &str) -> Option<usize> {
        self.levels.binary_search_by(|l| l.as_str().cmp(level)).ok()
    }
}

/// The orthogonal design: attributes (source order) and, for every option
/// index, the level chosen under each attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Design {
    pub attributes: Vec<Attribute>,
    /// option index -> level index per attribute (parallel to `attributes`).
    pub options: BTreeMap<i64, Vec<usize>>,
}

impl Design {
    /// Build a design from raw cells.
    ///
    /// `cells[a][o]` is the level of attribute `a` for option `option_ids[o]`.
    pub fn from_cells(
        attribute_names: Vec<String>,
        option_ids: Vec<i64>,
        cells: Vec<Vec<String>>,
    ) -> Result<Self, ConjointError> {
        if attribute_names.is_empty() {
            return Err(ConjointError::MalformedDesign("design defines no attributes".into()));
        }
        if option_ids.is_empty() {
            return Err(ConjointError::MalformedDesign("design defines no options".into()));
        }
        if cells.len() != attribute_names.len() {
            return Err(ConjointError::MalformedDesign(format!(
                "expected {} attribute rows, found {}",
                attribute_names.len(),
                cells.len()
            )));
        }

        let mut seen = HashSet::new();
        for &id in &option_ids {
            if !seen.insert(id) {
                return Err(ConjointError::MalformedDesign(format!("option index {id} appears more than once")));
            }
        }
        let mut seen = HashSet::new();
        for name in &attribute_names {
            if name.trim().is_empty() {
                return Err(ConjointError::MalformedDesign("empty attribute name".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConjointError::MalformedDesign(format!("attribute `{name}` appears more than once")));
            }
        }

        let mut attributes = Vec::with_capacity(attribute_names.len());
        for (name, row) in attribute_names.iter().zip(&cells) {
            if row.len() != option_ids.len() {
                return Err(ConjointError::MalformedDesign(format!(
                    "attribute `{name}` has {} cells but the design has {} options",
                    row.len(),
                    option_ids.len()
                )));
            }
            if let Some(pos) = row.iter().position(|c| c.trim().is_empty()) {
                return Err(ConjointError::MalformedDesign(format!(
                    "empty cell for attribute `{name}`, option {}",
                    option_ids[pos]
                )));
            }
            let mut levels: Vec<String> = row.iter().map(|c| c.trim().to_string()).collect();
            levels.sort();
            levels.dedup();
            attributes.push(Attribute {
                name: name.clone(),
                levels,
            });
        }

        let mut options = BTreeMap::new();
        for (o, &id) in option_ids.iter().enumerate() {
            let mut assignment = Vec::with_capacity(attributes.len());
            for (attr, row) in attributes.iter().zip(&cells) {
                let level = attr.level_index(row[o].trim()).ok_or_else(|| {
                    ConjointError::MalformedDesign(format!("level lookup failed for `{}`", attr.name))
                })?;
                assignment.push(level);
            }
            options.insert(id, assignment);
        }

        Ok(Self { attributes, options })
    }

    pub fn option(&self, index: i64) -> Option<&[usize]> {
        self.options.get(&index).map(Vec::as_slice)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }

    /// Level name chosen for `option` under attribute `attr`.
    pub fn level_name(&self, option: i64, attr: usize) -> Option<&str> {
        let level = *self.options.get(&option)?.get(attr)?;
        self.attributes.get(attr)?.levels.get(level).map(String::as_str)
    }
}

/// One rating given by one respondent to one option.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    pub respondent: String,
    pub group: String,
    pub option: i64,
    pub rating: f64,
}

/// A response joined with the option's attribute levels.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub respondent: String,
    pub group: String,
    pub option: i64,
    pub rating: f64,
    /// Level index per attribute (parallel to `Design::attributes`).
    pub levels: Vec<usize>,
}

/// How merged rows are grouped before estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKey {
    Aggregate,
    Group,
    Respondent,
}

impl PartitionKey {
    pub fn display_name(self) -> &'static str {
        match self {
            PartitionKey::Aggregate => "aggregate",
            PartitionKey::Group => "group",
            PartitionKey::Respondent => "respondent",
        }
    }
}

/// Identifier of one partition.
///
/// Ordering: `All` first, then keys. Keys that parse as integers sort
/// numerically and before every non-numeric key; the rest sort
/// lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionId {
    All,
    Key(String),
}

impl PartitionId {
    pub fn key(&self) -> Option<&str> {
        match self {
            PartitionId::All => None,
            PartitionId::Key(k) => Some(k),
        }
    }
}

impl Ord for PartitionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PartitionId::All, PartitionId::All) => Ordering::Equal,
            (PartitionId::All, PartitionId::Key(_)) => Ordering::Less,
            (PartitionId::Key(_), PartitionId::All) => Ordering::Greater,
            (PartitionId::Key(a), PartitionId::Key(b)) => cmp_keys(a, b),
        }
    }
}

impl PartialOrd for PartitionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn cmp_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionId::All => f.write_str("all"),
            PartitionId::Key(k) => f.write_str(k),
        }
    }
}

impl Serialize for PartitionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PartitionId::All => serializer.serialize_none(),
            PartitionId::Key(k) => serializer.serialize_str(k),
        }
    }
}

/// Per-partition fit diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitDiagnostics {
    pub n_obs: usize,
    /// Columns in the partition's restricted design matrix.
    pub n_columns: usize,
    pub rank: usize,
    pub sse: f64,
    pub r_squared: Option<f64>,
    /// Fewer observations than columns; the solution is minimum-norm.
    pub underdetermined: bool,
}

/// Utilities for one partition, aligned to the canonical schema.
///
/// `utilities[i]` belongs to schema column `i`; levels the partition never
/// saw are exactly `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityVector {
    pub partition: PartitionId,
    pub utilities: Vec<f64>,
    pub diagnostics: FitDiagnostics,
}

/// Group-level utilities with the group value as identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupUtilities {
    pub group: String,
    pub utilities: UtilityVector,
}

/// Respondent-level utilities with the respondent's id and group as identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RespondentUtilities {
    pub respondent: String,
    pub group: String,
    pub utilities: UtilityVector,
}
