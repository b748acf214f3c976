//! Survey CSV ingest: one row per respondent, reshaped to long form.
//!
//! Design goals:
//! - **Strict schema**: identity/group columns must exist; rating columns are
//!   recognised by prefix and must carry an integer option index
//! - **Optional ratings**: empty cells are skipped silently
//! - **No silent coercion**: a non-numeric rating is an error, not a gap

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{ResponseRecord, SurveyLayout};
use crate::error::ConjointError;

const TABLE: &str = "survey table";

/// Tokens treated as a missing rating in addition to the empty cell.
const MISSING_TOKENS: [&str; 4] = ["na", "nan", "n/a", "null"];

/// A rating column and the option index it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingColumn {
    pub name: String,
    pub option: i64,
    position: usize,
}

/// Long-form survey plus ingest statistics.
#[derive(Debug, Clone)]
pub struct SurveyData {
    pub records: Vec<ResponseRecord>,
    pub rating_columns: Vec<RatingColumn>,
    pub respondents: usize,
    /// Rating cells left empty (dropped).
    pub missing_ratings: usize,
}

/// Load the survey table from a CSV file.
pub fn load_survey(path: &Path, layout: &SurveyLayout) -> Result<SurveyData, ConjointError> {
    let file = File::open(path).map_err(|e| ConjointError::io(path, e))?;
    let survey = read_survey(file, layout)?;
    info!(
        path = %path.display(),
        respondents = survey.respondents,
        ratings = survey.records.len(),
        missing = survey.missing_ratings,
        "loaded survey"
    );
    Ok(survey)
}

/// Parse a survey table from any reader.
pub fn read_survey<R: Read>(reader: R, layout: &SurveyLayout) -> Result<SurveyData, ConjointError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let header_map = build_header_map(&headers);

    let id_idx = require_column(&header_map, &layout.id_column)?;
    let group_idx = require_column(&header_map, &layout.group_column)?;
    let rating_columns = rating_columns(&headers, &layout.rating_prefix, &[id_idx, group_idx])?;
    if rating_columns.is_empty() {
        return Err(ConjointError::MissingColumn {
            table: TABLE,
            column: format!("{}<option>", layout.rating_prefix),
        });
    }
    debug!(columns = rating_columns.len(), "rating columns detected");

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut missing_ratings = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        let record = result?;

        let respondent = required_value(&record, id_idx, &layout.id_column, line)?;
        let group = required_value(&record, group_idx, &layout.group_column, line)?;
        if !seen.insert(respondent.to_string()) {
            return Err(ConjointError::DuplicateRespondent(respondent.to_string()));
        }

        for col in &rating_columns {
            match parse_rating(record.get(col.position), &col.name, line)? {
                Some(rating) => records.push(ResponseRecord {
                    respondent: respondent.to_string(),
                    group: group.to_string(),
                    option: col.option,
                    rating,
                }),
                None => missing_ratings += 1,
            }
        }
    }

    Ok(SurveyData {
        records,
        rating_columns,
        respondents: seen.len(),
        missing_ratings,
    })
}

/// Option index encoded in a rating column name.
///
/// Returns `None` when the column does not carry the prefix at all, and an
/// error when it does but the remainder is not an integer.
pub fn rating_option_index(column: &str, prefix: &str) -> Option<Result<i64, ConjointError>> {
    let suffix = column.strip_prefix(prefix)?;
    Some(suffix.trim().parse::<i64>().map_err(|_| ConjointError::UnparseableColumn {
        column: column.to_string(),
        prefix: prefix.to_string(),
    }))
}

/// Prefix-matching columns other than `reserved` (identity/group), one per option.
fn rating_columns(
    headers: &StringRecord,
    prefix: &str,
    reserved: &[usize],
) -> Result<Vec<RatingColumn>, ConjointError> {
    let mut out: Vec<RatingColumn> = Vec::new();
    let mut by_option: HashMap<i64, usize> = HashMap::new();
    for (position, raw) in headers.iter().enumerate() {
        if reserved.contains(&position) {
            continue;
        }
        let name = normalize_header_name(raw);
        let Some(option) = rating_option_index(name, prefix) else {
            continue;
        };
        let option = option?;
        if let Some(&prev) = by_option.get(&option) {
            return Err(ConjointError::DuplicateOptionColumn {
                option,
                first: out[prev].name.clone(),
                second: name.to_string(),
            });
        }
        by_option.insert(option, out.len());
        out.push(RatingColumn {
            name: name.to_string(),
            option,
            position,
        });
    }
    Ok(out)
}

fn build_header_map(headers: &StringRecord) -> HashMap<&str, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> &str {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}')
}

fn require_column(header_map: &HashMap<&str, usize>, name: &str) -> Result<usize, ConjointError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| ConjointError::MissingColumn {
            table: TABLE,
            column: name.to_string(),
        })
}

fn required_value<'a>(
    record: &'a StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> Result<&'a str, ConjointError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConjointError::MissingValue {
            line,
            column: column.to_string(),
        })
}

fn parse_rating(cell: Option<&str>, column: &str, line: usize) -> Result<Option<f64>, ConjointError> {
    let Some(s) = cell.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if MISSING_TOKENS.iter().any(|t| s.eq_ignore_ascii_case(t)) {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ConjointError::InvalidRating {
            line,
            column: column.to_string(),
            value: s.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SurveyLayout {
        SurveyLayout::default()
    }

    #[test]
    fn reshapes_to_long_form_and_drops_missing() {
        let csv = "ID,Brand,QA_0,QA_1,QA_2\n1,iOS,3,,5\n2,Android,NA,4,1\n";
        let survey = read_survey(csv.as_bytes(), &layout()).unwrap();

        assert_eq!(survey.respondents, 2);
        assert_eq!(survey.missing_ratings, 2);
        assert_eq!(survey.records.len(), 4);
        assert_eq!(
            survey.records[0],
            ResponseRecord {
                respondent: "1".into(),
                group: "iOS".into(),
                option: 0,
                rating: 3.0
            }
        );
        let options: Vec<i64> = survey.records.iter().map(|r| r.option).collect();
        assert_eq!(options, vec![0, 2, 1, 2]);
    }

    #[test]
    fn option_index_comes_from_column_suffix() {
        assert_eq!(rating_option_index("QA_12", "QA_").unwrap().unwrap(), 12);
        assert!(rating_option_index("Brand", "QA_").is_none());
        let err = rating_option_index("QA_x", "QA_").unwrap().unwrap_err();
        assert!(matches!(err, ConjointError::UnparseableColumn { .. }), "{err}");
    }

    #[test]
    fn unparseable_rating_column_fails_load() {
        let csv = "ID,Brand,QA_0,QA_total\n1,iOS,3,9\n";
        let err = read_survey(csv.as_bytes(), &layout()).unwrap_err();
        assert!(matches!(err, ConjointError::UnparseableColumn { .. }), "{err}");
    }

    #[test]
    fn non_numeric_rating_is_rejected() {
        let csv = "ID,Brand,QA_0\n1,iOS,high\n";
        let err = read_survey(csv.as_bytes(), &layout()).unwrap_err();
        assert!(matches!(err, ConjointError::InvalidRating { line: 2, .. }), "{err}");
    }

    #[test]
    fn missing_group_column_is_reported() {
        let csv = "ID,QA_0\n1,3\n";
        let err = read_survey(csv.as_bytes(), &layout()).unwrap_err();
        assert!(
            matches!(err, ConjointError::MissingColumn { ref column, .. } if column == "Brand"),
            "{err}"
        );
    }

    #[test]
    fn duplicate_respondent_is_rejected() {
        let csv = "ID,Brand,QA_0\n1,iOS,3\n1,iOS,4\n";
        let err = read_survey(csv.as_bytes(), &layout()).unwrap_err();
        assert!(matches!(err, ConjointError::DuplicateRespondent(_)), "{err}");
    }

    #[test]
    fn two_columns_for_one_option_are_rejected() {
        let csv = "ID,Brand,QA_0,QA_1,QA_01,QA_2,QA_3\n1,a,1,2,9,3,4\n";
        let err = read_survey(csv.as_bytes(), &layout()).unwrap_err();
        assert!(
            matches!(
                err,
                ConjointError::DuplicateOptionColumn { option: 1, ref first, ref second }
                    if first == "QA_1" && second == "QA_01"
            ),
            "{err}"
        );
    }

    #[test]
    fn group_column_sharing_the_prefix_is_not_a_rating() {
        let layout = SurveyLayout {
            group_column: "QA_brand".into(),
            ..SurveyLayout::default()
        };
        let csv = "ID,QA_brand,QA_0,QA_1\n1,iOS,3,4\n";
        let survey = read_survey(csv.as_bytes(), &layout).unwrap();
        assert_eq!(survey.rating_columns.len(), 2);
        assert_eq!(survey.records.len(), 2);
        assert_eq!(survey.records[0].group, "iOS");
    }

    #[test]
    fn custom_layout_is_honoured() {
        let layout = SurveyLayout {
            id_column: "resp".into(),
            group_column: "OS".into(),
            rating_prefix: "Q".into(),
        };
        let csv = "\u{feff}resp,OS,Q1,Q2\nA,x,1,2\n";
        let survey = read_survey(csv.as_bytes(), &layout).unwrap();
        assert_eq!(survey.records.len(), 2);
        assert_eq!(survey.records[1].option, 2);
    }
}
