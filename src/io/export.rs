//! CSV exports: the three utility tables and synthetic study files.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts; an optional UTF-8 BOM makes spreadsheet tools detect the encoding
//! of non-ASCII attribute and level names.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::SyntheticStudy;
use crate::domain::{Design, SurveyLayout};
use crate::error::ConjointError;
use crate::fit::UtilityReport;

pub const RESPONDENT_FILE: &str = "utilities_by_respondent.csv";
pub const GROUP_FILE: &str = "utilities_by_group.csv";
pub const AGGREGATE_FILE: &str = "utilities_aggregate.csv";
pub const DESIGN_FILE: &str = "design.csv";
pub const SURVEY_FILE: &str = "survey.csv";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Paths of the written utility tables.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub by_respondent: PathBuf,
    pub by_group: PathBuf,
    pub aggregate: PathBuf,
}

/// Paths of a written synthetic study.
#[derive(Debug, Clone)]
pub struct StudyPaths {
    pub design: PathBuf,
    pub survey: PathBuf,
}

/// Write per-respondent, per-group and aggregate utility tables into `out_dir`.
pub fn write_utility_tables(
    out_dir: &Path,
    report: &UtilityReport,
    layout: &SurveyLayout,
    bom: bool,
) -> Result<OutputPaths, ConjointError> {
    create_dir_all(out_dir).map_err(|e| ConjointError::io(out_dir, e))?;

    let paths = OutputPaths {
        by_respondent: out_dir.join(RESPONDENT_FILE),
        by_group: out_dir.join(GROUP_FILE),
        aggregate: out_dir.join(AGGREGATE_FILE),
    };

    write_csv(&paths.by_respondent, bom, |w| write_respondent_table(w, report, layout))?;
    write_csv(&paths.by_group, bom, |w| write_group_table(w, report, layout))?;
    write_csv(&paths.aggregate, bom, |w| write_aggregate_table(w, report))?;

    info!(dir = %out_dir.display(), "wrote utility tables");
    Ok(paths)
}

/// Columns: id, group, one column per level label.
pub fn write_respondent_table<W: Write>(
    w: &mut csv::Writer<W>,
    report: &UtilityReport,
    layout: &SurveyLayout,
) -> Result<(), ConjointError> {
    let mut header = vec![layout.id_column.as_str(), layout.group_column.as_str()];
    header.extend(report.schema.labels());
    w.write_record(&header)?;

    for r in &report.by_respondent {
        let mut row = vec![r.respondent.clone(), r.group.clone()];
        row.extend(r.utilities.utilities.iter().map(|v| fmt_value(*v)));
        w.write_record(&row)?;
    }
    Ok(())
}

/// Columns: group, one column per level label.
pub fn write_group_table<W: Write>(
    w: &mut csv::Writer<W>,
    report: &UtilityReport,
    layout: &SurveyLayout,
) -> Result<(), ConjointError> {
    let mut header = vec![layout.group_column.as_str()];
    header.extend(report.schema.labels());
    w.write_record(&header)?;

    for g in &report.by_group {
        let mut row = vec![g.group.clone()];
        row.extend(g.utilities.utilities.iter().map(|v| fmt_value(*v)));
        w.write_record(&row)?;
    }
    Ok(())
}

/// One row per schema column: attribute, level, utility.
pub fn write_aggregate_table<W: Write>(w: &mut csv::Writer<W>, report: &UtilityReport) -> Result<(), ConjointError> {
    w.write_record(["attribute", "level", "utility"])?;
    for (col, v) in report.schema.columns().iter().zip(&report.aggregate.utilities) {
        w.write_record([col.attribute_name.as_str(), col.label(), fmt_value(*v).as_str()])?;
    }
    Ok(())
}

/// Write a synthetic study as `design.csv` + `survey.csv` into `out_dir`.
pub fn write_study(
    out_dir: &Path,
    study: &SyntheticStudy,
    layout: &SurveyLayout,
    bom: bool,
) -> Result<StudyPaths, ConjointError> {
    create_dir_all(out_dir).map_err(|e| ConjointError::io(out_dir, e))?;

    let paths = StudyPaths {
        design: out_dir.join(DESIGN_FILE),
        survey: out_dir.join(SURVEY_FILE),
    };
    write_csv(&paths.design, bom, |w| write_design_table(w, &study.design))?;
    write_csv(&paths.survey, bom, |w| write_survey_table(w, study, layout))?;

    info!(
        dir = %out_dir.display(),
        respondents = study.respondents.len(),
        "wrote synthetic study"
    );
    Ok(paths)
}

/// Attributes as rows, option indices as columns.
pub fn write_design_table<W: Write>(w: &mut csv::Writer<W>, design: &Design) -> Result<(), ConjointError> {
    let mut header = vec![String::new()];
    header.extend(design.options.keys().map(ToString::to_string));
    w.write_record(&header)?;

    for (a, attr) in design.attributes.iter().enumerate() {
        let mut row = vec![attr.name.as_str()];
        row.extend(design.options.values().map(|levels| attr.levels[levels[a]].as_str()));
        w.write_record(&row)?;
    }
    Ok(())
}

fn write_survey_table<W: Write>(
    w: &mut csv::Writer<W>,
    study: &SyntheticStudy,
    layout: &SurveyLayout,
) -> Result<(), ConjointError> {
    let mut header = vec![layout.id_column.clone(), layout.group_column.clone()];
    header.extend(study.option_ids.iter().map(|o| format!("{}{o}", layout.rating_prefix)));
    w.write_record(&header)?;

    for r in &study.respondents {
        let mut row = vec![r.id.clone(), r.group.clone()];
        row.extend(r.ratings.iter().map(|v| v.map(fmt_value).unwrap_or_default()));
        w.write_record(&row)?;
    }
    Ok(())
}

fn write_csv<F>(path: &Path, bom: bool, body: F) -> Result<(), ConjointError>
where
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), ConjointError>,
{
    let mut file = File::create(path).map_err(|e| ConjointError::io(path, e))?;
    if bom {
        file.write_all(UTF8_BOM).map_err(|e| ConjointError::io(path, e))?;
    }
    let mut writer = csv::Writer::from_writer(file);
    body(&mut writer)?;
    writer.flush().map_err(|e| ConjointError::io(path, e))?;
    Ok(())
}

/// Shortest representation that round-trips to the same `f64`.
fn fmt_value(v: f64) -> String {
    format!("{v}")
}
