//! Shared estimation pipeline.
//!
//! Keeping the workflow in one place lets the CLI and tests drive the same
//! sequence:
//! design + survey -> merge -> canonical schema -> aggregate/group/respondent fits
//!
//! Nothing is written here; front-ends decide what to print or export.

use crate::data::merge_responses;
use crate::domain::{Design, EstimateConfig};
use crate::error::ConjointError;
use crate::fit::{UtilityReport, estimate_utilities};
use crate::io::{SurveyData, load_design, load_survey};
use crate::models::CanonicalSchema;

/// All computed outputs of a single `conjoint estimate` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub design: Design,
    pub survey: SurveyData,
    /// Rows that survived the join (one per non-missing rating).
    pub merged_rows: usize,
    pub report: UtilityReport,
}

/// Load both input tables and run the estimation.
pub fn run_estimate(config: &EstimateConfig) -> Result<RunOutput, ConjointError> {
    let design = load_design(&config.design_path)?;
    let survey = load_survey(&config.survey_path, &config.layout)?;
    run_with_tables(design, survey)
}

/// Run the estimation over already-loaded tables.
///
/// Validation happens up front: an unknown option aborts before any partition
/// is fitted.
pub fn run_with_tables(design: Design, survey: SurveyData) -> Result<RunOutput, ConjointError> {
    let merged = merge_responses(&survey.records, &design)?;
    let schema = CanonicalSchema::from_design(&design);
    let report = estimate_utilities(&merged, &schema)?;

    Ok(RunOutput {
        design,
        survey,
        merged_rows: merged.len(),
        report,
    })
}
