//! Run configuration.
//!
//! Plain structs built from CLI arguments (see `app::estimate_config_from_args`)
//! so the library never reads argv or the environment itself.

use std::path::PathBuf;

/// Where identity, group and rating values live in the survey table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyLayout {
    pub id_column: String,
    pub group_column: String,
    /// Rating columns are named `<prefix><option index>`.
    pub rating_prefix: String,
}

impl Default for SurveyLayout {
    fn default() -> Self {
        Self {
            id_column: "ID".to_string(),
            group_column: "Brand".to_string(),
            rating_prefix: "QA_".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EstimateConfig {
    pub design_path: PathBuf,
    pub survey_path: PathBuf,
    pub layout: SurveyLayout,
    pub out_dir: PathBuf,
    /// Prefix CSV output with a UTF-8 BOM so spreadsheets detect the encoding.
    pub excel_bom: bool,
    pub export_json: Option<PathBuf>,
    pub chart_svg: Option<PathBuf>,
    pub plot: bool,
    pub plot_width: usize,
}

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub respondents: usize,
    pub seed: u64,
    pub groups: Vec<String>,
    /// Probability that a respondent leaves an option unrated.
    pub skip_prob: f64,
    /// Standard deviation of respondent-level part-worth noise.
    pub respondent_sd: f64,
    /// Standard deviation of per-rating noise.
    pub noise_sd: f64,
    pub layout: SurveyLayout,
    pub out_dir: PathBuf,
    pub excel_bom: bool,
}
