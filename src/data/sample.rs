//! Synthetic conjoint study generation.
//!
//! Produces an L9 orthogonal design (four three-level attributes, nine
//! options) and a survey whose ratings follow an additive part-worth model:
//!
//! `rating = midpoint + Σ_a worth[group][a][level] + respondent noise + rating noise`
//!
//! rounded to whole points and clamped to the rating scale. The generator is
//! deterministic for a given seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Design, SampleConfig};
use crate::error::ConjointError;

/// L9(3^4) orthogonal array: every pair of columns contains each level pair once.
pub const L9: [[usize; 4]; 9] = [
    [0, 0, 0, 0],
    [0, 1, 1, 1],
    [0, 2, 2, 2],
    [1, 0, 1, 2],
    [1, 1, 2, 0],
    [1, 2, 0, 1],
    [2, 0, 2, 1],
    [2, 1, 0, 2],
    [2, 2, 1, 0],
];

const ATTRIBUTES: [(&str, [&str; 3]); 4] = [
    ("Screen", ["5.4in", "6.1in", "6.7in"]),
    ("Price", ["$499", "$799", "$999"]),
    ("Battery", ["3000mAh", "4000mAh", "5000mAh"]),
    ("Camera", ["12MP", "48MP", "108MP"]),
];

/// Population part-worths (rating points), indexed like `ATTRIBUTES`.
const BASE_WORTHS: [[f64; 3]; 4] = [
    [-0.4, 0.3, 0.1],
    [1.3, 0.1, -1.4],
    [-0.9, 0.1, 0.8],
    [-0.5, 0.2, 0.3],
];

/// Spread of group-level deviations from the population part-worths.
const GROUP_SPREAD: f64 = 0.4;

const RATING_MIN: f64 = 1.0;
const RATING_MAX: f64 = 10.0;
const RATING_MIDPOINT: f64 = 5.5;

#[derive(Debug, Clone)]
pub struct SyntheticRespondent {
    pub id: String,
    pub group: String,
    /// One entry per design option (`SyntheticStudy::option_ids` order); `None` = skipped.
    pub ratings: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct SyntheticStudy {
    pub design: Design,
    pub option_ids: Vec<i64>,
    pub respondents: Vec<SyntheticRespondent>,
}

pub fn generate_study(config: &SampleConfig) -> Result<SyntheticStudy, ConjointError> {
    if config.respondents == 0 {
        return Err(ConjointError::InvalidConfig("respondent count must be > 0".into()));
    }
    if config.groups.is_empty() || config.groups.iter().any(|g| g.trim().is_empty()) {
        return Err(ConjointError::InvalidConfig("at least one non-empty group is required".into()));
    }
    if !(0.0..1.0).contains(&config.skip_prob) {
        return Err(ConjointError::InvalidConfig("skip probability must be in [0, 1)".into()));
    }
    for (name, sd) in [("respondent", config.respondent_sd), ("rating", config.noise_sd)] {
        if !(sd.is_finite() && sd >= 0.0) {
            return Err(ConjointError::InvalidConfig(format!("{name} noise must be finite and >= 0")));
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let unit = Normal::new(0.0, 1.0)
        .map_err(|e| ConjointError::InvalidConfig(format!("noise distribution error: {e}")))?;

    let option_ids: Vec<i64> = (0..L9.len() as i64).collect();
    let design = l9_design(&option_ids)?;

    let group_worths: Vec<[[f64; 3]; 4]> = config
        .groups
        .iter()
        .map(|_| {
            let mut w = BASE_WORTHS;
            for row in w.iter_mut() {
                for v in row.iter_mut() {
                    *v += GROUP_SPREAD * unit.sample(&mut rng);
                }
            }
            w
        })
        .collect();

    let mut respondents = Vec::with_capacity(config.respondents);
    for i in 0..config.respondents {
        let g = rng.gen_range(0..config.groups.len());
        let mut worths = group_worths[g];
        for row in worths.iter_mut() {
            for v in row.iter_mut() {
                *v += config.respondent_sd * unit.sample(&mut rng);
            }
        }

        let ratings = L9
            .iter()
            .map(|profile| {
                if rng.gen_bool(config.skip_prob) {
                    return None;
                }
                let utility: f64 = profile.iter().enumerate().map(|(a, &l)| worths[a][l]).sum();
                let noisy = RATING_MIDPOINT + utility + config.noise_sd * unit.sample(&mut rng);
                Some(noisy.round().clamp(RATING_MIN, RATING_MAX))
            })
            .collect();

        respondents.push(SyntheticRespondent {
            id: (i + 1).to_string(),
            group: config.groups[g].clone(),
            ratings,
        });
    }

    Ok(SyntheticStudy {
        design,
        option_ids,
        respondents,
    })
}

fn l9_design(option_ids: &[i64]) -> Result<Design, ConjointError> {
    let names: Vec<String> = ATTRIBUTES.iter().map(|(name, _)| name.to_string()).collect();
    let cells = ATTRIBUTES
        .iter()
        .enumerate()
        .map(|(a, (_, levels))| {
            L9.iter()
                .map(|profile| levels[profile[a]].to_string())
                .collect::<Vec<String>>()
        })
        .collect();
    Design::from_cells(names, option_ids.to_vec(), cells)
}
