//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs the log subscriber
//! - runs the estimation pipeline
//! - prints summaries/charts
//! - writes the utility tables and optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, EstimateArgs, LayoutArgs, SampleArgs};
use crate::domain::{EstimateConfig, SampleConfig, SurveyLayout};
use crate::error::ConjointError;

pub mod pipeline;

/// Entry point for the `conjoint` binary.
pub fn run() -> Result<(), ConjointError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Estimate(args) => handle_estimate(&estimate_config_from_args(&args)),
        Command::Sample(args) => handle_sample(&sample_config_from_args(&args)),
    }
}

/// Logs go to stderr so stdout stays clean for tables and charts.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_estimate(config: &EstimateConfig) -> Result<(), ConjointError> {
    let run = pipeline::run_estimate(config)?;

    println!("{}", crate::report::format_run_summary(&run));
    if config.plot {
        println!("{}", crate::plot::render_group_bars(&run.report, config.plot_width));
    }

    let paths = crate::io::write_utility_tables(&config.out_dir, &run.report, &config.layout, config.excel_bom)?;
    println!("Wrote {}", paths.by_respondent.display());
    println!("Wrote {}", paths.by_group.display());
    println!("Wrote {}", paths.aggregate.display());

    if let Some(path) = &config.export_json {
        crate::io::write_report_json(path, &run.report)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &config.chart_svg {
        let title = format!("Utilities by {}", config.layout.group_column);
        crate::plot::write_group_chart_svg(path, &run.report, &title)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_sample(config: &SampleConfig) -> Result<(), ConjointError> {
    let study = crate::data::generate_study(config)?;
    let paths = crate::io::write_study(&config.out_dir, &study, &config.layout, config.excel_bom)?;
    println!(
        "Wrote {} and {} ({} respondents, {} options)",
        paths.design.display(),
        paths.survey.display(),
        study.respondents.len(),
        study.option_ids.len(),
    );
    Ok(())
}

fn layout_from_args(args: &LayoutArgs) -> SurveyLayout {
    SurveyLayout {
        id_column: args.id_column.clone(),
        group_column: args.group_column.clone(),
        rating_prefix: args.rating_prefix.clone(),
    }
}

pub fn estimate_config_from_args(args: &EstimateArgs) -> EstimateConfig {
    EstimateConfig {
        design_path: args.design.clone(),
        survey_path: args.survey.clone(),
        layout: layout_from_args(&args.layout),
        out_dir: args.out_dir.clone(),
        excel_bom: !args.no_bom,
        export_json: args.export_json.clone(),
        chart_svg: args.chart_svg.clone(),
        plot: !args.no_plot,
        plot_width: args.width,
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        respondents: args.respondents,
        seed: args.seed,
        groups: args.groups.iter().map(|g| g.trim().to_string()).collect(),
        skip_prob: args.skip_prob,
        respondent_sd: args.respondent_sd,
        noise_sd: args.noise_sd,
        layout: layout_from_args(&args.layout),
        out_dir: args.out_dir.clone(),
        excel_bom: !args.no_bom,
    }
}
