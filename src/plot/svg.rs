//! Grouped-bar SVG chart of per-group utilities, rendered with Plotters.
//!
//! One cluster of bars per level label along the x axis, one bar per group
//! inside each cluster, and a zero baseline.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::error::ConjointError;
use crate::fit::UtilityReport;

const HEIGHT: u32 = 520;
const MIN_WIDTH: u32 = 640;
/// Horizontal pixels budgeted per level cluster.
const PX_PER_LEVEL: u32 = 70;
/// Fraction of each cluster slot occupied by bars.
const CLUSTER_FILL: f64 = 0.8;

/// Write the per-group utilities as a grouped-bar SVG chart.
pub fn write_group_chart_svg(path: &Path, report: &UtilityReport, title: &str) -> Result<(), ConjointError> {
    let labels = report.schema.labels();
    let groups = &report.by_group;
    if labels.is_empty() || groups.is_empty() {
        return Err(ConjointError::Chart("no group utilities to plot".into()));
    }

    let (lo, hi) = value_range(report);
    let n = labels.len();
    let width = MIN_WIDTH.max(PX_PER_LEVEL * n as u32 + 120);

    let root = SVGBackend::new(path, (width, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..n as f64, lo..hi)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc("utility")
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()
        .map_err(chart_err)?;

    let bar_w = CLUSTER_FILL / groups.len() as f64;
    let pad = (1.0 - CLUSTER_FILL) / 2.0;
    for (j, g) in groups.iter().enumerate() {
        let style = Palette99::pick(j).mix(0.9).filled();
        let values = &g.utilities.utilities;
        chart
            .draw_series(values.iter().enumerate().map(move |(i, &v)| {
                let x0 = i as f64 + pad + j as f64 * bar_w;
                Rectangle::new([(x0, 0.0), (x0 + bar_w, v)], style)
            }))
            .map_err(chart_err)?
            .label(g.group.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], style));
    }

    chart
        .draw_series(std::iter::once(PathElement::new(vec![(0.0, 0.0), (n as f64, 0.0)], BLACK)))
        .map_err(chart_err)?;

    // Level labels under each cluster, in backend pixels below the plot area.
    let label_style = TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for (i, label) in labels.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(i as f64 + 0.5, lo));
        root.draw(&Text::new(label.to_string(), (px, py + 6), label_style.clone()))
            .map_err(chart_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    info!(path = %path.display(), groups = groups.len(), levels = n, "wrote utility chart");
    Ok(())
}

/// Y range covering every group utility and zero, padded by 10%.
fn value_range(report: &UtilityReport) -> (f64, f64) {
    let (mut lo, mut hi) = (0.0_f64, 0.0_f64);
    for v in report
        .by_group
        .iter()
        .flat_map(|g| g.utilities.utilities.iter())
        .filter(|v| v.is_finite())
    {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    let span = (hi - lo).max(1e-6);
    (lo - 0.1 * span, hi + 0.1 * span)
}

fn chart_err<E: std::fmt::Display>(e: E) -> ConjointError {
    ConjointError::Chart(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::merge_responses;
    use crate::domain::ResponseRecord;
    use crate::fit::estimate_utilities;
    use crate::io::read_design;
    use crate::models::CanonicalSchema;

    fn report() -> UtilityReport {
        let design = read_design(",0,1,2,3\nScreen,5in,5in,6in,6in\nPrice,low,high,low,high\n".as_bytes()).unwrap();
        let mut records = Vec::new();
        for (id, group, scale) in [("1", "iOS", 1.0), ("2", "Android", -1.0)] {
            for o in 0..4 {
                records.push(ResponseRecord {
                    respondent: id.to_string(),
                    group: group.to_string(),
                    option: o,
                    rating: scale * (o + 1) as f64,
                });
            }
        }
        let merged = merge_responses(&records, &design).unwrap();
        estimate_utilities(&merged, &CanonicalSchema::from_design(&design)).unwrap()
    }

    #[test]
    fn range_includes_zero_and_pads() {
        let (lo, hi) = value_range(&report());
        assert!(lo < 0.0 && hi > 0.0);
    }

    #[test]
    fn writes_svg_with_group_legend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        write_group_chart_svg(&path, &report(), "Utilities by Brand").unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Android"));
        assert!(svg.contains("iOS"));
        assert!(svg.contains("5in"));
    }
}
