//! Plain-text formatting of estimation results.

use crate::app::pipeline::RunOutput;
use crate::fit::{UtilityReport, labeled};

/// Maximum width of a group column in the per-group table.
const GROUP_COL_WIDTH: usize = 12;

/// Format the full run summary (inputs + partition counts + utility tables).
pub fn format_run_summary(run: &RunOutput) -> String {
    let report = &run.report;
    let mut out = String::new();

    out.push_str("=== conjoint - Part-worth Utility Estimation ===\n");
    out.push_str(&format!(
        "Design: {} attributes | {} options | {} level columns\n",
        run.design.attributes.len(),
        run.design.options.len(),
        report.schema.len(),
    ));
    out.push_str(&format!(
        "Survey: {} respondents | {} ratings used | {} missing\n",
        run.survey.respondents,
        run.merged_rows,
        run.survey.missing_ratings,
    ));
    out.push_str(&format!(
        "Partitions: aggregate | {} groups | {} respondents ({} under-determined)\n",
        report.by_group.len(),
        report.by_respondent.len(),
        report.underdetermined_respondents(),
    ));

    out.push_str("\nAggregate utilities:\n");
    out.push_str(&format_aggregate_table(report));

    out.push_str("\nUtilities by group:\n");
    out.push_str(&format_group_table(report));

    out
}

/// Attribute / level / utility table for the aggregate fit, plus fit quality.
pub fn format_aggregate_table(report: &UtilityReport) -> String {
    let columns = report.schema.columns();
    let attr_w = columns
        .iter()
        .map(|c| c.attribute_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("attribute".len());
    let level_w = columns
        .iter()
        .map(|c| c.label().chars().count())
        .max()
        .unwrap_or(0)
        .max("level".len());

    let mut out = String::new();
    push_line(&mut out, format!("{:<attr_w$} {:<level_w$} {:>10}", "attribute", "level", "utility"));
    push_line(&mut out, format!("{:-<attr_w$} {:-<level_w$} {:->10}", "", "", ""));

    let mut prev_attr = None;
    for (col, v) in columns.iter().zip(&report.aggregate.utilities) {
        // Print the attribute name only on its first level.
        let attr = if prev_attr == Some(col.attribute) {
            ""
        } else {
            col.attribute_name.as_str()
        };
        prev_attr = Some(col.attribute);
        push_line(&mut out, format!("{attr:<attr_w$} {:<level_w$} {v:>10.4}", col.label()));
    }

    let d = &report.aggregate.diagnostics;
    let r2 = d.r_squared.map(|r| format!("{r:.4}")).unwrap_or_else(|| "n/a".to_string());
    push_line(
        &mut out,
        format!("n={} | columns={} | rank={} | SSE={:.4} | R²={r2}", d.n_obs, d.n_columns, d.rank, d.sse),
    );
    out
}

/// Level × group table of reconciled utilities.
pub fn format_group_table(report: &UtilityReport) -> String {
    let level_w = report
        .schema
        .labels()
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max("level".len());

    let mut out = String::new();
    let mut header = format!("{:<level_w$}", "level");
    for g in &report.by_group {
        header.push_str(&format!(" {:>GROUP_COL_WIDTH$}", truncate(&g.group, GROUP_COL_WIDTH)));
    }
    push_line(&mut out, header);

    let mut rule = format!("{:-<level_w$}", "");
    for _ in &report.by_group {
        rule.push_str(&format!(" {:-<GROUP_COL_WIDTH$}", ""));
    }
    push_line(&mut out, rule);

    let rows: Vec<Vec<(&str, f64)>> = report
        .by_group
        .iter()
        .map(|g| labeled(&g.utilities, &report.schema).collect())
        .collect();
    for (i, label) in report.schema.labels().iter().enumerate() {
        let mut line = format!("{label:<level_w$}");
        for row in &rows {
            line.push_str(&format!(" {:>GROUP_COL_WIDTH$.4}", row[i].1));
        }
        push_line(&mut out, line);
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
