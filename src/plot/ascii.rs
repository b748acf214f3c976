//! Text grouped-bar chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-width rows), optimized for:
//! - quick visual comparison of groups in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! One row per (level, group). Bars grow left of the `|` axis for negative
//! utilities and right of it for positive ones; each group gets its own mark.

use crate::fit::UtilityReport;

/// Bar marks, cycled per group.
const MARKS: [char; 6] = ['#', '=', '*', '+', 'o', '%'];

/// Minimum bar length on each side of the axis.
const MIN_HALF: usize = 3;

/// Longest group name shown before truncation.
const MAX_GROUP_WIDTH: usize = 12;

/// Render per-group utilities as horizontal grouped bars within `width` columns.
pub fn render_group_bars(report: &UtilityReport, width: usize) -> String {
    let labels = report.schema.labels();
    let groups: Vec<String> = report
        .by_group
        .iter()
        .map(|g| g.group.chars().take(MAX_GROUP_WIDTH).collect())
        .collect();

    let level_w = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let group_w = groups.iter().map(|g| g.chars().count()).max().unwrap_or(0);
    // Fixed columns: three separators, the axis, and an 8-wide value.
    let half = (width.saturating_sub(level_w + group_w + 12) / 2).max(MIN_HALF);

    let max_abs = report
        .by_group
        .iter()
        .flat_map(|g| g.utilities.utilities.iter())
        .map(|v| v.abs())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let legend: Vec<String> = groups
        .iter()
        .enumerate()
        .map(|(j, g)| format!("{}={g}", MARKS[j % MARKS.len()]))
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "Utilities by group | max |u|={max_abs:.3} | {}\n",
        legend.join(" ")
    ));

    for (i, label) in labels.iter().enumerate() {
        for (j, (g, name)) in report.by_group.iter().zip(&groups).enumerate() {
            let v = g.utilities.utilities[i];
            let cells = bar(v, max_abs, half, MARKS[j % MARKS.len()]);
            let level = if j == 0 { *label } else { "" };
            let line = format!("{level:<level_w$} {name:<group_w$} {cells} {v:>+8.3}");
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out
}

fn bar(v: f64, max_abs: f64, half: usize, mark: char) -> String {
    let len = if max_abs > 0.0 && v.is_finite() {
        ((v.abs() / max_abs) * half as f64).round() as usize
    } else {
        0
    }
    .min(half);

    let fill: String = std::iter::repeat_n(mark, len).collect();
    if v < 0.0 {
        format!("{}{fill}|{}", " ".repeat(half - len), " ".repeat(half))
    } else {
        format!("{}|{fill}{}", " ".repeat(half), " ".repeat(half - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::merge_responses;
    use crate::domain::ResponseRecord;
    use crate::fit::estimate_utilities;
    use crate::io::read_design;
    use crate::models::CanonicalSchema;

    fn report(groups: &[&str]) -> UtilityReport {
        let design = read_design(",0,1,2,3\nScreen,5in,5in,6in,6in\nPrice,low,high,low,high\n".as_bytes()).unwrap();
        let mut records = Vec::new();
        for (i, group) in groups.iter().enumerate() {
            for o in 0..4 {
                records.push(ResponseRecord {
                    respondent: (i + 1).to_string(),
                    group: group.to_string(),
                    option: o,
                    rating: (o + 1) as f64,
                });
            }
        }
        let merged = merge_responses(&records, &design).unwrap();
        estimate_utilities(&merged, &CanonicalSchema::from_design(&design)).unwrap()
    }

    #[test]
    fn group_bars_golden_snapshot_small() {
        let mut report = report(&["A"]);
        report.by_group[0].utilities.utilities = vec![1.0, -0.5, 0.0, 0.25];

        let txt = render_group_bars(&report, 24);
        let expected = concat!(
            "Utilities by group | max |u|=1.000 | #=A\n",
            "5in  A    |###   +1.000\n",
            "6in  A  ##|      -0.500\n",
            "high A    |      +0.000\n",
            "low  A    |#     +0.250\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn each_group_gets_its_own_row_and_mark() {
        let report = report(&["iOS", "Android"]);
        let txt = render_group_bars(&report, 60);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 1 + 4 * 2);
        assert!(lines[0].ends_with("#=Android ==iOS"), "{}", lines[0]);
        assert!(lines[1].starts_with("5in  Android"));
        assert!(lines[2].starts_with("     iOS"));
    }
}
