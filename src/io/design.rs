//! Orthogonal design CSV ingest.
//!
//! Expected layout (attributes as rows, options as columns):
//!
//! ```text
//! ,0,1,2,3
//! Screen,5in,5in,6in,6in
//! Price,low,high,low,high
//! ```
//!
//! The first header cell is ignored; every other header cell is an option
//! index. Attribute order is preserved because it fixes the column order of
//! every downstream table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::domain::Design;
use crate::error::ConjointError;

/// Load the design table from a CSV file.
pub fn load_design(path: &Path) -> Result<Design, ConjointError> {
    let file = File::open(path).map_err(|e| ConjointError::io(path, e))?;
    let design = read_design(file)?;
    info!(
        path = %path.display(),
        attributes = design.attributes.len(),
        options = design.options.len(),
        "loaded design"
    );
    Ok(design)
}

/// Parse a design table from any reader.
pub fn read_design<R: Read>(reader: R) -> Result<Design, ConjointError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let option_ids = headers
        .iter()
        .skip(1)
        .map(parse_option_index)
        .collect::<Result<Vec<i64>, _>>()?;

    let mut names = Vec::new();
    let mut cells = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        let record = result?;

        if record.len() != option_ids.len() + 1 {
            return Err(ConjointError::MalformedDesign(format!(
                "line {line}: expected {} cells, found {}",
                option_ids.len() + 1,
                record.len()
            )));
        }

        names.push(record.get(0).unwrap_or_default().to_string());
        cells.push(record.iter().skip(1).map(str::to_string).collect());
    }

    Design::from_cells(names, option_ids, cells)
}

fn parse_option_index(raw: &str) -> Result<i64, ConjointError> {
    let s = raw.trim().trim_start_matches('\u{feff}');
    s.parse::<i64>()
        .map_err(|_| ConjointError::MalformedDesign(format!("option index '{s}' is not an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_attribute_rows() {
        let csv = "\u{feff},0,1,2,3\nScreen,5in,5in,6in,6in\nPrice,low,high,low,high\n";
        let design = read_design(csv.as_bytes()).unwrap();

        let names: Vec<&str> = design.attribute_names().collect();
        assert_eq!(names, vec!["Screen", "Price"]);
        assert_eq!(design.options.len(), 4);
        assert_eq!(design.level_name(2, 0), Some("6in"));
        assert_eq!(design.level_name(1, 1), Some("high"));
    }

    #[test]
    fn non_integer_option_index_is_malformed() {
        let csv = ",0,one\nScreen,5in,6in\n";
        let err = read_design(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ConjointError::MalformedDesign(_)), "{err}");
    }

    #[test]
    fn empty_cell_is_malformed() {
        let csv = ",0,1\nScreen,5in,\n";
        let err = read_design(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ConjointError::MalformedDesign(_)), "{err}");
    }

    #[test]
    fn ragged_row_is_malformed() {
        let csv = ",0,1\nScreen,5in\n";
        let err = read_design(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ConjointError::MalformedDesign(_)), "{err}");
    }
}
