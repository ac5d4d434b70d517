//! CSV reading and writing for datasets.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it contains
//!   any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas are handled correctly
//!
//! Every data row holds exactly `input_count + ideal_count` cells: the
//! inputs first, then the ideals.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parses CSV text into a dataset with the given input/ideal split.
pub fn parse_csv(text: &str, input_count: usize, ideal_count: usize) -> Result<Dataset> {
    let width = input_count + ideal_count;
    let mut lines = text.lines().peekable();

    // Auto-detect header: skip first line if any cell is non-numeric.
    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut values: Vec<f64> = Vec::new();
    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if cells.len() != width {
            return Err(NetError::Dataset(format!(
                "Row {}: expected {} columns ({} input + {} ideal), got {}",
                row_idx + 1,
                width,
                input_count,
                ideal_count,
                cells.len()
            )));
        }
        values.extend(parse_floats(&cells, row_idx + 1)?);
    }

    Dataset::from_flat(input_count, ideal_count, values)
}

/// Reads a CSV file into a dataset.
pub fn load<P: AsRef<Path>>(path: P, input_count: usize, ideal_count: usize) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text, input_count, ideal_count)
}

/// Writes one record per line, every value with `decimals` digits after
/// the decimal point.
pub fn write<W: Write>(writer: &mut W, data: &Dataset, decimals: usize) -> Result<()> {
    for (input, ideal) in data.iter() {
        let line = input
            .iter()
            .chain(ideal)
            .map(|v| format!("{:.*}", decimals, v))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

pub fn save<P: AsRef<Path>>(path: P, data: &Dataset, decimals: usize) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, data, decimals)?;
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    let cells = parse_csv_row(line);
    cells.iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parses a slice of string cells as `f64`, returning an error with row info on failure.
fn parse_floats(cells: &[String], row_num: usize) -> Result<Vec<f64>> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| {
                NetError::Dataset(format!("Row {}: '{}' is not a valid number", row_num, c))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_skipped_and_split_applied() {
        let text = "x1,x2,y\n0,0,0\n1,0,1\n\n0,1,1\n1,1,0\n";
        let data = parse_csv(text, 2, 1).unwrap();
        assert_eq!(data.record_count(), 4);
        assert_eq!(data.input(3), &[1.0, 1.0]);
        assert_eq!(data.ideal(1), &[1.0]);
    }

    #[test]
    fn quoted_cells_parse() {
        let data = parse_csv("\"1.5\",2,\"3\"\n", 1, 2).unwrap();
        assert_eq!(data.input(0), &[1.5]);
        assert_eq!(data.ideal(0), &[2.0, 3.0]);
    }

    #[test]
    fn wrong_width_and_bad_numbers_fail() {
        assert!(matches!(parse_csv("1,2\n", 2, 1), Err(NetError::Dataset(_))));
        assert!(matches!(parse_csv("1,2,3\n4,x,6\n", 2, 1), Err(NetError::Dataset(_))));
    }

    #[test]
    fn writes_requested_precision() {
        let data = Dataset::from_flat(1, 1, vec![0.123456, -2.0]).unwrap();
        let mut out = Vec::new();
        write(&mut out, &data, 3).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.123,-2.000\n");
    }
}
