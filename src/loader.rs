//! Dataset loader - reads one spreadsheet (CSV or XLSX) into a DataFrame
//!
//! Thin collaborator in front of the validator: no aggregation logic lives
//! here. Workbooks are read from their first sheet only, header row required.

use crate::error::{Result, RuptureError};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// Load a spreadsheet file into a DataFrame, dispatching on the extension.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let df = match ext.as_str() {
        "csv" => read_csv(path)?,
        "xlsx" | "xlsm" => read_workbook(path)?,
        other => {
            return Err(RuptureError::Workbook(format!(
                "unsupported file extension '{}' (expected csv or xlsx)",
                other
            )))
        }
    };

    info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()?
        .collect()?;
    Ok(df)
}

/// Read the first sheet of an XLSX workbook. All cells are carried as text;
/// numeric coercion of the rupture column is the validator's job.
fn read_workbook(path: &Path) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e: calamine::XlsxError| RuptureError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RuptureError::Workbook("workbook has no sheets".to_string()))?
        .map_err(|e| RuptureError::Workbook(e.to_string()))?;

    frame_from_range(&range)
}

/// Convert one sheet range into a DataFrame. The range is rectangular, so
/// the header slice and every data row share `range.width()` cells; blank
/// header cells get generated `column_N` names rather than losing the data
/// beneath them.
fn frame_from_range(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| RuptureError::Workbook("first sheet is empty".to_string()))?
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell_text(cell) {
            Some(name) => name,
            None => format!("column_{}", i),
        })
        .collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
    for row in rows {
        for (i, col) in columns.iter_mut().enumerate() {
            col.push(row.get(i).and_then(cell_text));
        }
    }

    let series: Vec<Series> = header
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name, values))
        .collect();

    Ok(DataFrame::new(series)?)
}

/// Format one workbook cell as text, None for empty/error cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            // Excel stores integer identifiers as floats; keep "101", not "101.0"
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}
