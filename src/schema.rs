//! Schema Validator - required-column checks and rupture coercion
//!
//! Turns a raw DataFrame into a typed `OutageTable`. Fails fast with a
//! `Schema` error naming every missing column before any aggregation runs.
//!
//! Coercion policy (fixed): a rupture value that is missing, cannot be
//! parsed as a number, or is non-finite is coerced to 0.0 and counted in
//! `OutageTable::coerced_rows`, never silently dropped. Dropping rows would
//! shift the group counts behind every mean; zero-coercion keeps sums
//! auditable.

use crate::error::{Result, RuptureError};
use crate::model::{OutageRecord, OutageTable, COL_RUPTURE, REQUIRED_COLUMNS};
use polars::prelude::*;
use tracing::warn;

/// Validate a raw table and build the typed `OutageTable`.
pub fn validate(df: &DataFrame) -> Result<OutageTable> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    // Resolve each canonical column case-insensitively; report canonical
    // spellings for whatever is absent.
    let mut missing = Vec::new();
    let mut resolved = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for canonical in REQUIRED_COLUMNS {
        match names.iter().find(|n| n.eq_ignore_ascii_case(canonical)) {
            Some(actual) => resolved.push(actual.clone()),
            None => missing.push(canonical.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(RuptureError::Schema { missing });
    }

    let product_col = df.column(&resolved[0])?;
    let site_col = df.column(&resolved[1])?;
    let month_col = df.column(&resolved[2])?;
    let chain_col = df.column(&resolved[3])?;
    let rupture_col = df.column(&resolved[4])?;

    let mut records = Vec::with_capacity(df.height());
    let mut coerced_rows = 0usize;
    for i in 0..df.height() {
        let rupture = match coerce_rupture(&rupture_col.get(i)?) {
            Some(v) => v,
            None => {
                coerced_rows += 1;
                0.0
            }
        };
        records.push(OutageRecord {
            product_id: format_label(&product_col.get(i)?),
            site_id: format_label(&site_col.get(i)?),
            month: format_label(&month_col.get(i)?),
            chain_code: format_label(&chain_col.get(i)?),
            rupture,
        });
    }

    if coerced_rows > 0 {
        warn!(
            "{} row(s) had missing or non-numeric {} values, coerced to 0",
            coerced_rows, COL_RUPTURE
        );
    }

    Ok(OutageTable { records, coerced_rows })
}

/// Parse one rupture cell as a number, whatever dtype the reader inferred.
/// Non-finite values (NaN, infinities) count as non-numeric: a single NaN
/// would otherwise poison every downstream sum.
fn coerce_rupture(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Float64(v) => Some(*v).filter(|v| v.is_finite()),
        AnyValue::Float32(v) => Some(*v as f64).filter(|v| v.is_finite()),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::Int32(v) => Some(*v as f64),
        AnyValue::Int16(v) => Some(*v as f64),
        AnyValue::Int8(v) => Some(*v as f64),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::UInt32(v) => Some(*v as f64),
        AnyValue::UInt16(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(*v as f64),
        AnyValue::String(s) => parse_finite(s),
        AnyValue::StringOwned(s) => parse_finite(s),
        _ => None,
    }
}

/// `str::parse::<f64>` accepts "nan" and "inf"; those are not usable counts.
fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format an identifier cell as a text label. This is the single place where
/// identifiers become axis-ready strings.
fn format_label(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_numeric_label(*v),
        AnyValue::Float32(v) => format_numeric_label(*v as f64),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => format!("{:?}", other),
    }
}

fn format_numeric_label(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
