//! Descriptive statistics - pandas-style describe() bundles
//!
//! Sample standard deviation (n-1 denominator) and linear-interpolated
//! quartiles. An empty input yields count = 0 with every other field None
//! ("no data"), never a numeric fault.

use crate::aggregate::key_of;
use crate::model::{Dimension, OutageTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive-statistics bundle for one set of rupture values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; None when count < 2.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    pub fn empty() -> Self {
        Summary {
            count: 0,
            mean: None,
            std: None,
            min: None,
            p25: None,
            p50: None,
            p75: None,
            max: None,
        }
    }
}

/// Summarize a slice of values.
pub fn describe(values: &[f64]) -> Summary {
    if values.is_empty() {
        return Summary::empty();
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let std = if count > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(var.sqrt())
    } else {
        None
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Summary {
        count,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        p25: Some(percentile(&sorted, 0.25)),
        p50: Some(percentile(&sorted, 0.50)),
        p75: Some(percentile(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

/// One summary per distinct key combination.
pub fn describe_by(table: &OutageTable, keys: &[Dimension]) -> BTreeMap<Vec<String>, Summary> {
    let mut groups: BTreeMap<Vec<String>, Vec<f64>> = BTreeMap::new();
    for record in &table.records {
        groups
            .entry(key_of(record, keys))
            .or_default()
            .push(record.rupture);
    }
    groups
        .into_iter()
        .map(|(key, values)| (key, describe(&values)))
        .collect()
}

/// Linear-interpolated percentile over a sorted, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
