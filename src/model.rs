//! Core data model - typed rupture records and grouping dimensions

use serde::{Deserialize, Serialize};

/// Canonical column names, as they appear in the source spreadsheets.
pub const COL_PRODUCT: &str = "PRODUCT_ID";
pub const COL_SITE: &str = "SITE_ID";
pub const COL_MONTH: &str = "MONTH";
pub const COL_CHAIN: &str = "chain_code";
pub const COL_RUPTURE: &str = "rupture";

/// Columns every upload must provide (matched case-insensitively).
pub const REQUIRED_COLUMNS: [&str; 5] = [COL_PRODUCT, COL_SITE, COL_MONTH, COL_CHAIN, COL_RUPTURE];

/// One validated stock-outage row.
///
/// Identifier fields are formatted to text once, here, so downstream axis
/// labeling never mutates aggregate data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutageRecord {
    pub product_id: String,
    pub site_id: String,
    pub month: String,
    pub chain_code: String,
    /// Non-negative outage count. Non-numeric source values are coerced to
    /// 0.0 by the validator, which counts the affected rows.
    pub rupture: f64,
}

/// A validated, read-only table of outage records.
#[derive(Debug, Clone, Default)]
pub struct OutageTable {
    pub records: Vec<OutageRecord>,
    /// Number of rows whose rupture value could not be parsed and was
    /// coerced to 0.0.
    pub coerced_rows: usize,
}

impl OutageTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of rupture over the whole table.
    pub fn total_rupture(&self) -> f64 {
        self.records.iter().map(|r| r.rupture).sum()
    }

    /// All rupture values in row order.
    pub fn rupture_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.rupture).collect()
    }
}

/// A groupable field of an outage record. An ordered slice of dimensions
/// forms a group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Product,
    Site,
    Month,
    Chain,
}

impl Dimension {
    /// The canonical column name for this dimension.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Product => COL_PRODUCT,
            Dimension::Site => COL_SITE,
            Dimension::Month => COL_MONTH,
            Dimension::Chain => COL_CHAIN,
        }
    }

    /// The value of this dimension for a given record.
    pub fn value(self, record: &OutageRecord) -> &str {
        match self {
            Dimension::Product => &record.product_id,
            Dimension::Site => &record.site_id,
            Dimension::Month => &record.month,
            Dimension::Chain => &record.chain_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rupture: f64) -> OutageRecord {
        OutageRecord {
            product_id: "P1".to_string(),
            site_id: "S1".to_string(),
            month: "Jan".to_string(),
            chain_code: "C1".to_string(),
            rupture,
        }
    }

    #[test]
    fn test_total_rupture() {
        let table = OutageTable {
            records: vec![record(5.0), record(3.0), record(2.0)],
            coerced_rows: 0,
        };
        assert_eq!(table.total_rupture(), 10.0);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_dimension_accessors() {
        let r = record(1.0);
        assert_eq!(Dimension::Product.value(&r), "P1");
        assert_eq!(Dimension::Site.value(&r), "S1");
        assert_eq!(Dimension::Month.value(&r), "Jan");
        assert_eq!(Dimension::Chain.value(&r), "C1");
        assert_eq!(Dimension::Chain.column(), "chain_code");
    }
}
