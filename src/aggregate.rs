//! Aggregation Engine - grouped sums, means and top-N rankings
//!
//! Pure functions of a validated `OutageTable`. Grouping is sparse: only
//! key combinations present in the input appear in the output. `BTreeMap`
//! keys give deterministic iteration order for display.

use crate::model::{Dimension, OutageRecord, OutageTable};
use std::collections::BTreeMap;

/// The group-key values of one record, in key order.
pub fn key_of(record: &OutageRecord, keys: &[Dimension]) -> Vec<String> {
    keys.iter().map(|d| d.value(record).to_string()).collect()
}

/// Sum of rupture per distinct key combination.
pub fn group_sum(table: &OutageTable, keys: &[Dimension]) -> BTreeMap<Vec<String>, f64> {
    let mut groups: BTreeMap<Vec<String>, f64> = BTreeMap::new();
    for record in &table.records {
        *groups.entry(key_of(record, keys)).or_insert(0.0) += record.rupture;
    }
    groups
}

/// Arithmetic mean of rupture per distinct key combination.
pub fn group_mean(table: &OutageTable, keys: &[Dimension]) -> BTreeMap<Vec<String>, f64> {
    let mut sums: BTreeMap<Vec<String>, (f64, usize)> = BTreeMap::new();
    for record in &table.records {
        let entry = sums.entry(key_of(record, keys)).or_insert((0.0, 0));
        entry.0 += record.rupture;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// The `n` key combinations with the largest summed rupture, descending.
/// Ties are broken by ascending key ordering so the ranking is stable.
/// Returns every group when `n` exceeds the distinct-group count.
pub fn top_n(table: &OutageTable, keys: &[Dimension], n: usize) -> Vec<(Vec<String>, f64)> {
    let mut entries: Vec<(Vec<String>, f64)> = group_sum(table, keys).into_iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutageRecord;

    fn row(product: &str, site: &str, month: &str, chain: &str, rupture: f64) -> OutageRecord {
        OutageRecord {
            product_id: product.to_string(),
            site_id: site.to_string(),
            month: month.to_string(),
            chain_code: chain.to_string(),
            rupture,
        }
    }

    fn sample_table() -> OutageTable {
        OutageTable {
            records: vec![
                row("P1", "S1", "Jan", "C1", 5.0),
                row("P1", "S1", "Feb", "C1", 3.0),
                row("P2", "S1", "Jan", "C1", 2.0),
            ],
            coerced_rows: 0,
        }
    }

    #[test]
    fn test_group_sum_by_product() {
        let table = sample_table();
        let sums = group_sum(&table, &[Dimension::Product]);
        assert_eq!(sums.len(), 2);
        assert_eq!(sums[&vec!["P1".to_string()]], 8.0);
        assert_eq!(sums[&vec!["P2".to_string()]], 2.0);
    }

    #[test]
    fn test_group_sum_conservation() {
        let table = sample_table();
        for keys in [
            vec![Dimension::Product],
            vec![Dimension::Site, Dimension::Month],
            vec![
                Dimension::Product,
                Dimension::Site,
                Dimension::Month,
                Dimension::Chain,
            ],
        ] {
            let total: f64 = group_sum(&table, &keys).values().sum();
            assert_eq!(total, table.total_rupture());
        }
    }

    #[test]
    fn test_grouping_is_sparse() {
        // P2 only appears in Jan: no (P2, Feb) combination is synthesized.
        let table = sample_table();
        let sums = group_sum(&table, &[Dimension::Product, Dimension::Month]);
        assert_eq!(sums.len(), 3);
        assert!(!sums.contains_key(&vec!["P2".to_string(), "Feb".to_string()]));
    }

    #[test]
    fn test_group_mean_single_row_equals_value() {
        let table = sample_table();
        let means = group_mean(&table, &[Dimension::Product]);
        assert_eq!(means[&vec!["P2".to_string()]], 2.0);
        assert!((means[&vec!["P1".to_string()]] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_n_ordering_and_truncation() {
        let table = sample_table();
        let top = top_n(&table, &[Dimension::Product], 1);
        assert_eq!(top, vec![(vec!["P1".to_string()], 8.0)]);

        // n larger than the distinct-group count returns all groups
        let all = top_n(&table, &[Dimension::Product], 10);
        assert_eq!(all.len(), 2);
        assert!(all[0].1 >= all[1].1);
    }

    #[test]
    fn test_top_n_ties_broken_by_key() {
        let table = OutageTable {
            records: vec![
                row("P2", "S1", "Jan", "C1", 4.0),
                row("P1", "S1", "Jan", "C1", 4.0),
            ],
            coerced_rows: 0,
        };
        let top = top_n(&table, &[Dimension::Product], 2);
        assert_eq!(top[0].0, vec!["P1".to_string()]);
        assert_eq!(top[1].0, vec!["P2".to_string()]);
    }

    #[test]
    fn test_empty_table_yields_empty_results() {
        let table = OutageTable::default();
        assert!(group_sum(&table, &[Dimension::Product]).is_empty());
        assert!(group_mean(&table, &[Dimension::Site]).is_empty());
        assert!(top_n(&table, &[Dimension::Product], 5).is_empty());
    }

    #[test]
    fn test_group_sum_is_idempotent() {
        let table = sample_table();
        let first = group_sum(&table, &[Dimension::Product, Dimension::Month]);
        let second = group_sum(&table, &[Dimension::Product, Dimension::Month]);
        assert_eq!(first, second);
    }
}
