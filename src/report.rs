//! Report assembly - explicit view toggles, per-view error isolation
//!
//! `ViewConfig` replaces ambient UI checkbox state: the caller says which
//! views to compute and the pipeline recomputes them fresh, side-effect
//! free. A view that fails its spec check becomes a `Failed` entry; the
//! remaining views still render.

use crate::aggregate::{group_mean, group_sum, top_n};
use crate::chart::{
    heatmap_spec, mean_bar_spec, stacked_bar_spec, treemap_spec, ChartSpec, ChartTable,
};
use crate::error::RuptureError;
use crate::model::{Dimension, OutageTable, COL_RUPTURE, REQUIRED_COLUMNS};
use crate::stats::{describe, describe_by, Summary};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Grouping key behind the faceted views, in the canonical column order.
const FULL_KEYS: [Dimension; 4] = [
    Dimension::Product,
    Dimension::Site,
    Dimension::Month,
    Dimension::Chain,
];

const PREVIEW_ROWS: usize = 5;

/// Which views to compute. Defaults mirror the dashboard's initial state;
/// the per-store and per-chain stats views are opt-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub show_heatmap: bool,
    pub show_barplot: bool,
    pub show_treemap: bool,
    pub show_global_stats: bool,
    pub show_product_stats: bool,
    pub show_site_stats: bool,
    pub show_chain_stats: bool,
    pub show_mean_by_product: bool,
    pub show_mean_by_site: bool,
    pub show_top_products: bool,
    /// Length of the top-products ranking.
    pub top_n: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            show_heatmap: true,
            show_barplot: true,
            show_treemap: true,
            show_global_stats: true,
            show_product_stats: true,
            show_site_stats: false,
            show_chain_stats: false,
            show_mean_by_product: true,
            show_mean_by_site: true,
            show_top_products: true,
            top_n: 10,
        }
    }
}

/// A descriptive-statistics table: one row per key combination. The global
/// summary has no key columns and a single row with an empty key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    pub key_columns: Vec<String>,
    pub rows: Vec<StatsRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub key: Vec<String>,
    pub summary: Summary,
}

/// The payload of one rendered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewBody {
    Chart { spec: ChartSpec },
    Stats { table: StatsTable },
    Table { table: ChartTable },
    /// This view failed its spec check; others still render.
    Failed { error: String },
    /// Explicit no-data marker for an empty input table.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub body: ViewBody,
}

/// Everything handed to the presentation layer for one recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub row_count: usize,
    pub coerced_rows: usize,
    pub warnings: Vec<String>,
    /// First rows of the validated table, for the raw-data preview.
    pub preview: ChartTable,
    pub views: Vec<View>,
}

impl Report {
    /// Look up a view by name (mainly for tests and renderers).
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name == name)
    }
}

/// Run every enabled view over the validated table and assemble the report.
pub fn build_report(table: &OutageTable, config: &ViewConfig) -> Report {
    info!(
        "Building report over {} rows ({} coerced)",
        table.len(),
        table.coerced_rows
    );

    let mut warnings = Vec::new();
    if table.coerced_rows > 0 {
        warnings.push(format!(
            "{} row(s) had missing or non-numeric rupture values coerced to 0",
            table.coerced_rows
        ));
    }
    if table.is_empty() {
        warnings.push("no data: the input table has no rows".to_string());
    }

    let mut views = Vec::new();
    let empty = table.is_empty();

    // The three faceted views share one 4-key sum. The treemap is backed by
    // the same aggregate: its leaf values equal the raw-row sums.
    if config.show_heatmap || config.show_barplot || config.show_treemap {
        let full_sum = group_sum(table, &FULL_KEYS);
        if config.show_heatmap {
            let data = ChartTable::from_groups(&FULL_KEYS, COL_RUPTURE, &full_sum);
            views.push(chart_view("heatmap", empty, heatmap_spec(data)));
        }
        if config.show_barplot {
            let data = ChartTable::from_groups(&FULL_KEYS, COL_RUPTURE, &full_sum);
            views.push(chart_view("stacked_bar", empty, stacked_bar_spec(data)));
        }
        if config.show_treemap {
            let data = ChartTable::from_groups(&FULL_KEYS, COL_RUPTURE, &full_sum);
            views.push(chart_view("treemap", empty, treemap_spec(data)));
        }
    }

    if config.show_global_stats {
        views.push(View {
            name: "global_stats".to_string(),
            body: ViewBody::Stats {
                table: StatsTable {
                    key_columns: Vec::new(),
                    rows: vec![StatsRow {
                        key: Vec::new(),
                        summary: describe(&table.rupture_values()),
                    }],
                },
            },
        });
    }
    for (enabled, name, dimension) in [
        (config.show_product_stats, "product_stats", Dimension::Product),
        (config.show_site_stats, "site_stats", Dimension::Site),
        (config.show_chain_stats, "chain_stats", Dimension::Chain),
    ] {
        if enabled {
            views.push(stats_view(name, table, dimension));
        }
    }

    if config.show_mean_by_product {
        let means = group_mean(table, &[Dimension::Product]);
        let data = ChartTable::from_groups(&[Dimension::Product], COL_RUPTURE, &means);
        views.push(chart_view(
            "mean_by_product",
            empty,
            mean_bar_spec(Dimension::Product, data),
        ));
    }
    if config.show_mean_by_site {
        let means = group_mean(table, &[Dimension::Site]);
        let data = ChartTable::from_groups(&[Dimension::Site], COL_RUPTURE, &means);
        views.push(chart_view(
            "mean_by_store",
            empty,
            mean_bar_spec(Dimension::Site, data),
        ));
    }

    if config.show_top_products {
        let body = if empty {
            ViewBody::NoData
        } else {
            let ranking = top_n(table, &[Dimension::Product], config.top_n);
            ViewBody::Table {
                table: ChartTable::from_ranking(&[Dimension::Product], COL_RUPTURE, &ranking),
            }
        };
        views.push(View {
            name: "top_products".to_string(),
            body,
        });
    }

    Report {
        row_count: table.len(),
        coerced_rows: table.coerced_rows,
        warnings,
        preview: preview_table(table),
        views,
    }
}

fn chart_view(
    name: &str,
    empty: bool,
    result: Result<ChartSpec, RuptureError>,
) -> View {
    let body = if empty {
        ViewBody::NoData
    } else {
        match result {
            Ok(spec) => ViewBody::Chart { spec },
            Err(e) => {
                warn!("View '{}' failed: {}", name, e);
                ViewBody::Failed {
                    error: e.to_string(),
                }
            }
        }
    };
    View {
        name: name.to_string(),
        body,
    }
}

fn stats_view(name: &str, table: &OutageTable, dimension: Dimension) -> View {
    let body = if table.is_empty() {
        ViewBody::NoData
    } else {
        let rows = describe_by(table, &[dimension])
            .into_iter()
            .map(|(key, summary)| StatsRow { key, summary })
            .collect();
        ViewBody::Stats {
            table: StatsTable {
                key_columns: vec![dimension.column().to_string()],
                rows,
            },
        }
    };
    View {
        name: name.to_string(),
        body,
    }
}

fn preview_table(table: &OutageTable) -> ChartTable {
    let columns = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows = table
        .records
        .iter()
        .take(PREVIEW_ROWS)
        .map(|r| {
            vec![
                Value::String(r.product_id.clone()),
                Value::String(r.site_id.clone()),
                Value::String(r.month.clone()),
                Value::String(r.chain_code.clone()),
                Value::from(r.rupture),
            ]
        })
        .collect();
    ChartTable::new(columns, rows)
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
    fn test_default_config_produces_default_views() {
        let report = build_report(&sample_table(), &ViewConfig::default());
        for name in [
            "heatmap",
            "stacked_bar",
            "treemap",
            "global_stats",
            "product_stats",
            "mean_by_product",
            "mean_by_store",
            "top_products",
        ] {
            assert!(report.view(name).is_some(), "missing view {}", name);
        }
        assert!(report.view("site_stats").is_none());
        assert!(report.view("chain_stats").is_none());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_disabled_views_are_skipped() {
        let config = ViewConfig {
            show_heatmap: false,
            show_treemap: false,
            ..ViewConfig::default()
        };
        let report = build_report(&sample_table(), &config);
        assert!(report.view("heatmap").is_none());
        assert!(report.view("treemap").is_none());
        assert!(report.view("stacked_bar").is_some());
    }

    #[test]
    fn test_top_products_ranking() {
        let report = build_report(&sample_table(), &ViewConfig::default());
        match &report.view("top_products").unwrap().body {
            ViewBody::Table { table } => {
                assert_eq!(table.rows.len(), 2);
                assert_eq!(table.rows[0][0], Value::String("P1".to_string()));
                assert_eq!(table.rows[0][1], Value::from(8.0));
            }
            other => panic!("expected Table body, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_marks_views_no_data() {
        let report = build_report(&OutageTable::default(), &ViewConfig::default());
        assert!(matches!(
            report.view("heatmap").unwrap().body,
            ViewBody::NoData
        ));
        assert!(matches!(
            report.view("top_products").unwrap().body,
            ViewBody::NoData
        ));
        // Global stats still renders, as a count = 0 summary.
        match &report.view("global_stats").unwrap().body {
            ViewBody::Stats { table } => {
                assert_eq!(table.rows[0].summary.count, 0);
                assert_eq!(table.rows[0].summary.mean, None);
            }
            other => panic!("expected Stats body, got {:?}", other),
        }
        assert!(report.warnings.iter().any(|w| w.contains("no data")));
    }

    #[test]
    fn test_coercion_warning_surfaces() {
        let mut table = sample_table();
        table.coerced_rows = 2;
        let report = build_report(&table, &ViewConfig::default());
        assert_eq!(report.coerced_rows, 2);
        assert!(report.warnings.iter().any(|w| w.contains("coerced to 0")));
    }

    #[test]
    fn test_preview_limited_to_first_rows() {
        let mut records = Vec::new();
        for i in 0..8 {
            records.push(row(&format!("P{}", i), "S1", "Jan", "C1", 1.0));
        }
        let table = OutageTable {
            records,
            coerced_rows: 0,
        };
        let report = build_report(&table, &ViewConfig::default());
        assert_eq!(report.preview.rows.len(), 5);
        assert_eq!(report.preview.columns.len(), 5);
        assert_eq!(report.row_count, 8);
    }

    #[test]
    fn test_product_stats_keys_are_sorted() {
        let report = build_report(&sample_table(), &ViewConfig::default());
        match &report.view("product_stats").unwrap().body {
            ViewBody::Stats { table } => {
                assert_eq!(table.key_columns, vec!["PRODUCT_ID"]);
                let keys: Vec<_> = table.rows.iter().map(|r| r.key[0].as_str()).collect();
                assert_eq!(keys, vec!["P1", "P2"]);
            }
            other => panic!("expected Stats body, got {:?}", other),
        }
    }
}
