//! Chart Spec Builder - declarative role assignments over aggregated tables
//!
//! A `ChartSpec` is a fully-prepared data table plus an encoding (which
//! column plays x, y, color, facet, ...) plus pass-through layout parameters.
//! No rendering logic lives here; the presentation layer consumes the spec
//! as-is. Every role must reference a column present in the data table,
//! otherwise construction fails with a `Spec` error.

use crate::error::{Result, RuptureError};
use crate::model::{Dimension, COL_CHAIN, COL_MONTH, COL_PRODUCT, COL_RUPTURE, COL_SITE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A chart-ready table: named columns plus row-major JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ChartTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        ChartTable { columns, rows }
    }

    /// Build a table from a grouped aggregate: one column per key dimension,
    /// one trailing value column.
    pub fn from_groups(
        keys: &[Dimension],
        value_column: &str,
        groups: &BTreeMap<Vec<String>, f64>,
    ) -> Self {
        let mut columns: Vec<String> = keys.iter().map(|d| d.column().to_string()).collect();
        columns.push(value_column.to_string());

        let rows = groups
            .iter()
            .map(|(key, value)| {
                let mut row: Vec<Value> =
                    key.iter().map(|k| Value::String(k.clone())).collect();
                row.push(Value::from(*value));
                row
            })
            .collect();

        ChartTable { columns, rows }
    }

    /// Build a table from an ordered ranking, preserving entry order.
    pub fn from_ranking(
        keys: &[Dimension],
        value_column: &str,
        entries: &[(Vec<String>, f64)],
    ) -> Self {
        let mut columns: Vec<String> = keys.iter().map(|d| d.column().to_string()).collect();
        columns.push(value_column.to_string());

        let rows = entries
            .iter()
            .map(|(key, value)| {
                let mut row: Vec<Value> =
                    key.iter().map(|k| Value::String(k.clone())).collect();
                row.push(Value::from(*value));
                row
            })
            .collect();

        ChartTable { columns, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Heatmap,
    StackedBar,
    Treemap,
    Bar,
}

/// Column-to-role assignments. Only the roles a chart kind uses are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_row: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_col: Option<String>,
    /// Hierarchical drill path, root first (treemap only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Encoding {
    /// Every (role name, column) pair this encoding references.
    fn referenced(&self) -> Vec<(&'static str, &str)> {
        let mut refs = Vec::new();
        let singles = [
            ("x", &self.x),
            ("y", &self.y),
            ("z", &self.z),
            ("color", &self.color),
            ("facet_row", &self.facet_row),
            ("facet_col", &self.facet_col),
            ("value", &self.value),
        ];
        for (role, column) in singles {
            if let Some(column) = column {
                refs.push((role, column.as_str()));
            }
        }
        for column in &self.path {
            refs.push(("path", column.as_str()));
        }
        refs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub t: u32,
    pub l: u32,
    pub b: u32,
    pub r: u32,
}

/// Presentation parameters passed through to the renderer unmodified.
/// Never derived from the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title_font_size: u32,
    pub font_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_angle: Option<i32>,
    pub axis_title_font_size: u32,
    pub tick_font_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    /// "linear" to force one tick per category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            title_font_size: 16,
            font_size: 10,
            tick_angle: None,
            axis_title_font_size: 8,
            tick_font_size: 8,
            height: None,
            width: None,
            margin: None,
            tick_mode: None,
            barmode: None,
        }
    }
}

impl Layout {
    /// Shared layout of the faceted month-by-store views.
    fn faceted() -> Self {
        Layout {
            tick_angle: Some(-45),
            height: Some(800),
            margin: Some(Margin { t: 50, l: 50, b: 150, r: 50 }),
            ..Layout::default()
        }
    }

    /// Layout of the mean-by-store bar: every store gets its own tick.
    fn wide_category_bar() -> Self {
        Layout {
            tick_angle: Some(-90),
            tick_mode: Some("linear".to_string()),
            height: Some(600),
            width: Some(1200),
            margin: Some(Margin { t: 40, l: 40, b: 200, r: 40 }),
            ..Layout::default()
        }
    }
}

/// A complete, renderer-independent chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub data: ChartTable,
    pub encoding: Encoding,
    pub layout: Layout,
}

impl ChartSpec {
    /// Build a spec, rejecting any role that references a column absent
    /// from the data table.
    pub fn new(
        kind: ChartKind,
        title: impl Into<String>,
        data: ChartTable,
        encoding: Encoding,
        layout: Layout,
    ) -> Result<Self> {
        for (role, column) in encoding.referenced() {
            if !data.has_column(column) {
                return Err(RuptureError::Spec(format!(
                    "role '{}' references column '{}' which is not in the data table (available: {})",
                    role,
                    column,
                    data.columns.join(", ")
                )));
            }
        }
        Ok(ChartSpec {
            kind,
            title: title.into(),
            data,
            encoding,
            layout,
        })
    }
}

/// Heatmap of summed ruptures: month x store, faceted by product and chain.
pub fn heatmap_spec(data: ChartTable) -> Result<ChartSpec> {
    ChartSpec::new(
        ChartKind::Heatmap,
        "Ruptures by month, store and chain",
        data,
        Encoding {
            x: Some(COL_MONTH.to_string()),
            y: Some(COL_SITE.to_string()),
            z: Some(COL_RUPTURE.to_string()),
            facet_col: Some(COL_PRODUCT.to_string()),
            facet_row: Some(COL_CHAIN.to_string()),
            ..Encoding::default()
        },
        Layout::faceted(),
    )
}

/// Stacked bars of summed ruptures per month, one color per store.
pub fn stacked_bar_spec(data: ChartTable) -> Result<ChartSpec> {
    ChartSpec::new(
        ChartKind::StackedBar,
        "Ruptures by month, store, product and chain",
        data,
        Encoding {
            x: Some(COL_MONTH.to_string()),
            y: Some(COL_RUPTURE.to_string()),
            color: Some(COL_SITE.to_string()),
            facet_col: Some(COL_PRODUCT.to_string()),
            facet_row: Some(COL_CHAIN.to_string()),
            ..Encoding::default()
        },
        Layout {
            barmode: Some("stack".to_string()),
            ..Layout::faceted()
        },
    )
}

/// Treemap nesting chain -> product -> store -> month, sized by rupture sum.
pub fn treemap_spec(data: ChartTable) -> Result<ChartSpec> {
    ChartSpec::new(
        ChartKind::Treemap,
        "Rupture treemap by chain, product and store",
        data,
        Encoding {
            path: vec![
                COL_CHAIN.to_string(),
                COL_PRODUCT.to_string(),
                COL_SITE.to_string(),
                COL_MONTH.to_string(),
            ],
            value: Some(COL_RUPTURE.to_string()),
            ..Encoding::default()
        },
        Layout::default(),
    )
}

/// Mean-rupture bar over a single dimension (product or store).
pub fn mean_bar_spec(dimension: Dimension, data: ChartTable) -> Result<ChartSpec> {
    let (title, layout) = match dimension {
        Dimension::Site => ("Mean ruptures by store", Layout::wide_category_bar()),
        Dimension::Product => (
            "Mean ruptures by product",
            Layout {
                tick_angle: Some(-90),
                ..Layout::default()
            },
        ),
        Dimension::Month => ("Mean ruptures by month", Layout::default()),
        Dimension::Chain => ("Mean ruptures by chain", Layout::default()),
    };

    ChartSpec::new(
        ChartKind::Bar,
        title,
        data,
        Encoding {
            x: Some(dimension.column().to_string()),
            y: Some(COL_RUPTURE.to_string()),
            ..Encoding::default()
        },
        layout,
    )
}
