//! rupture-insights - aggregation pipeline for stock-outage ("rupture") data
//!
//! Loads one spreadsheet of outage events keyed by product, store, month and
//! retail chain, validates its schema, and produces chart-ready aggregates:
//! a faceted heatmap, stacked bars, a treemap, per-dimension descriptive
//! statistics and a top-N product ranking. Rendering is left to the
//! presentation layer; this crate hands it finished data plus declarative
//! chart specs.

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod schema;
pub mod stats;
