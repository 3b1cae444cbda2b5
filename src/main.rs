// Import from library crate
use rupture_insights::chart::ChartTable;
use rupture_insights::loader::load_table;
use rupture_insights::report::{build_report, Report, StatsTable, ViewBody, ViewConfig};
use rupture_insights::schema::validate;
use rupture_insights::stats::Summary;

use anyhow::Result;
use clap::Parser;
use itertools::Itertools;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "rupture-insights")]
#[command(about = "Stock-outage analysis: aggregated views and chart specs from one spreadsheet")]
#[command(version)]
struct Args {
    /// Input spreadsheet (CSV or XLSX, single sheet)
    input: PathBuf,

    /// Skip the faceted heatmap view
    #[arg(long)]
    no_heatmap: bool,

    /// Skip the stacked bar view
    #[arg(long)]
    no_barplot: bool,

    /// Skip the treemap view
    #[arg(long)]
    no_treemap: bool,

    /// Skip the global descriptive-statistics table
    #[arg(long)]
    no_global_stats: bool,

    /// Skip the per-product descriptive-statistics table
    #[arg(long)]
    no_product_stats: bool,

    /// Include the per-store descriptive-statistics table
    #[arg(long)]
    site_stats: bool,

    /// Include the per-chain descriptive-statistics table
    #[arg(long)]
    chain_stats: bool,

    /// Length of the top-products ranking
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Emit the full report as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn view_config(&self) -> ViewConfig {
        ViewConfig {
            show_heatmap: !self.no_heatmap,
            show_barplot: !self.no_barplot,
            show_treemap: !self.no_treemap,
            show_global_stats: !self.no_global_stats,
            show_product_stats: !self.no_product_stats,
            show_site_stats: self.site_stats,
            show_chain_stats: self.chain_stats,
            top_n: self.top,
            ..ViewConfig::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    info!("Analyzing {}", args.input.display());

    let df = load_table(&args.input)?;
    let table = validate(&df)?;
    let report = build_report(&table, &args.view_config());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!("=== Rupture Report ===");
    println!("Rows: {}", report.row_count);
    for warning in &report.warnings {
        println!("Warning: {}", warning);
    }

    println!("\n--- Preview (first {} rows) ---", report.preview.rows.len());
    print_table(&report.preview);

    for view in &report.views {
        println!("\n--- {} ---", view.name);
        match &view.body {
            ViewBody::Chart { spec } => {
                println!("{} ({:?}): {} data rows", spec.title, spec.kind, spec.data.len());
                print_table(&spec.data);
            }
            ViewBody::Stats { table } => print_stats(table),
            ViewBody::Table { table } => print_table(table),
            ViewBody::Failed { error } => println!("FAILED: {}", error),
            ViewBody::NoData => println!("(no data)"),
        }
    }
}

fn print_table(table: &ChartTable) {
    println!("{}", table.columns.join("\t"));
    for row in &table.rows {
        let line = row
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .join("\t");
        println!("{}", line);
    }
}

fn print_stats(table: &StatsTable) {
    let mut header: Vec<&str> = table.key_columns.iter().map(|c| c.as_str()).collect();
    header.extend(["count", "mean", "std", "min", "25%", "50%", "75%", "max"]);
    println!("{}", header.join("\t"));

    for row in &table.rows {
        let mut cells: Vec<String> = row.key.clone();
        cells.push(row.summary.count.to_string());
        for value in stat_fields(&row.summary) {
            cells.push(match value {
                Some(v) => format!("{:.4}", v),
                None => "-".to_string(),
            });
        }
        println!("{}", cells.join("\t"));
    }
}

fn stat_fields(summary: &Summary) -> [Option<f64>; 7] {
    [
        summary.mean,
        summary.std,
        summary.min,
        summary.p25,
        summary.p50,
        summary.p75,
        summary.max,
    ]
}
