//! Report emitters
//!
//! Markdown comparison tables, leg highlights and HTML charts. Markdown and
//! HTML render to `String`; the generators decide where they land.

pub mod chart;
pub mod format;
pub mod leg_markdown;
pub mod markdown;

pub use chart::{palette_color, render_chart_html, ChartPage, Dataset, PALETTE};
pub use format::{format_cell, format_percentage, parse_number, MetricFormat, NOT_AVAILABLE};
pub use leg_markdown::{highlights, recommend, render_leg_comparison};
pub use markdown::{
    comparison_metrics, key_metrics, render_combined_table, render_comparison_table,
    write_comparison_table_csv, PoolColumn, TableMetric,
};
