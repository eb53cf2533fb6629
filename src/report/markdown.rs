//! Comparison tables of the implementations benchmark
//!
//! Rows are metrics (one per version), columns are pools. Values come from the
//! summary CSVs so the tables can be rebuilt without reloading any feed.

use anyhow::{Context, Result};
use std::path::Path;

use super::format::{format_cell, parse_number, MetricFormat, NOT_AVAILABLE};
use crate::config::BenchmarkConfig;
use crate::persistence::{create_writer, SummaryRow};
use crate::types::{PoolType, Variant};

/// Summary values of one table column
#[derive(Debug, Clone)]
pub struct PoolColumn {
    pub name: String,
    pub values: SummaryRow,
}

impl PoolColumn {
    pub fn new(name: impl Into<String>, values: SummaryRow) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.raw(key).and_then(parse_number)
    }
}

/// A table row: machine key in the summary CSV plus its display name
#[derive(Debug, Clone, PartialEq)]
pub struct TableMetric {
    pub key: String,
    pub name: String,
    pub format: MetricFormat,
}

fn base(key: impl Into<String>, name: impl Into<String>, format: MetricFormat) -> TableMetric {
    TableMetric {
        key: key.into(),
        name: name.into(),
        format,
    }
}

/// Expand base metrics into one row per version
fn per_variant(base_metrics: Vec<TableMetric>) -> Vec<TableMetric> {
    base_metrics
        .iter()
        .flat_map(|metric| {
            Variant::ALL.into_iter().map(move |variant| TableMetric {
                key: format!("{}{}", metric.key, variant.suffix()),
                name: format!("{} {}", metric.name, variant.label()),
                format: metric.format,
            })
        })
        .collect()
}

/// Every metric row of the per-type table
pub fn comparison_metrics(benchmark: &BenchmarkConfig) -> Vec<TableMetric> {
    use MetricFormat::{Decimal, Integer, Percentage};
    let primary = &benchmark.primary_label;
    let primary_name = &benchmark.primary_name;

    per_variant(vec![
        base("total_data_points", "Total Data Points", Integer),
        base("correlation", "Correlation", Decimal),
        base("avg_price_diff_percent", "Average Price Difference (%)", Decimal),
        base("max_price_diff_percent", "Max Price Difference (%)", Decimal),
        base("min_price_diff_percent", "Min Price Difference (%)", Decimal),
        base("std_dev_price_diff", "Standard Deviation (Absolute)", Decimal),
        base("std_dev_price_diff_percent", "Standard Deviation (%)", Decimal),
        base("tracking_error", "Tracking Error", Decimal),
        base(
            format!("{}_volatility", primary),
            format!("{} Volatility (%)", primary_name),
            Percentage,
        ),
        base(
            format!("{}_volatility", benchmark.reference_label),
            format!("{} Volatility (%)", benchmark.reference_name),
            Percentage,
        ),
        base("information_ratio", "Information Ratio", Decimal),
        base("max_drawdown", "Max Drawdown (%)", Percentage),
        base("median_absolute_deviation", "Median Absolute Deviation", Decimal),
        base(
            format!("{}_higher_percent", primary),
            format!("{} Higher (%)", primary_name),
            Percentage,
        ),
        base(
            format!("{}_lower_percent", primary),
            format!("{} Lower (%)", primary_name),
            Percentage,
        ),
        base(format!("{}_equal_percent", primary), "Prices Equal (%)", Percentage),
    ])
}

/// Metric rows of the combined all-pools table
pub fn key_metrics(benchmark: &BenchmarkConfig) -> Vec<TableMetric> {
    use MetricFormat::{Decimal, Percentage};
    let primary = &benchmark.primary_label;
    let primary_name = &benchmark.primary_name;

    per_variant(vec![
        base("correlation", "Correlation", Decimal),
        base("avg_price_diff_percent", "Avg Price Diff (%)", Decimal),
        base("tracking_error", "Tracking Error", Decimal),
        base(
            format!("{}_volatility", primary),
            format!("{} Volatility (%)", primary_name),
            Percentage,
        ),
        base(
            format!("{}_higher_percent", primary),
            format!("{} Higher (%)", primary_name),
            Percentage,
        ),
    ])
}

fn render_table(metrics: &[TableMetric], pools: &[PoolColumn]) -> String {
    let mut md = String::new();

    let mut header = vec!["Metric".to_string()];
    header.extend(pools.iter().map(|p| p.name.clone()));
    md.push_str(&format!("| {} |\n", header.join(" | ")));

    let mut separator = vec!["--------".to_string()];
    separator.extend(pools.iter().map(|p| "-".repeat(p.name.len())));
    md.push_str(&format!("| {} |\n", separator.join(" | ")));

    for metric in metrics {
        let mut row = vec![metric.name.clone()];
        row.extend(
            pools
                .iter()
                .map(|pool| format_cell(&metric.key, metric.format, pool.raw(&metric.key))),
        );
        md.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    md
}

/// `comparison-table-{type}.md`
pub fn render_comparison_table(
    pool_type: &PoolType,
    pools: &[PoolColumn],
    benchmark: &BenchmarkConfig,
) -> String {
    let mut md = format!(
        "# Oracle Comparison Summary - {} Pools\n\n",
        pool_type.title()
    );
    md.push_str(&render_table(&comparison_metrics(benchmark), pools));
    md.push_str(&interpretation_guide(benchmark));
    md.push_str(&performance_summary(pools, benchmark));
    md
}

fn interpretation_guide(benchmark: &BenchmarkConfig) -> String {
    let primary = &benchmark.primary_name;
    let reference = &benchmark.reference_name;

    let mut md = String::from("\n## Interpretation Guide\n\n");
    md.push_str("- **Correlation**: 1.0 = perfect correlation, 0.0 = no correlation\n");
    md.push_str(&format!(
        "- **Price Differences**: Lower is better (closer to {}'s oracle)\n",
        reference
    ));
    md.push_str(&format!(
        "- **Tracking Error**: Lower is better (more consistent with {})\n",
        reference
    ));
    md.push_str("- **Volatility**: Lower is better (more stable pricing)\n");
    md.push_str(&format!(
        "- **Information Ratio**: Positive = {} outperforms, Negative = {} outperforms\n",
        primary, reference
    ));
    md.push_str(
        "- **Relative Performance**: 50/50 split = no bias, higher % = systematic bias\n\n",
    );
    md.push_str(&format!(
        "- **Version Labels**: Metrics marked (v1) or (v2) correspond to the respective {} oracle generation compared against {}\n\n",
        primary, reference
    ));
    md
}

/// Pool with the best value; on ties the later pool wins
fn best_by<'a>(
    candidates: impl Iterator<Item = (&'a str, f64)>,
    keep_current: impl Fn(f64, f64) -> bool,
) -> Option<(&'a str, f64)> {
    candidates.reduce(|current, candidate| {
        if keep_current(current.1, candidate.1) {
            current
        } else {
            candidate
        }
    })
}

fn performance_summary(pools: &[PoolColumn], benchmark: &BenchmarkConfig) -> String {
    let mut md = String::from("## Performance Summary\n\n");

    for variant in Variant::ALL {
        let key = format!("correlation{}", variant.suffix());
        let values = pools
            .iter()
            .filter_map(|p| p.number(&key).map(|v| (p.name.as_str(), v)));
        if let Some((pool, value)) = best_by(values, |current, candidate| current > candidate) {
            md.push_str(&format!(
                "- **Best Correlation {}**: {} ({:.3}%)\n",
                variant.label(),
                pool,
                value * 100.0
            ));
        }
    }

    for variant in Variant::ALL {
        let key = format!("tracking_error{}", variant.suffix());
        let values = pools
            .iter()
            .filter_map(|p| p.number(&key).map(|v| (p.name.as_str(), v)));
        if let Some((pool, value)) = best_by(values, |current, candidate| current < candidate) {
            md.push_str(&format!(
                "- **Lowest Tracking Error {}**: {} ({:.6})\n",
                variant.label(),
                pool,
                value
            ));
        }
    }

    for variant in Variant::ALL {
        let higher_key = format!("{}_higher_percent{}", benchmark.primary_label, variant.suffix());
        let lower_key = format!("{}_lower_percent{}", benchmark.primary_label, variant.suffix());
        let balances = pools.iter().filter_map(|p| {
            let higher = p.number(&higher_key)?;
            let lower = p.number(&lower_key)?;
            Some((p.name.as_str(), (higher - lower).abs()))
        });
        if let Some((pool, balance)) = best_by(balances, |current, candidate| current < candidate) {
            md.push_str(&format!(
                "- **Most Balanced {}**: {} ({:.2}% difference)\n",
                variant.label(),
                pool,
                balance
            ));
        }
    }

    md
}

/// `comparison-table-all-pools.md`; columns are named `{type}-{pool}`
pub fn render_combined_table(pools: &[PoolColumn], benchmark: &BenchmarkConfig) -> String {
    let mut md = String::from("# Oracle Comparison Summary - All Pools\n\n");
    md.push_str(&render_table(&key_metrics(benchmark), pools));
    md
}

/// CSV mirror of the per-type table with raw stored values
pub fn write_comparison_table_csv(
    path: &Path,
    pools: &[PoolColumn],
    benchmark: &BenchmarkConfig,
) -> Result<()> {
    let mut writer = create_writer(path)?;

    let mut header = vec!["metric".to_string()];
    header.extend(pools.iter().map(|p| p.name.clone()));
    writer
        .write_record(&header)
        .context("Failed to write comparison table header")?;

    for metric in comparison_metrics(benchmark) {
        let mut row = vec![metric.name.clone()];
        row.extend(pools.iter().map(|pool| match pool.raw(&metric.key) {
            Some(raw) if !raw.is_empty() => raw.to_string(),
            _ => NOT_AVAILABLE.to_string(),
        }));
        writer
            .write_record(&row)
            .context("Failed to write comparison table record")?;
    }
    writer
        .flush()
        .context("Failed to flush comparison table writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn column(name: &str, pairs: &[(&str, &str)]) -> PoolColumn {
        PoolColumn::new(
            name,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn pools() -> Vec<PoolColumn> {
        vec![
            column(
                "USDCUSDT",
                &[
                    ("total_data_points", "120"),
                    ("correlation", "0.998000"),
                    ("tracking_error", "0.000100"),
                    ("stakeDao_volatility", "0.050000"),
                    ("max_drawdown", "0.010000"),
                    ("stakeDao_higher_percent", "40.00"),
                    ("stakeDao_lower_percent", "60.00"),
                    ("correlation_v2", ""),
                ],
            ),
            column(
                "ETHstETH",
                &[
                    ("total_data_points", "80"),
                    ("correlation", "0.950000"),
                    ("tracking_error", "0.000050"),
                    ("stakeDao_higher_percent", "45.00"),
                    ("stakeDao_lower_percent", "50.00"),
                    ("correlation_v2", "0.990000"),
                ],
            ),
        ]
    }

    #[test]
    fn metrics_come_in_version_pairs() {
        let config = AppConfig::default();
        let metrics = comparison_metrics(&config.benchmark);
        assert_eq!(metrics.len(), 32);
        assert_eq!(metrics[0].name, "Total Data Points (v1)");
        assert_eq!(metrics[1].key, "total_data_points_v2");
        assert!(metrics.iter().any(|m| m.name == "StakeDAO Volatility (%) (v2)"));
        assert!(metrics.iter().any(|m| m.key == "curve_volatility"));
        assert_eq!(key_metrics(&config.benchmark).len(), 10);
    }

    #[test]
    fn table_layout_and_formats() {
        let config = AppConfig::default();
        let md = render_comparison_table(&PoolType::Stableswap, &pools(), &config.benchmark);

        assert!(md.starts_with("# Oracle Comparison Summary - Stableswap Pools\n\n"));
        assert!(md.contains("| Metric | USDCUSDT | ETHstETH |\n"));
        assert!(md.contains("| -------- | -------- | -------- |\n"));
        assert!(md.contains("| Total Data Points (v1) | 120 | 80 |\n"));
        assert!(md.contains("| Correlation (v1) | 0.9980 | 0.9500 |\n"));
        assert!(md.contains("| Correlation (v2) | N/A | 0.9900 |\n"));
        assert!(md.contains("| StakeDAO Volatility (%) (v1) | 5.00% | N/A |\n"));
        assert!(md.contains("| Max Drawdown (%) (v1) | 1.00% | N/A |\n"));
        assert!(md.contains("| StakeDAO Higher (%) (v1) | 40.00% | 45.00% |\n"));
        assert!(md.contains("- **Version Labels**: Metrics marked (v1) or (v2)"));
    }

    #[test]
    fn performance_summary_picks_winners() {
        let config = AppConfig::default();
        let md = render_comparison_table(&PoolType::Stableswap, &pools(), &config.benchmark);

        assert!(md.contains("- **Best Correlation (v1)**: USDCUSDT (99.800%)\n"));
        assert!(md.contains("- **Best Correlation (v2)**: ETHstETH (99.000%)\n"));
        assert!(md.contains("- **Lowest Tracking Error (v1)**: ETHstETH (0.000050)\n"));
        assert!(!md.contains("Lowest Tracking Error (v2)"));
        assert!(md.contains("- **Most Balanced (v1)**: ETHstETH (5.00% difference)\n"));
        assert!(!md.contains("Most Balanced (v2)"));
    }

    #[test]
    fn combined_table_has_key_metrics_only() {
        let config = AppConfig::default();
        let md = render_combined_table(&pools(), &config.benchmark);
        assert!(md.starts_with("# Oracle Comparison Summary - All Pools\n\n"));
        assert!(md.contains("| Avg Price Diff (%) (v1) | N/A | N/A |\n"));
        assert!(!md.contains("Total Data Points"));
        assert!(!md.contains("Interpretation Guide"));
    }

    #[test]
    fn csv_mirror_keeps_raw_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let config = AppConfig::default();

        write_comparison_table_csv(&path, &pools(), &config.benchmark).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "metric,USDCUSDT,ETHstETH");
        assert_eq!(lines[1], "Total Data Points (v1),120,80");
        assert_eq!(lines[2], "Total Data Points (v2),N/A,N/A");
        assert_eq!(lines[4], "Correlation (v2),N/A,0.990000");
    }
}
