//! Generators of the implementations benchmark (primary vs reference oracle)

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};

use super::{report_pool_failure, Generator, RunSummary};
use crate::config::AppConfig;
use crate::oracle::{discover_pools, load_optional_series, load_series, PoolFeeds};
use crate::persistence::{
    comparison_chart_path, comparison_csv_path, ensure_dir, read_summary_csv, summary_csv_path,
    write_comparison_csv, write_summary_csv, write_text, SummaryRow,
};
use crate::report::{
    palette_color, render_chart_html, render_combined_table, render_comparison_table,
    write_comparison_table_csv, ChartPage, Dataset, PoolColumn,
};
use crate::stats::{ComparisonEngine, ReferenceIndex};
use crate::types::{PoolType, Series};

/// Feeds of one pool loaded from disk
struct PoolSeries {
    reference: Series,
    primary: Series,
    primary_v2: Option<Series>,
}

impl PoolSeries {
    fn load(config: &AppConfig, pool_type: &str, pool: &str) -> Result<Self> {
        let benchmark = &config.benchmark;
        let pool_dir = config.paths.data_dir.join(pool_type).join(pool);
        let feeds = PoolFeeds::locate(&pool_dir, pool_type, benchmark);

        let reference = load_series(&benchmark.reference_label, &feeds.reference)
            .context("Failed to load reference feed")?;
        let primary = load_series(&benchmark.primary_label, &feeds.primary)
            .context("Failed to load primary feed")?;
        let primary_v2 = load_optional_series(
            &format!("{}_v2", benchmark.primary_label),
            &feeds.primary_v2,
        )
        .context("Failed to load primary v2 feed")?;

        Ok(Self {
            reference,
            primary,
            primary_v2,
        })
    }
}

/// Run `process` for every discovered pool of every configured pool type
fn for_each_pool<F>(config: &AppConfig, mut process: F) -> RunSummary
where
    F: FnMut(&str, &str) -> Result<()>,
{
    let mut summary = RunSummary::default();
    for pool_type in &config.benchmark.pool_types {
        info!(pool_type = %pool_type, "Processing pools");
        for pool in discover_pools(&config.paths.data_dir, pool_type) {
            match process(pool_type.as_str(), pool.as_str()) {
                Ok(()) => summary.processed += 1,
                Err(e) => {
                    report_pool_failure(pool_type, &pool, &e);
                    summary.skipped += 1;
                }
            }
        }
    }
    summary
}

/// Detail and summary CSVs per pool
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleCsvGenerator;

impl OracleCsvGenerator {
    fn process_pool(
        &self,
        config: &AppConfig,
        engine: &ComparisonEngine,
        pool_type: &str,
        pool: &str,
    ) -> Result<()> {
        let series = PoolSeries::load(config, pool_type, pool)?;
        let index = ReferenceIndex::from_series(&series.reference);
        let csv_dir = config.csv_dir();

        let rows = write_comparison_csv(
            &comparison_csv_path(&csv_dir, pool_type, pool),
            &config.benchmark,
            &series.primary,
            series.primary_v2.as_ref(),
            &index,
        )?;

        let summaries =
            engine.compare_variants(&series.primary, series.primary_v2.as_ref(), &index);
        let points = summaries.v1.as_ref().map_or(0, |r| r.total_data_points);
        let points_v2 = summaries.v2.as_ref().map_or(0, |r| r.total_data_points);

        if summaries.is_empty() {
            info!(pool, pool_type, "No overlapping timestamps, summary skipped");
        } else {
            write_summary_csv(
                &summary_csv_path(&csv_dir, pool_type, pool),
                &config.benchmark,
                pool,
                pool_type,
                &summaries,
            )?;
        }

        info!(
            pool,
            pool_type,
            rows,
            points,
            points_v2,
            has_v2 = series.primary_v2.is_some(),
            "Generated CSV files"
        );
        Ok(())
    }
}

impl Generator for OracleCsvGenerator {
    fn name(&self) -> &'static str {
        "generate-csv"
    }

    fn run(&self, config: &AppConfig) -> Result<RunSummary> {
        ensure_dir(&config.csv_dir())?;
        let engine = ComparisonEngine::new(config.benchmark.annualization_periods);
        Ok(for_each_pool(config, |pool_type, pool| {
            self.process_pool(config, &engine, pool_type, pool)
        }))
    }
}

/// Markdown/CSV comparison tables per pool type plus the combined table
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonTableGenerator;

fn load_summary(csv_dir: &Path, pool_type: &str, pool: &str) -> Option<SummaryRow> {
    let path = summary_csv_path(csv_dir, pool_type, pool);
    if !path.exists() {
        warn!(pool, pool_type, file = %path.display(), "Summary CSV missing");
        return None;
    }
    match read_summary_csv(&path) {
        Ok(row) => Some(row),
        Err(e) => {
            error!(pool, pool_type, error = %format!("{:#}", e), "Error loading summary data");
            None
        }
    }
}

impl Generator for ComparisonTableGenerator {
    fn name(&self) -> &'static str {
        "generate-comparison-table"
    }

    fn run(&self, config: &AppConfig) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let csv_dir = config.csv_dir();
        let assets_dir = &config.paths.assets_dir;
        let mut combined = Vec::new();

        for pool_type in &config.benchmark.pool_types {
            let pools = discover_pools(&config.paths.data_dir, pool_type);
            if pools.is_empty() {
                info!(pool_type = %pool_type, "No pools found, skipping");
                continue;
            }

            let mut columns = Vec::with_capacity(pools.len());
            for pool in &pools {
                match load_summary(&csv_dir, pool_type, pool) {
                    Some(row) => {
                        combined.push(PoolColumn::new(format!("{}-{}", pool_type, pool), row.clone()));
                        columns.push(PoolColumn::new(pool.as_str(), row));
                        summary.processed += 1;
                    }
                    None => {
                        columns.push(PoolColumn::new(pool.as_str(), SummaryRow::new()));
                        summary.skipped += 1;
                    }
                }
            }

            let md_path = assets_dir.join(format!("comparison-table-{}.md", pool_type));
            let markdown =
                render_comparison_table(&PoolType::from_dir_name(pool_type), &columns, &config.benchmark);
            write_text(&md_path, &markdown)?;

            let csv_path = csv_dir.join(format!("oracle-comparison-table-{}.csv", pool_type));
            write_comparison_table_csv(&csv_path, &columns, &config.benchmark)?;

            info!(
                pool_type = %pool_type,
                pools = columns.len(),
                table = %md_path.display(),
                "Generated comparison table"
            );
        }

        if combined.is_empty() {
            info!("No pool data found, skipping combined table");
        } else {
            let path = assets_dir.join("comparison-table-all-pools.md");
            write_text(&path, &render_combined_table(&combined, &config.benchmark))?;
            info!(pools = combined.len(), table = %path.display(), "Generated combined comparison table");
        }

        Ok(summary)
    }
}

/// Interactive price chart per pool
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleChartGenerator;

impl OracleChartGenerator {
    fn process_pool(&self, config: &AppConfig, pool_type: &str, pool: &str) -> Result<()> {
        let benchmark = &config.benchmark;
        let series = PoolSeries::load(config, pool_type, pool)?;

        let mut datasets = vec![
            Dataset::from_series(
                format!("{} Oracle", benchmark.reference_name),
                &series.reference,
                palette_color(0),
            ),
            Dataset::from_series(
                format!("{} Oracle", benchmark.primary_name),
                &series.primary,
                palette_color(1),
            ),
        ];
        if let Some(v2) = &series.primary_v2 {
            datasets.push(Dataset::from_series(
                format!("{} v2 Oracle", benchmark.primary_name),
                v2,
                palette_color(2),
            ));
        }

        let page = ChartPage {
            page_title: format!("Oracle Comparison - {} ({})", pool, pool_type),
            chart_title: format!("Oracle Price Comparison - {} ({})", pool, pool_type),
            y_axis: "Price (LP/Loan)".to_string(),
        };
        let html = render_chart_html(&page, &datasets)?;
        write_text(&comparison_chart_path(&config.charts_dir(), pool_type, pool), &html)?;

        info!(pool, pool_type, lines = datasets.len(), "Generated chart");
        Ok(())
    }
}

impl Generator for OracleChartGenerator {
    fn name(&self) -> &'static str {
        "generate-charts"
    }

    fn run(&self, config: &AppConfig) -> Result<RunSummary> {
        ensure_dir(&config.charts_dir())?;
        Ok(for_each_pool(config, |pool_type, pool| {
            self.process_pool(config, pool_type, pool)
        }))
    }
}
