//! Generators of the leg-sensitivity benchmark
//!
//! Pool types here are whatever directories exist under the leg data root.

use anyhow::{Context, Result};
use tracing::{error, info};

use super::{report_pool_failure, Generator, RunSummary};
use crate::config::AppConfig;
use crate::oracle::{discover_leg_files, list_subdirectories, load_series};
use crate::persistence::{
    ensure_dir, leg_chart_path, leg_detail_csv_path, leg_summary_csv_path, leg_summary_table,
    read_leg_summary_csv, write_leg_detail_csv, write_leg_summary_csv, write_text,
};
use crate::report::{palette_color, render_chart_html, render_leg_comparison, ChartPage, Dataset};
use crate::stats::{ComparisonEngine, ReferenceIndex};
use crate::types::Series;

/// Pool types found under the leg data root
fn leg_pool_types(config: &AppConfig) -> Vec<String> {
    let root = &config.paths.leg_data_dir;
    if !root.exists() {
        info!(dir = %root.display(), "Leg data root not found, nothing to do");
        return Vec::new();
    }
    list_subdirectories(root)
}

fn leg_pools(config: &AppConfig, pool_type: &str) -> Vec<String> {
    list_subdirectories(&config.paths.leg_data_dir.join(pool_type))
}

/// Load every leg of a pool in natural label order; the first one is the baseline.
///
/// `Ok(None)` when the pool has no leg files.
fn load_legs(config: &AppConfig, pool_type: &str, pool: &str) -> Result<Option<Vec<Series>>> {
    let pool_dir = config.paths.leg_data_dir.join(pool_type).join(pool);
    let files = discover_leg_files(&pool_dir, &config.legs.file_marker);
    if files.is_empty() {
        info!(pool, pool_type, "No leg configuration data, skipping");
        return Ok(None);
    }

    let legs = files
        .iter()
        .map(|file| {
            load_series(&file.label, &file.path)
                .with_context(|| format!("Failed to load leg {}", file.label))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(legs))
}

fn for_each_leg_pool<F>(config: &AppConfig, mut process: F) -> RunSummary
where
    F: FnMut(&str, &str) -> Result<bool>,
{
    let mut summary = RunSummary::default();
    for pool_type in leg_pool_types(config) {
        info!(pool_type = %pool_type, "Processing leg pools");
        for pool in leg_pools(config, &pool_type) {
            match process(pool_type.as_str(), pool.as_str()) {
                Ok(true) => summary.processed += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    report_pool_failure(&pool_type, &pool, &e);
                    summary.skipped += 1;
                }
            }
        }
    }
    summary
}

/// Leg detail and summary CSVs per pool
#[derive(Debug, Clone, Copy, Default)]
pub struct LegCsvGenerator;

impl LegCsvGenerator {
    fn process_pool(
        &self,
        config: &AppConfig,
        engine: &ComparisonEngine,
        pool_type: &str,
        pool: &str,
    ) -> Result<bool> {
        let Some(legs) = load_legs(config, pool_type, pool)? else {
            return Ok(false);
        };
        let csv_dir = config.leg_csv_dir();

        let rows = write_leg_detail_csv(&leg_detail_csv_path(&csv_dir, pool_type, pool), &legs)?;

        let baseline = legs
            .first()
            .map(ReferenceIndex::from_series)
            .unwrap_or_default();
        let stats: Vec<_> = legs
            .iter()
            .map(|leg| (leg.label.clone(), engine.leg_stats(leg, &baseline)))
            .collect();
        write_leg_summary_csv(
            &leg_summary_csv_path(&csv_dir, pool_type, pool),
            &leg_summary_table(&stats),
        )?;

        info!(
            pool,
            pool_type,
            legs = legs.len(),
            rows,
            baseline = %legs.first().map(|l| l.label.as_str()).unwrap_or_default(),
            "Generated leg sensitivity CSVs"
        );
        Ok(true)
    }
}

impl Generator for LegCsvGenerator {
    fn name(&self) -> &'static str {
        "leg-generate-csv"
    }

    fn run(&self, config: &AppConfig) -> Result<RunSummary> {
        ensure_dir(&config.leg_csv_dir())?;
        let engine = ComparisonEngine::new(config.benchmark.annualization_periods);
        Ok(for_each_leg_pool(config, |pool_type, pool| {
            self.process_pool(config, &engine, pool_type, pool)
        }))
    }
}

/// `leg-comparison-{type}.md` per pool type
#[derive(Debug, Clone, Copy, Default)]
pub struct LegComparisonTableGenerator;

impl Generator for LegComparisonTableGenerator {
    fn name(&self) -> &'static str {
        "leg-comparison-table"
    }

    fn run(&self, config: &AppConfig) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let csv_dir = config.leg_csv_dir();

        for pool_type in leg_pool_types(config) {
            let pools = leg_pools(config, &pool_type);
            if pools.is_empty() {
                continue;
            }
            info!(pool_type = %pool_type, "Building leg comparison tables");

            let mut sections = Vec::new();
            for pool in pools {
                let path = leg_summary_csv_path(&csv_dir, &pool_type, &pool);
                if !path.exists() {
                    info!(pool = %pool, pool_type = %pool_type, "Summary CSV missing, skipping");
                    summary.skipped += 1;
                    continue;
                }
                match read_leg_summary_csv(&path) {
                    Ok(Some(table)) => {
                        sections.push((pool, table));
                        summary.processed += 1;
                    }
                    Ok(None) => {
                        info!(pool = %pool, pool_type = %pool_type, "Summary CSV has no rows, skipping");
                        summary.skipped += 1;
                    }
                    Err(e) => {
                        error!(pool = %pool, pool_type = %pool_type, error = %format!("{:#}", e), "Failed to read leg summary");
                        summary.skipped += 1;
                    }
                }
            }

            let path = config
                .paths
                .leg_assets_dir
                .join(format!("leg-comparison-{}.md", pool_type));
            write_text(&path, &render_leg_comparison(&pool_type, &sections))?;
            info!(pool_type = %pool_type, pools = sections.len(), table = %path.display(), "Generated leg comparison table");
        }

        Ok(summary)
    }
}

/// One line per leg on a shared chart
#[derive(Debug, Clone, Copy, Default)]
pub struct LegChartGenerator;

impl LegChartGenerator {
    fn process_pool(&self, config: &AppConfig, pool_type: &str, pool: &str) -> Result<bool> {
        let Some(legs) = load_legs(config, pool_type, pool)? else {
            return Ok(false);
        };

        let datasets: Vec<Dataset> = legs
            .iter()
            .enumerate()
            .map(|(i, leg)| Dataset::from_series(leg.label.as_str(), leg, palette_color(i)))
            .collect();

        let page = ChartPage {
            page_title: format!("Leg Sensitivity - {} ({})", pool, pool_type),
            chart_title: format!(
                "{} Leg Sensitivity - {} ({})",
                config.benchmark.primary_name, pool, pool_type
            ),
            y_axis: "LP Price".to_string(),
        };
        let html = render_chart_html(&page, &datasets)?;
        write_text(&leg_chart_path(&config.leg_charts_dir(), pool_type, pool), &html)?;

        info!(pool, pool_type, legs = datasets.len(), "Generated leg sensitivity chart");
        Ok(true)
    }
}

impl Generator for LegChartGenerator {
    fn name(&self) -> &'static str {
        "leg-generate-charts"
    }

    fn run(&self, config: &AppConfig) -> Result<RunSummary> {
        ensure_dir(&config.leg_charts_dir())?;
        Ok(for_each_leg_pool(config, |pool_type, pool| {
            self.process_pool(config, pool_type, pool)
        }))
    }
}
