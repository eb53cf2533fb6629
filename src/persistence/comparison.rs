//! Detail and summary CSVs of the implementations benchmark

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use super::{create_writer, fixed};
use crate::config::BenchmarkConfig;
use crate::stats::{timestamp_union, ReferenceIndex, SampleIndex, SummaryRecord, VariantSummaries};
use crate::types::{iso_timestamp, Series, Variant};

/// Header -> raw value of a summary CSV's value row
pub type SummaryRow = HashMap<String, String>;

/// How a summary metric is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    Integer,
    Fixed(usize),
}

impl ColumnFormat {
    pub fn render(&self, value: f64) -> String {
        match self {
            ColumnFormat::Integer => format!("{}", value.round() as i64),
            ColumnFormat::Fixed(decimals) => fixed(value, *decimals),
        }
    }
}

/// One metric column of the summary CSV (without variant suffix)
#[derive(Clone)]
pub struct SummaryColumn {
    pub key: String,
    pub format: ColumnFormat,
    extract: fn(&SummaryRecord) -> f64,
}

impl SummaryColumn {
    fn new(key: impl Into<String>, format: ColumnFormat, extract: fn(&SummaryRecord) -> f64) -> Self {
        Self {
            key: key.into(),
            format,
            extract,
        }
    }

    pub fn value(&self, record: &SummaryRecord) -> f64 {
        (self.extract)(record)
    }

    pub fn render(&self, record: &SummaryRecord) -> String {
        self.format.render(self.value(record))
    }
}

impl std::fmt::Debug for SummaryColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryColumn")
            .field("key", &self.key)
            .field("format", &self.format)
            .finish()
    }
}

/// Metric columns in file order; oracle-specific keys use the configured labels
pub fn summary_columns(benchmark: &BenchmarkConfig) -> Vec<SummaryColumn> {
    use ColumnFormat::{Fixed, Integer};
    let primary = &benchmark.primary_label;
    let reference = &benchmark.reference_label;

    vec![
        SummaryColumn::new("total_data_points", Integer, |r| r.total_data_points as f64),
        SummaryColumn::new("avg_price_diff", Fixed(6), |r| r.avg_price_diff),
        SummaryColumn::new("avg_price_diff_percent", Fixed(4), |r| r.avg_price_diff_percent),
        SummaryColumn::new("max_price_diff", Fixed(6), |r| r.max_price_diff),
        SummaryColumn::new("min_price_diff", Fixed(6), |r| r.min_price_diff),
        SummaryColumn::new("max_price_diff_percent", Fixed(4), |r| r.max_price_diff_percent),
        SummaryColumn::new("min_price_diff_percent", Fixed(4), |r| r.min_price_diff_percent),
        SummaryColumn::new("std_dev_price_diff", Fixed(6), |r| r.std_dev_price_diff),
        SummaryColumn::new("std_dev_price_diff_percent", Fixed(4), |r| {
            r.std_dev_price_diff_percent
        }),
        SummaryColumn::new("correlation", Fixed(6), |r| r.correlation),
        SummaryColumn::new(format!("{}_volatility", primary), Fixed(6), |r| {
            r.primary_volatility
        }),
        SummaryColumn::new(format!("{}_volatility", reference), Fixed(6), |r| {
            r.reference_volatility
        }),
        SummaryColumn::new("tracking_error", Fixed(6), |r| r.tracking_error),
        SummaryColumn::new("max_drawdown", Fixed(6), |r| r.max_drawdown),
        SummaryColumn::new("information_ratio", Fixed(6), |r| r.information_ratio),
        SummaryColumn::new(format!("{}_sharpe", primary), Fixed(6), |r| r.primary_sharpe),
        SummaryColumn::new("median_absolute_deviation", Fixed(6), |r| {
            r.median_absolute_deviation
        }),
        SummaryColumn::new(format!("{}_higher_percent", primary), Fixed(2), |r| {
            r.primary_higher_percent
        }),
        SummaryColumn::new(format!("{}_lower_percent", primary), Fixed(2), |r| {
            r.primary_lower_percent
        }),
        SummaryColumn::new(format!("{}_equal_percent", primary), Fixed(2), |r| {
            r.primary_equal_percent
        }),
    ]
}

/// `pool,pool_type`, the v1 metric columns, then the same columns suffixed `_v2`
pub fn summary_header(benchmark: &BenchmarkConfig) -> Vec<String> {
    let columns = summary_columns(benchmark);
    let mut header = vec!["pool".to_string(), "pool_type".to_string()];
    for variant in Variant::ALL {
        header.extend(
            columns
                .iter()
                .map(|c| format!("{}{}", c.key, variant.suffix())),
        );
    }
    header
}

/// Write the one-row summary CSV of a pool.
///
/// Columns of a variant without a record are left empty.
pub fn write_summary_csv(
    path: &Path,
    benchmark: &BenchmarkConfig,
    pool: &str,
    pool_type: &str,
    summaries: &VariantSummaries,
) -> Result<()> {
    let columns = summary_columns(benchmark);
    let mut writer = create_writer(path)?;

    writer
        .write_record(summary_header(benchmark))
        .context("Failed to write summary header")?;

    let mut row = vec![pool.to_string(), pool_type.to_string()];
    for variant in Variant::ALL {
        match summaries.get(variant) {
            Some(record) => row.extend(columns.iter().map(|c| c.render(record))),
            None => row.extend(columns.iter().map(|_| String::new())),
        }
    }
    writer
        .write_record(&row)
        .context("Failed to write summary record")?;
    writer.flush().context("Failed to flush summary writer")?;

    debug!(file = %path.display(), "Wrote summary CSV");
    Ok(())
}

/// Write the per-timestamp detail CSV of a pool and return the number of rows.
///
/// Rows cover the union of the primary variants' timestamps; cells without a
/// sample (or without a reference match) are empty.
pub fn write_comparison_csv(
    path: &Path,
    benchmark: &BenchmarkConfig,
    primary: &Series,
    primary_v2: Option<&Series>,
    reference: &ReferenceIndex,
) -> Result<usize> {
    let primary_label = &benchmark.primary_label;
    let mut header = vec![
        "timestamp".to_string(),
        "block_number".to_string(),
        format!("{}_price", primary_label),
        format!("{}_price", benchmark.reference_label),
        "price_difference".to_string(),
        "price_difference_percent".to_string(),
    ];
    if primary_v2.is_some() {
        header.push(format!("{}_v2_price", primary_label));
        header.push("price_difference_v2".to_string());
        header.push("price_difference_percent_v2".to_string());
    }

    let v1_index = SampleIndex::from_series(primary);
    let v2_index = primary_v2.map(SampleIndex::from_series);
    let timestamps = timestamp_union(std::iter::once(primary).chain(primary_v2));

    let mut writer = create_writer(path)?;
    writer
        .write_record(&header)
        .context("Failed to write comparison header")?;

    for timestamp in &timestamps {
        let v1 = v1_index.get(timestamp);
        let v2 = v2_index.as_ref().and_then(|index| index.get(timestamp));
        let reference_price = reference.get(timestamp);

        let block_number = v1
            .or(v2)
            .and_then(|s| s.block_number)
            .map(|b| b.to_string())
            .unwrap_or_default();

        let mut row = vec![iso_timestamp(timestamp), block_number];
        row.push(v1.map(|s| fixed(s.price, 6)).unwrap_or_default());
        row.push(reference_price.map(|p| fixed(p, 6)).unwrap_or_default());
        row.extend(diff_cells(v1.map(|s| s.price), reference_price));

        if v2_index.is_some() {
            row.push(v2.map(|s| fixed(s.price, 6)).unwrap_or_default());
            row.extend(diff_cells(v2.map(|s| s.price), reference_price));
        }

        writer
            .write_record(&row)
            .context("Failed to write comparison record")?;
    }
    writer.flush().context("Failed to flush comparison writer")?;

    debug!(file = %path.display(), rows = timestamps.len(), "Wrote comparison CSV");
    Ok(timestamps.len())
}

/// `[price_difference, price_difference_percent]`, both empty unless both prices exist
fn diff_cells(primary: Option<f64>, reference: Option<f64>) -> [String; 2] {
    match (primary, reference) {
        (Some(primary), Some(reference)) => {
            let diff = reference - primary;
            [fixed(diff, 6), fixed(diff / primary * 100.0, 4)]
        }
        _ => [String::new(), String::new()],
    }
}

/// Read the value row of a summary CSV as header -> trimmed raw value.
///
/// A file with a header but no value row yields an empty map.
pub fn read_summary_csv(path: &Path) -> Result<SummaryRow> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();

    let mut row = SummaryRow::new();
    if let Some(record) = reader.records().next() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(row)
}
