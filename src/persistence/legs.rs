//! Detail and summary CSVs of the leg-sensitivity benchmark

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use super::{create_writer, fixed};
use crate::stats::{timestamp_union, LegStats, SampleIndex};
use crate::types::{iso_timestamp, Series};

/// Transposed leg summary: one row per metric, one column per leg
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegSummaryTable {
    pub legs: Vec<String>,
    pub rows: Vec<LegSummaryRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegSummaryRow {
    pub metric: String,
    pub values: Vec<String>,
}

impl LegSummaryTable {
    /// Row whose metric name matches case-insensitively
    pub fn row(&self, metric: &str) -> Option<&LegSummaryRow> {
        self.rows
            .iter()
            .find(|row| row.metric.eq_ignore_ascii_case(metric))
    }
}

enum LegFormat {
    Count,
    Number,
    Percent,
}

impl LegFormat {
    fn render(&self, value: f64) -> String {
        match self {
            LegFormat::Count => format!("{}", value.round() as i64),
            LegFormat::Number => fixed(value, 6),
            LegFormat::Percent => format!("{}%", fixed(value, 4)),
        }
    }
}

/// Metric rows of the leg summary. Baseline rows are `None` for a leg that
/// shares no timestamp with the baseline.
const LEG_METRICS: &[(&str, LegFormat, fn(&LegStats) -> Option<f64>)] = &[
    ("Total Data Points", LegFormat::Count, |s| Some(s.total_data_points as f64)),
    ("Average Price", LegFormat::Number, |s| Some(s.avg_price)),
    ("Min Price", LegFormat::Number, |s| Some(s.min_price)),
    ("Max Price", LegFormat::Number, |s| Some(s.max_price)),
    ("Std Dev Price", LegFormat::Number, |s| Some(s.std_dev_price)),
    ("Volatility (%)", LegFormat::Percent, |s| Some(s.volatility_percent)),
    ("Max Drawdown (%)", LegFormat::Percent, |s| Some(s.max_drawdown_percent)),
    ("Joined Points vs Baseline", LegFormat::Count, |s| {
        s.baseline.map(|b| b.joined_points as f64)
    }),
    ("Avg Diff vs Baseline", LegFormat::Number, |s| s.baseline.map(|b| b.avg_diff)),
    ("Avg Diff vs Baseline (%)", LegFormat::Percent, |s| {
        s.baseline.map(|b| b.avg_diff_percent)
    }),
    ("Max Diff vs Baseline", LegFormat::Number, |s| s.baseline.map(|b| b.max_diff)),
    ("Min Diff vs Baseline", LegFormat::Number, |s| s.baseline.map(|b| b.min_diff)),
    ("Max Diff vs Baseline (%)", LegFormat::Percent, |s| {
        s.baseline.map(|b| b.max_diff_percent)
    }),
    ("Min Diff vs Baseline (%)", LegFormat::Percent, |s| {
        s.baseline.map(|b| b.min_diff_percent)
    }),
    ("Std Dev Diff vs Baseline", LegFormat::Number, |s| s.baseline.map(|b| b.std_dev_diff)),
    ("Std Dev Diff vs Baseline (%)", LegFormat::Percent, |s| {
        s.baseline.map(|b| b.std_dev_diff_percent)
    }),
    ("Correlation vs Baseline", LegFormat::Number, |s| s.baseline.map(|b| b.correlation)),
    ("Tracking Error vs Baseline", LegFormat::Number, |s| {
        s.baseline.map(|b| b.tracking_error)
    }),
];

/// Build the summary table; a missing value shows `N/A`
pub fn leg_summary_table(stats: &[(String, Option<LegStats>)]) -> LegSummaryTable {
    let rows = LEG_METRICS
        .iter()
        .map(|(metric, format, extract)| LegSummaryRow {
            metric: metric.to_string(),
            values: stats
                .iter()
                .map(|(_, leg)| {
                    leg.as_ref()
                        .and_then(|leg| extract(leg))
                        .map(|value| format.render(value))
                        .unwrap_or_else(|| "N/A".to_string())
                })
                .collect(),
        })
        .collect();

    LegSummaryTable {
        legs: stats.iter().map(|(label, _)| label.clone()).collect(),
        rows,
    }
}

/// Write the per-timestamp leg CSV and return the number of rows.
///
/// The first leg is the baseline and provides the block number column.
pub fn write_leg_detail_csv(path: &Path, legs: &[Series]) -> Result<usize> {
    let mut header = vec!["timestamp".to_string(), "block_number".to_string()];
    header.extend(legs.iter().map(|leg| format!("{}_price", leg.label)));

    let indexes: Vec<SampleIndex<'_>> = legs.iter().map(SampleIndex::from_series).collect();
    let timestamps = timestamp_union(legs);

    let mut writer = create_writer(path)?;
    writer
        .write_record(&header)
        .context("Failed to write leg detail header")?;

    for timestamp in &timestamps {
        let block_number = indexes
            .first()
            .and_then(|baseline| baseline.get(timestamp))
            .and_then(|sample| sample.block_number)
            .map(|b| b.to_string())
            .unwrap_or_default();

        let mut row = vec![iso_timestamp(timestamp), block_number];
        row.extend(indexes.iter().map(|index| {
            index
                .get(timestamp)
                .map(|sample| fixed(sample.price, 6))
                .unwrap_or_default()
        }));
        writer
            .write_record(&row)
            .context("Failed to write leg detail record")?;
    }
    writer.flush().context("Failed to flush leg detail writer")?;

    debug!(file = %path.display(), rows = timestamps.len(), legs = legs.len(), "Wrote leg detail CSV");
    Ok(timestamps.len())
}

/// Write `metric,<legs...>` followed by one line per metric
pub fn write_leg_summary_csv(path: &Path, table: &LegSummaryTable) -> Result<()> {
    let mut writer = create_writer(path)?;

    let mut header = vec!["metric".to_string()];
    header.extend(table.legs.iter().cloned());
    writer
        .write_record(&header)
        .context("Failed to write leg summary header")?;

    for row in &table.rows {
        let mut record = vec![row.metric.clone()];
        record.extend(row.values.iter().cloned());
        writer
            .write_record(&record)
            .context("Failed to write leg summary record")?;
    }
    writer.flush().context("Failed to flush leg summary writer")?;
    Ok(())
}

/// Read a leg summary CSV back; `None` when it has no metric rows
pub fn read_leg_summary_csv(path: &Path) -> Result<Option<LegSummaryTable>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    let legs: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        let mut fields = record.iter().map(str::trim);
        let Some(metric) = fields.next().filter(|m| !m.is_empty()) else {
            continue;
        };
        rows.push(LegSummaryRow {
            metric: metric.to_string(),
            values: fields.map(str::to_string).collect(),
        });
    }

    if rows.is_empty() {
        return Ok(None);
    }
    Ok(Some(LegSummaryTable { legs, rows }))
}
