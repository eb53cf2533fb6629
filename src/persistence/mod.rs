//! CSV Persistence Module
//!
//! Writes the detail and summary CSVs of both benchmarks and reads the summaries
//! back for the table generators, so each generator can run on its own.

mod comparison;
mod legs;

pub use comparison::{
    read_summary_csv, summary_columns, summary_header, write_comparison_csv, write_summary_csv,
    ColumnFormat, SummaryColumn, SummaryRow,
};
pub use legs::{
    leg_summary_table, read_leg_summary_csv, write_leg_detail_csv, write_leg_summary_csv,
    LegSummaryRow, LegSummaryTable,
};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::types::sanitize_pool_name;

/// Create `dir` and its parents if needed
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed creating {}", dir.display()))
}

/// Truncating CSV writer; the parent directory is created on demand
pub(crate) fn create_writer(path: &Path) -> Result<csv::Writer<File>> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(WriterBuilder::new().has_headers(false).from_writer(file))
}

/// Fixed-point rendering with `decimals` places
pub fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

fn pool_file(dir: &Path, prefix: &str, pool_type: &str, pool: &str, ext: &str) -> PathBuf {
    dir.join(format!(
        "{}-{}-{}.{}",
        prefix,
        pool_type,
        sanitize_pool_name(pool),
        ext
    ))
}

/// `{csv_dir}/oracle-comparison-{type}-{pool}.csv`
pub fn comparison_csv_path(csv_dir: &Path, pool_type: &str, pool: &str) -> PathBuf {
    pool_file(csv_dir, "oracle-comparison", pool_type, pool, "csv")
}

/// `{csv_dir}/oracle-summary-{type}-{pool}.csv`
pub fn summary_csv_path(csv_dir: &Path, pool_type: &str, pool: &str) -> PathBuf {
    pool_file(csv_dir, "oracle-summary", pool_type, pool, "csv")
}

/// `{leg_csv_dir}/leg-data-{type}-{pool}.csv`
pub fn leg_detail_csv_path(csv_dir: &Path, pool_type: &str, pool: &str) -> PathBuf {
    pool_file(csv_dir, "leg-data", pool_type, pool, "csv")
}

/// `{leg_csv_dir}/leg-summary-{type}-{pool}.csv`
pub fn leg_summary_csv_path(csv_dir: &Path, pool_type: &str, pool: &str) -> PathBuf {
    pool_file(csv_dir, "leg-summary", pool_type, pool, "csv")
}

/// `{charts_dir}/oracle-comparison-{type}-{pool}.html`
pub fn comparison_chart_path(charts_dir: &Path, pool_type: &str, pool: &str) -> PathBuf {
    pool_file(charts_dir, "oracle-comparison", pool_type, pool, "html")
}

/// `{leg_charts_dir}/leg-sensitivity-{type}-{pool}.html`
pub fn leg_chart_path(charts_dir: &Path, pool_type: &str, pool: &str) -> PathBuf {
    pool_file(charts_dir, "leg-sensitivity", pool_type, pool, "html")
}

/// Write a whole text artifact (Markdown, HTML), creating parent directories
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("Failed writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_names_are_sanitized_in_file_names() {
        let path = summary_csv_path(Path::new("assets/csv"), "cryptoswap", "ETH/stETH");
        assert_eq!(
            path,
            PathBuf::from("assets/csv/oracle-summary-cryptoswap-ETHstETH.csv")
        );
        let chart = leg_chart_path(Path::new("charts"), "stableswap", "a\\b");
        assert_eq!(chart, PathBuf::from("charts/leg-sensitivity-stableswap-ab.html"));
    }

    #[test]
    fn fixed_rounds_to_requested_places() {
        assert_eq!(fixed(1.0, 6), "1.000000");
        assert_eq!(fixed(-0.123456789, 4), "-0.1235");
        assert_eq!(fixed(33.333333, 2), "33.33");
    }

    #[test]
    fn write_text_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.md");
        write_text(&path, "# hi\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "# hi\n");
    }
}
