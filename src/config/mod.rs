//! Configuration management for oracle-bench
//!
//! Loads from YAML files + environment variables via .env

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::stats::DEFAULT_ANNUALIZATION_PERIODS;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub benchmark: BenchmarkConfig,
    pub legs: LegsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Root of the implementations benchmark input (`{data_dir}/{pool_type}/{pool}/*.json`)
    pub data_dir: PathBuf,
    /// Root of every generated artifact
    pub assets_dir: PathBuf,
    /// Root of the leg-sensitivity input
    pub leg_data_dir: PathBuf,
    /// Output root of the leg-sensitivity generators
    pub leg_assets_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkConfig {
    /// Pool type directories scanned under `data_dir`
    pub pool_types: Vec<String>,
    /// Machine label of the primary oracle, used in CSV column names
    pub primary_label: String,
    /// Human label of the primary oracle, used in Markdown and charts
    pub primary_name: String,
    /// File prefix of the primary oracle (`sd-{pool_type}.json`)
    pub primary_file_prefix: String,
    pub reference_label: String,
    pub reference_name: String,
    pub reference_file_prefix: String,
    /// Suffix of the optional second primary variant (`sd-{pool_type}-v2.json`)
    pub v2_file_suffix: String,
    /// Periods per year used to annualize volatility
    pub annualization_periods: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegsConfig {
    /// Only JSON files whose name contains this marker are legs
    pub file_marker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when RUST_LOG is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_roots("data", "assets")
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Path defaults
            .set_default("paths.data_dir", "data")?
            .set_default("paths.assets_dir", "assets")?
            .set_default("paths.leg_data_dir", "data/leg-sensitivity-benchmark")?
            .set_default("paths.leg_assets_dir", "assets/leg-sensitivity-benchmark")?
            // Benchmark defaults
            .set_default("benchmark.pool_types", vec!["cryptoswap", "stableswap"])?
            .set_default("benchmark.primary_label", "stakeDao")?
            .set_default("benchmark.primary_name", "StakeDAO")?
            .set_default("benchmark.primary_file_prefix", "sd")?
            .set_default("benchmark.reference_label", "curve")?
            .set_default("benchmark.reference_name", "Curve")?
            .set_default("benchmark.reference_file_prefix", "curve")?
            .set_default("benchmark.v2_file_suffix", "v2")?
            .set_default("benchmark.annualization_periods", DEFAULT_ANNUALIZATION_PERIODS)?
            // Legs defaults
            .set_default("legs.file_marker", "coins")?
            // Logging defaults
            .set_default("logging.filter", "info")?
            .set_default("logging.json", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (ORACLE_BENCH__*)
            .add_source(Environment::with_prefix("ORACLE_BENCH").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Defaults rooted at explicit input/output directories
    pub fn with_roots(data_dir: impl AsRef<Path>, assets_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let assets_dir = assets_dir.as_ref().to_path_buf();
        Self {
            paths: PathsConfig {
                leg_data_dir: data_dir.join("leg-sensitivity-benchmark"),
                leg_assets_dir: assets_dir.join("leg-sensitivity-benchmark"),
                data_dir,
                assets_dir,
            },
            benchmark: BenchmarkConfig {
                pool_types: vec!["cryptoswap".to_string(), "stableswap".to_string()],
                primary_label: "stakeDao".to_string(),
                primary_name: "StakeDAO".to_string(),
                primary_file_prefix: "sd".to_string(),
                reference_label: "curve".to_string(),
                reference_name: "Curve".to_string(),
                reference_file_prefix: "curve".to_string(),
                v2_file_suffix: "v2".to_string(),
                annualization_periods: DEFAULT_ANNUALIZATION_PERIODS,
            },
            legs: LegsConfig {
                file_marker: "coins".to_string(),
            },
            logging: LoggingConfig {
                filter: "info".to_string(),
                json: false,
            },
        }
    }

    /// `{assets}/csv`
    pub fn csv_dir(&self) -> PathBuf {
        self.paths.assets_dir.join("csv")
    }

    /// `{assets}/charts`
    pub fn charts_dir(&self) -> PathBuf {
        self.paths.assets_dir.join("charts")
    }

    /// `{leg_assets}/csv`
    pub fn leg_csv_dir(&self) -> PathBuf {
        self.paths.leg_assets_dir.join("csv")
    }

    /// `{leg_assets}/charts`
    pub fn leg_charts_dir(&self) -> PathBuf {
        self.paths.leg_assets_dir.join("charts")
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "data={} assets={} pool_types={:?} primary={} reference={} periods={}",
            self.paths.data_dir.display(),
            self.paths.assets_dir.display(),
            self.benchmark.pool_types,
            self.benchmark.primary_label,
            self.benchmark.reference_label,
            self.benchmark.annualization_periods
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_roots_derives_leg_directories() {
        let config = AppConfig::with_roots("/tmp/in", "/tmp/out");
        assert_eq!(
            config.paths.leg_data_dir,
            PathBuf::from("/tmp/in/leg-sensitivity-benchmark")
        );
        assert_eq!(config.leg_csv_dir(), PathBuf::from("/tmp/out/leg-sensitivity-benchmark/csv"));
        assert_eq!(config.csv_dir(), PathBuf::from("/tmp/out/csv"));
    }

    #[test]
    fn digest_mentions_labels() {
        let digest = AppConfig::default().digest();
        assert!(digest.contains("primary=stakeDao"));
        assert!(digest.contains("reference=curve"));
    }
}
