//! Oracle module - Price feed loading and input discovery
//!
//! Turns the on-disk JSON feeds of each oracle implementation into `Series`
//! and finds the pools and legs to compare.

pub mod discovery;
mod loader;

pub use discovery::{discover_leg_files, discover_pools, list_subdirectories, LegFile};
pub use loader::{
    load_optional_series, load_series, parse_series, RawPrice, RawPriceEntry, PRICE_DECIMALS,
};

use std::path::{Path, PathBuf};

use crate::config::BenchmarkConfig;

/// Feed files of one pool in the implementations benchmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolFeeds {
    pub reference: PathBuf,
    pub primary: PathBuf,
    pub primary_v2: PathBuf,
}

impl PoolFeeds {
    /// `curve-{type}.json`, `sd-{type}.json`, `sd-{type}-v2.json`
    pub fn locate(pool_dir: &Path, pool_type: &str, benchmark: &BenchmarkConfig) -> Self {
        Self {
            reference: pool_dir.join(format!(
                "{}-{}.json",
                benchmark.reference_file_prefix, pool_type
            )),
            primary: pool_dir.join(format!(
                "{}-{}.json",
                benchmark.primary_file_prefix, pool_type
            )),
            primary_v2: pool_dir.join(format!(
                "{}-{}-{}.json",
                benchmark.primary_file_prefix, pool_type, benchmark.v2_file_suffix
            )),
        }
    }
}
