//! Oracle Bench Library
//!
//! Compares a primary LP price oracle (StakeDAO) against a reference oracle
//! (Curve) and across coin legs, producing CSV, Markdown and HTML reports.

pub mod config;
pub mod error;
pub mod logging;
pub mod oracle;
pub mod persistence;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod types;

pub use config::AppConfig;
pub use error::{BenchError, BenchResult};
pub use stats::{ComparisonEngine, ReferenceIndex, SummaryRecord};
pub use types::{PriceSample, Series};
