//! Core types used throughout oracle-bench
//!
//! Price samples, series and pool topologies shared by the loader, the
//! statistics engine and the report emitters.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pool topology; determines file naming under the data root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    Stableswap,
    Cryptoswap,
    /// Any other directory name found under the data root
    Other(String),
}

impl PoolType {
    pub fn as_str(&self) -> &str {
        match self {
            PoolType::Stableswap => "stableswap",
            PoolType::Cryptoswap => "cryptoswap",
            PoolType::Other(name) => name.as_str(),
        }
    }

    /// Parse from a directory name
    pub fn from_dir_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "stableswap" => PoolType::Stableswap,
            "cryptoswap" => PoolType::Cryptoswap,
            _ => PoolType::Other(s.to_string()),
        }
    }

    /// Title used in report headings ("Stableswap")
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observation of an oracle's reported price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Millisecond instant; the join key between series
    pub timestamp: DateTime<Utc>,
    /// Chain block of the sample, display only
    pub block_number: Option<u64>,
    /// Decimal price (raw fixed-point / 1e18)
    pub price: f64,
}

impl PriceSample {
    pub fn new(timestamp: DateTime<Utc>, block_number: Option<u64>, price: f64) -> Self {
        Self {
            timestamp,
            block_number,
            price,
        }
    }

    /// Canonical ISO-8601 rendering, e.g. `2024-01-01T00:00:00.000Z`
    pub fn iso_timestamp(&self) -> String {
        iso_timestamp(&self.timestamp)
    }
}

pub fn iso_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Ordered price samples for one oracle/pool/variant combination.
///
/// Samples keep the order they were loaded in; nothing here sorts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub samples: Vec<PriceSample>,
}

impl Series {
    pub fn new(label: impl Into<String>, samples: Vec<PriceSample>) -> Self {
        Self {
            label: label.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Prices in loaded order
    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }
}

/// Primary oracle variant compared against the shared reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    V1,
    V2,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::V1, Variant::V2];

    /// Column suffix in summary CSVs ("" or "_v2")
    pub fn suffix(&self) -> &'static str {
        match self {
            Variant::V1 => "",
            Variant::V2 => "_v2",
        }
    }

    /// Label used in Markdown tables
    pub fn label(&self) -> &'static str {
        match self {
            Variant::V1 => "(v1)",
            Variant::V2 => "(v2)",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::V1 => write!(f, "v1"),
            Variant::V2 => write!(f, "v2"),
        }
    }
}

/// Strip path separators so a pool name can be embedded in a file name
pub fn sanitize_pool_name(name: &str) -> String {
    name.chars().filter(|c| *c != '/' && *c != '\\').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_timestamp_has_millis_and_z() {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let sample = PriceSample::new(ts, Some(1), 1.0);
        assert_eq!(sample.iso_timestamp(), "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn pool_type_round_trip() {
        assert_eq!(PoolType::from_dir_name("stableswap"), PoolType::Stableswap);
        assert_eq!(PoolType::from_dir_name("CryptoSwap"), PoolType::Cryptoswap);
        assert_eq!(PoolType::from_dir_name("tricrypto").as_str(), "tricrypto");
        assert_eq!(PoolType::Cryptoswap.title(), "Cryptoswap");
    }

    #[test]
    fn sanitize_strips_separators() {
        assert_eq!(sanitize_pool_name("cbBTC/wBTC"), "cbBTCwBTC");
        assert_eq!(sanitize_pool_name("a\\b"), "ab");
    }
}
