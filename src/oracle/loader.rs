//! Series Loader - Reads oracle price feeds from JSON
//!
//! Each feed is a JSON array of `{price, timestamp, block_number}` objects where
//! `price` is an 18-decimal fixed-point integer (string or number) and
//! `timestamp` is in Unix seconds.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{BenchError, BenchResult};
use crate::types::{PriceSample, Series};

/// Decimals of the on-chain fixed-point price
pub const PRICE_DECIMALS: u32 = 18;

/// Raw price as found in the feed
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

/// One entry of a feed file
#[derive(Debug, Clone, Deserialize)]
pub struct RawPriceEntry {
    pub price: RawPrice,
    pub timestamp: i64,
    #[serde(default)]
    pub block_number: Option<u64>,
}

impl RawPrice {
    /// Decimal price, or `None` when the raw value is not a positive number
    pub fn to_price(&self) -> Option<f64> {
        match self {
            RawPrice::Number(n) => {
                if let Some(raw) = n.as_i64() {
                    scale_integer(raw as i128)
                } else if let Some(raw) = n.as_u64() {
                    scale_integer(raw as i128)
                } else {
                    n.as_f64().and_then(scale_float)
                }
            }
            RawPrice::Text(s) => {
                let s = s.trim();
                match s.parse::<i128>() {
                    Ok(raw) => scale_integer(raw),
                    Err(_) => s.parse::<f64>().ok().and_then(scale_float),
                }
            }
        }
    }
}

fn scale_integer(raw: i128) -> Option<f64> {
    if raw <= 0 {
        return None;
    }
    // Exact rescale while the mantissa fits in 96 bits, float division beyond that
    match Decimal::try_from_i128_with_scale(raw, PRICE_DECIMALS) {
        Ok(d) => d.to_f64(),
        Err(_) => scale_float(raw as f64),
    }
}

fn scale_float(raw: f64) -> Option<f64> {
    if raw.is_finite() && raw > 0.0 {
        Some(raw / 10f64.powi(PRICE_DECIMALS as i32))
    } else {
        None
    }
}

/// Parse a feed from a JSON string; `path` is used for error reporting only
pub fn parse_series(label: &str, json: &str, path: &Path) -> BenchResult<Series> {
    let entries: Vec<RawPriceEntry> =
        serde_json::from_str(json).map_err(|source| BenchError::MalformedInput {
            path: path.to_path_buf(),
            source,
        })?;

    let total = entries.len();
    let mut samples = Vec::with_capacity(total);
    for entry in entries {
        let Some(price) = entry.price.to_price() else {
            continue;
        };
        let timestamp = to_instant(entry.timestamp).ok_or_else(|| BenchError::InvalidTimestamp {
            path: path.to_path_buf(),
            timestamp: entry.timestamp,
        })?;
        samples.push(PriceSample::new(timestamp, entry.block_number, price));
    }

    debug!(
        file = %path.display(),
        total,
        kept = samples.len(),
        "Loaded price feed"
    );

    Ok(Series::new(label, samples))
}

/// Load a feed file into a series labelled `label`
pub fn load_series(label: &str, path: &Path) -> BenchResult<Series> {
    if !path.exists() {
        return Err(BenchError::MissingInputFile(path.to_path_buf()));
    }
    let json = fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
    parse_series(label, &json, path)
}

/// Load a feed that may legitimately be absent (e.g. the v2 variant)
pub fn load_optional_series(label: &str, path: &Path) -> BenchResult<Option<Series>> {
    match load_series(label, path) {
        Ok(series) => Ok(Some(series)),
        Err(e) if e.is_missing_input() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Unix seconds to a millisecond instant
fn to_instant(secs: i64) -> Option<DateTime<Utc>> {
    secs.checked_mul(1000)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}
