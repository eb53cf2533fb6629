//! Per-leg statistics for the leg-sensitivity benchmark

use serde::{Deserialize, Serialize};

use super::{metrics, ComparisonEngine, ReferenceIndex, SummaryRecord};
use crate::types::Series;

/// Difference metrics of one leg against the baseline leg.
///
/// Same join and sign as [`ComparisonEngine::compare`] with the leg as primary
/// and the baseline as reference: `diff = baseline - leg`, percent relative to the leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineDeviation {
    /// Timestamps shared with the baseline
    pub joined_points: usize,
    pub avg_diff: f64,
    pub avg_diff_percent: f64,
    pub max_diff: f64,
    pub min_diff: f64,
    pub max_diff_percent: f64,
    pub min_diff_percent: f64,
    pub std_dev_diff: f64,
    pub std_dev_diff_percent: f64,
    pub correlation: f64,
    pub tracking_error: f64,
}

impl From<&SummaryRecord> for BaselineDeviation {
    fn from(record: &SummaryRecord) -> Self {
        Self {
            joined_points: record.total_data_points,
            avg_diff: record.avg_price_diff,
            avg_diff_percent: record.avg_price_diff_percent,
            max_diff: record.max_price_diff,
            min_diff: record.min_price_diff,
            max_diff_percent: record.max_price_diff_percent,
            min_diff_percent: record.min_price_diff_percent,
            std_dev_diff: record.std_dev_price_diff,
            std_dev_diff_percent: record.std_dev_price_diff_percent,
            correlation: record.correlation,
            tracking_error: record.tracking_error,
        }
    }
}

/// Price statistics of a single leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegStats {
    pub total_data_points: usize,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub std_dev_price: f64,
    /// Annualized volatility of the leg's own series, already x100
    pub volatility_percent: f64,
    /// Max drawdown of the leg's own series, already x100
    pub max_drawdown_percent: f64,
    /// `None` when the leg shares no timestamp with the baseline
    pub baseline: Option<BaselineDeviation>,
}

impl ComparisonEngine {
    /// Statistics of `leg` and its deviation from `baseline`.
    ///
    /// Returns `None` for a leg without samples.
    pub fn leg_stats(&self, leg: &Series, baseline: &ReferenceIndex) -> Option<LegStats> {
        if leg.is_empty() {
            return None;
        }
        let prices = leg.prices();
        let returns = metrics::simple_returns(&prices);

        Some(LegStats {
            total_data_points: prices.len(),
            avg_price: metrics::mean(&prices),
            min_price: metrics::min(&prices),
            max_price: metrics::max(&prices),
            std_dev_price: metrics::population_std_dev(&prices),
            volatility_percent: metrics::annualized_volatility(
                &returns,
                self.annualization_factor(),
            ) * 100.0,
            max_drawdown_percent: metrics::max_drawdown(&prices) * 100.0,
            baseline: self
                .compare(leg, baseline)
                .map(|record| BaselineDeviation::from(&record)),
        })
    }
}
