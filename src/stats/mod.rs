//! Statistics Engine
//!
//! Compares a primary oracle series against a reference index and derives the
//! summary metrics reported for every pool:
//! - difference statistics (mean, population std-dev, extremes)
//! - Pearson correlation
//! - annualized volatility, Sharpe-like ratio, max drawdown
//! - tracking error and information ratio
//! - median absolute deviation and sign distribution

pub mod alignment;
mod leg;
pub mod metrics;

pub use alignment::{timestamp_union, Comparison, ReferenceIndex, SampleIndex};
pub use leg::{BaselineDeviation, LegStats};

use serde::{Deserialize, Serialize};

use crate::types::{Series, Variant};

/// Periods per year behind the fixed annualization factor `sqrt(365 * 24 * 4)`.
///
/// Not derived from the actual spacing of the samples.
pub const DEFAULT_ANNUALIZATION_PERIODS: f64 = 365.0 * 24.0 * 4.0;

/// Comparison metrics for one (pool, variant) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Number of joined comparisons
    pub total_data_points: usize,
    pub avg_price_diff: f64,
    pub avg_price_diff_percent: f64,
    pub max_price_diff: f64,
    pub min_price_diff: f64,
    pub max_price_diff_percent: f64,
    pub min_price_diff_percent: f64,
    pub std_dev_price_diff: f64,
    pub std_dev_price_diff_percent: f64,
    /// Pearson correlation of joined primary/reference prices
    pub correlation: f64,
    /// Annualized volatility of the primary feed (fraction)
    pub primary_volatility: f64,
    /// Annualized volatility of the reference feed (fraction)
    pub reference_volatility: f64,
    /// RMS of differences around zero
    pub tracking_error: f64,
    /// Max drawdown of the primary feed (fraction)
    pub max_drawdown: f64,
    pub information_ratio: f64,
    /// Mean primary return over primary volatility, zero risk-free rate
    pub primary_sharpe: f64,
    pub median_absolute_deviation: f64,
    /// Share of comparisons with primary > reference, in percent
    pub primary_higher_percent: f64,
    pub primary_lower_percent: f64,
    pub primary_equal_percent: f64,
}

/// Summaries of both primary variants against one shared reference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantSummaries {
    pub v1: Option<SummaryRecord>,
    pub v2: Option<SummaryRecord>,
}

impl VariantSummaries {
    pub fn get(&self, variant: Variant) -> Option<&SummaryRecord> {
        match variant {
            Variant::V1 => self.v1.as_ref(),
            Variant::V2 => self.v2.as_ref(),
        }
    }

    /// No variant produced a comparison
    pub fn is_empty(&self) -> bool {
        self.v1.is_none() && self.v2.is_none()
    }
}

/// Stateless engine; only carries the annualization factor
#[derive(Debug, Clone, Copy)]
pub struct ComparisonEngine {
    annualization_factor: f64,
}

impl Default for ComparisonEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ANNUALIZATION_PERIODS)
    }
}

impl ComparisonEngine {
    pub fn new(periods_per_year: f64) -> Self {
        Self {
            annualization_factor: periods_per_year.max(0.0).sqrt(),
        }
    }

    pub fn annualization_factor(&self) -> f64 {
        self.annualization_factor
    }

    /// Compare `primary` against `reference`.
    ///
    /// Returns `None` when no primary timestamp has an exact reference match.
    pub fn compare(&self, primary: &Series, reference: &ReferenceIndex) -> Option<SummaryRecord> {
        let comparisons = reference.join(primary);
        if comparisons.is_empty() {
            return None;
        }
        let n = comparisons.len() as f64;

        let diffs: Vec<f64> = comparisons.iter().map(Comparison::diff).collect();
        let diff_percents: Vec<f64> = comparisons.iter().map(Comparison::diff_percent).collect();
        let joined_primary: Vec<f64> = comparisons.iter().map(|c| c.primary_price).collect();
        let joined_reference: Vec<f64> = comparisons.iter().map(|c| c.reference_price).collect();

        // Return-based metrics run over each feed as loaded
        let primary_prices = primary.prices();
        let primary_returns = metrics::simple_returns(&primary_prices);
        let reference_returns = metrics::simple_returns(reference.ordered_prices());
        let primary_volatility =
            metrics::annualized_volatility(&primary_returns, self.annualization_factor);
        let reference_volatility =
            metrics::annualized_volatility(&reference_returns, self.annualization_factor);

        let avg_price_diff = metrics::mean(&diffs);
        let tracking_error = metrics::rms(&diffs);

        let (higher, lower, equal) =
            comparisons
                .iter()
                .fold((0usize, 0usize, 0usize), |(h, l, e), c| {
                    if c.primary_price > c.reference_price {
                        (h + 1, l, e)
                    } else if c.primary_price < c.reference_price {
                        (h, l + 1, e)
                    } else {
                        (h, l, e + 1)
                    }
                });

        Some(SummaryRecord {
            total_data_points: comparisons.len(),
            avg_price_diff,
            avg_price_diff_percent: metrics::mean(&diff_percents),
            max_price_diff: metrics::max(&diffs),
            min_price_diff: metrics::min(&diffs),
            max_price_diff_percent: metrics::max(&diff_percents),
            min_price_diff_percent: metrics::min(&diff_percents),
            std_dev_price_diff: metrics::population_std_dev(&diffs),
            std_dev_price_diff_percent: metrics::population_std_dev(&diff_percents),
            correlation: metrics::pearson_correlation(&joined_primary, &joined_reference),
            primary_volatility,
            reference_volatility,
            tracking_error,
            max_drawdown: metrics::max_drawdown(&primary_prices),
            information_ratio: metrics::ratio_or_zero(avg_price_diff, tracking_error),
            primary_sharpe: metrics::ratio_or_zero(
                metrics::mean(&primary_returns),
                primary_volatility,
            ),
            median_absolute_deviation: metrics::median_absolute_deviation(&diffs),
            primary_higher_percent: higher as f64 / n * 100.0,
            primary_lower_percent: lower as f64 / n * 100.0,
            primary_equal_percent: equal as f64 / n * 100.0,
        })
    }

    /// Run `compare` independently for each primary variant
    pub fn compare_variants(
        &self,
        v1: &Series,
        v2: Option<&Series>,
        reference: &ReferenceIndex,
    ) -> VariantSummaries {
        VariantSummaries {
            v1: self.compare(v1, reference),
            v2: v2.and_then(|series| self.compare(series, reference)),
        }
    }
}
