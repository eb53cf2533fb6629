//! Alignment Index - exact-timestamp joins between price series
//!
//! Joins are inner joins on instant equality: no interpolation and no tolerance
//! window. Series sampled at slightly offset times simply do not match.

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

use crate::types::{PriceSample, Series};

/// One primary sample paired with the reference price at the same instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub timestamp: DateTime<Utc>,
    pub primary_price: f64,
    pub reference_price: f64,
}

impl Comparison {
    /// `reference - primary`
    pub fn diff(&self) -> f64 {
        self.reference_price - self.primary_price
    }

    /// Difference relative to the primary price, in percent
    pub fn diff_percent(&self) -> f64 {
        self.diff() / self.primary_price * 100.0
    }
}

/// Timestamp -> price lookup for a reference series.
///
/// Also keeps the reference prices in loaded order so return-based metrics can
/// run over the reference feed itself rather than the joined subset.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    by_time: HashMap<DateTime<Utc>, f64>,
    ordered: Vec<f64>,
}

impl ReferenceIndex {
    /// Later samples win when a timestamp repeats
    pub fn from_series(series: &Series) -> Self {
        let by_time = series
            .samples
            .iter()
            .map(|s| (s.timestamp, s.price))
            .collect();
        Self {
            by_time,
            ordered: series.prices(),
        }
    }

    pub fn get(&self, timestamp: &DateTime<Utc>) -> Option<f64> {
        self.by_time.get(timestamp).copied()
    }

    /// Number of distinct timestamps
    pub fn len(&self) -> usize {
        self.by_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }

    /// Reference prices in loaded order
    pub fn ordered_prices(&self) -> &[f64] {
        &self.ordered
    }

    /// Primary samples with a reference hit, in primary order
    pub fn join(&self, primary: &Series) -> Vec<Comparison> {
        primary
            .samples
            .iter()
            .filter_map(|sample| {
                self.get(&sample.timestamp).map(|reference_price| Comparison {
                    timestamp: sample.timestamp,
                    primary_price: sample.price,
                    reference_price,
                })
            })
            .collect()
    }
}

/// Timestamp -> sample lookup used when emitting detail rows
#[derive(Debug, Clone, Default)]
pub struct SampleIndex<'a> {
    by_time: HashMap<DateTime<Utc>, &'a PriceSample>,
}

impl<'a> SampleIndex<'a> {
    pub fn from_series(series: &'a Series) -> Self {
        Self {
            by_time: series.samples.iter().map(|s| (s.timestamp, s)).collect(),
        }
    }

    pub fn get(&self, timestamp: &DateTime<Utc>) -> Option<&'a PriceSample> {
        self.by_time.get(timestamp).copied()
    }
}

/// Ascending union of every timestamp seen across `series`
pub fn timestamp_union<'a, I>(series: I) -> Vec<DateTime<Utc>>
where
    I: IntoIterator<Item = &'a Series>,
{
    series
        .into_iter()
        .flat_map(|s| s.samples.iter().map(|sample| sample.timestamp))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn series(points: &[(i64, f64)]) -> Series {
        Series::new(
            "s",
            points
                .iter()
                .map(|&(t, p)| PriceSample::new(at(t), Some(t as u64), p))
                .collect(),
        )
    }

    #[test]
    fn join_is_exact_match_only() {
        let primary = series(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let reference = ReferenceIndex::from_series(&series(&[(1, 1.5), (3, 2.5), (4, 9.0)]));

        let joined = reference.join(&primary);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].timestamp, at(1));
        assert_eq!(joined[1].reference_price, 2.5);
    }

    #[test]
    fn repeated_timestamps_keep_last_price() {
        let reference = ReferenceIndex::from_series(&series(&[(1, 1.0), (1, 2.0)]));
        assert_eq!(reference.len(), 1);
        assert_eq!(reference.get(&at(1)), Some(2.0));
        assert_eq!(reference.ordered_prices(), &[1.0, 2.0]);
    }

    #[test]
    fn diff_direction() {
        let c = Comparison {
            timestamp: at(0),
            primary_price: 100.0,
            reference_price: 105.0,
        };
        assert_eq!(c.diff(), 5.0);
        assert_eq!(c.diff_percent(), 5.0);
    }

    #[test]
    fn union_is_sorted_and_deduplicated() {
        let a = series(&[(3, 1.0), (1, 1.0)]);
        let b = series(&[(2, 1.0), (3, 1.0)]);
        assert_eq!(timestamp_union([&a, &b]), vec![at(1), at(2), at(3)]);
    }
}
