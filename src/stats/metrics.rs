//! Scalar statistics over immutable price/difference slices
//!
//! Every function is a fold over its input and returns a finite value for
//! finite input; degenerate denominators fall back to `0.0`.

/// Arithmetic mean, `0.0` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N)
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn min(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn max(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Root mean square around zero (not centered)
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// `numerator / denominator`, or `0.0` when the denominator is exactly zero
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Pearson correlation of two equally long slices.
///
/// Defined as `0.0` when either side is constant.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let (num, sum_sq_x, sum_sq_y) = xs.iter().zip(ys).fold(
        (0.0, 0.0, 0.0),
        |(num, sx, sy), (x, y)| {
            let dx = x - mean_x;
            let dy = y - mean_y;
            (num + dx * dy, sx + dx * dx, sy + dy * dy)
        },
    );

    let denominator = sum_sq_x.sqrt() * sum_sq_y.sqrt();
    // Rounding can push a perfectly linear pair a hair past 1
    ratio_or_zero(num, denominator).clamp(-1.0, 1.0)
}

/// Period-over-period simple returns of consecutive prices.
///
/// Pairs whose previous price is zero are skipped.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// RMS of returns scaled by `annualization_factor`; `0.0` with fewer than 2 prices
pub fn annualized_volatility(returns: &[f64], annualization_factor: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    rms(returns) * annualization_factor
}

/// Largest peak-to-trough decline as a fraction of the running peak.
///
/// The peak starts at the first price; a zero peak contributes no drawdown.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    let Some(&first) = prices.first() else {
        return 0.0;
    };

    let (_, max_dd) = prices.iter().fold((first, 0.0_f64), |(peak, max_dd), &price| {
        let peak = peak.max(price);
        if peak == 0.0 {
            return (peak, max_dd);
        }
        (peak, max_dd.max((peak - price) / peak))
    });
    max_dd
}

/// Element at `floor(N/2)` of the sorted values (lower median for even N)
pub fn lower_median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted[sorted.len() / 2]
}

/// Mean absolute deviation from the lower median
pub fn median_absolute_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let center = lower_median(values);
    values.iter().map(|v| (v - center).abs()).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_slices_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(median_absolute_deviation(&[]), 0.0);
        assert_eq!(pearson_correlation(&[], &[]), 0.0);
    }

    #[test]
    fn std_dev_divides_by_n() {
        // population variance of [2,4,4,4,5,5,7,9] is 4
        assert!(approx(population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0));
    }

    #[test]
    fn correlation_of_constant_series_is_zero() {
        assert_eq!(pearson_correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn correlation_sign() {
        assert!(approx(pearson_correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0));
        assert!(approx(pearson_correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0));
    }

    #[test]
    fn returns_and_volatility() {
        let returns = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!(approx(returns[0], 0.1));
        assert!(approx(returns[1], -0.1));
        assert!(approx(annualized_volatility(&returns, 2.0), 0.2));
        assert_eq!(annualized_volatility(&simple_returns(&[5.0]), 2.0), 0.0);
    }

    #[test]
    fn drawdown_tracks_running_peak() {
        assert!(approx(max_drawdown(&[100.0, 110.0, 90.0]), 20.0 / 110.0));
        assert_eq!(max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
        // later, shallower dip does not replace the deeper one
        assert!(approx(max_drawdown(&[10.0, 5.0, 20.0, 18.0]), 0.5));
    }

    #[test]
    fn lower_median_tie_break() {
        assert_eq!(lower_median(&[4.0, 1.0, 3.0, 2.0]), 3.0);
        assert_eq!(lower_median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn mad_uses_lower_median() {
        // sorted [-10, 5, 5], median 5 -> |5-5| + |-10-5| + |5-5| = 15, /3
        assert!(approx(median_absolute_deviation(&[5.0, -10.0, 5.0]), 5.0));
    }

    #[test]
    fn ratio_guard() {
        assert_eq!(ratio_or_zero(3.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(3.0, 2.0), 1.5);
    }
}
