//! Number formatting for Markdown tables

/// Rendered when a value is missing or not numeric
pub const NOT_AVAILABLE: &str = "N/A";

/// Display format of a table metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFormat {
    Integer,
    Decimal,
    Percentage,
}

/// Parse a stored cell; `%` signs are ignored and blanks are `None`
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('%', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Percentage rendering keyed on the machine name of the metric.
///
/// Keys containing `percent` hold values already scaled to 0..100; anything
/// above 100 (or any other key) is treated as a fraction and scaled by 100.
pub fn format_percentage(key: &str, value: f64) -> String {
    if key.contains("percent") && value <= 100.0 {
        format!("{:.2}%", value)
    } else {
        format!("{:.2}%", value * 100.0)
    }
}

pub fn format_metric(key: &str, format: MetricFormat, value: f64) -> String {
    match format {
        MetricFormat::Integer => format!("{}", value.round() as i64),
        MetricFormat::Decimal => format!("{:.4}", value),
        MetricFormat::Percentage => format_percentage(key, value),
    }
}

/// Format a raw stored cell, `N/A` when it does not parse
pub fn format_cell(key: &str, format: MetricFormat, raw: Option<&str>) -> String {
    raw.and_then(parse_number)
        .map(|value| format_metric(key, format, value))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_keys_are_not_rescaled() {
        assert_eq!(format_percentage("stakeDao_higher_percent", 33.33), "33.33%");
        assert_eq!(format_percentage("stakeDao_higher_percent_v2", 100.0), "100.00%");
    }

    #[test]
    fn fractional_keys_are_scaled() {
        assert_eq!(format_percentage("stakeDao_volatility", 0.1234), "12.34%");
        assert_eq!(format_percentage("max_drawdown", 0.181818), "18.18%");
    }

    #[test]
    fn percent_key_above_hundred_is_scaled() {
        assert_eq!(format_percentage("x_percent", 150.0), "15000.00%");
    }

    #[test]
    fn stored_values_round_trip() {
        // what the summary CSV stores for a sign split, and how the table shows it
        let stored = format!("{:.2}", 66.666666);
        assert_eq!(
            format_cell("stakeDao_lower_percent", MetricFormat::Percentage, Some(&stored)),
            "66.67%"
        );
        assert_eq!(parse_number("12.5000%"), Some(12.5));
    }

    #[test]
    fn missing_and_garbage_are_na() {
        assert_eq!(format_cell("correlation", MetricFormat::Decimal, None), "N/A");
        assert_eq!(format_cell("correlation", MetricFormat::Decimal, Some("")), "N/A");
        assert_eq!(format_cell("correlation", MetricFormat::Decimal, Some("abc")), "N/A");
        assert_eq!(parse_number("N/A"), None);
    }

    #[test]
    fn integer_and_decimal() {
        assert_eq!(format_cell("total_data_points", MetricFormat::Integer, Some("42")), "42");
        assert_eq!(format_metric("correlation", MetricFormat::Decimal, 0.99999), "1.0000");
    }
}
