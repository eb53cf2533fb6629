//! Leg-sensitivity comparison tables and highlights

use super::format::parse_number;
use crate::persistence::{LegSummaryRow, LegSummaryTable};

/// Values closer than this are considered tied
pub const EPSILON: f64 = 1e-9;

const VOLATILITY_ROW: &str = "Volatility (%)";
const DRAWDOWN_ROW: &str = "Max Drawdown (%)";
const STD_DEV_ROW: &str = "Std Dev Price";

/// Legs sharing the lowest value of a row, with the display value of the first
#[derive(Debug, Clone, PartialEq)]
pub struct Winners {
    pub indices: Vec<usize>,
    pub display: String,
}

/// Lowest numeric value of `row`; values within `EPSILON` of the best are tied
pub fn pick_lowest(row: &LegSummaryRow) -> Option<Winners> {
    let mut best = f64::INFINITY;
    let mut indices: Vec<usize> = Vec::new();

    for (index, value) in row.values.iter().enumerate() {
        let Some(value) = parse_number(value) else {
            continue;
        };
        if value < best - EPSILON {
            best = value;
            indices = vec![index];
        } else if (value - best).abs() <= EPSILON {
            indices.push(index);
        }
    }

    let first = *indices.first()?;
    Some(Winners {
        display: row.values[first].clone(),
        indices,
    })
}

fn format_winners(table: &LegSummaryTable, winners: &Winners) -> String {
    let labels: Vec<&str> = winners
        .indices
        .iter()
        .filter_map(|&i| table.legs.get(i).map(String::as_str))
        .collect();
    format!("{} ({})", labels.join(", "), winners.display)
}

fn metric_value(row: Option<&LegSummaryRow>, index: usize) -> f64 {
    row.and_then(|r| r.values.get(index))
        .and_then(|v| parse_number(v))
        .unwrap_or(f64::INFINITY)
}

/// Leg ranked first by volatility, then drawdown, then std-dev price.
///
/// Missing values rank last; a full tie keeps the earlier leg.
pub fn recommend(table: &LegSummaryTable) -> Option<usize> {
    let rows = [
        table.row(VOLATILITY_ROW),
        table.row(DRAWDOWN_ROW),
        table.row(STD_DEV_ROW),
    ];

    (0..table.legs.len()).reduce(|best, candidate| {
        for row in rows {
            let a = metric_value(row, candidate);
            let b = metric_value(row, best);
            if a < b - EPSILON {
                return candidate;
            }
            if a > b + EPSILON {
                return best;
            }
        }
        best
    })
}

fn recommendation_line(table: &LegSummaryTable, best: usize) -> String {
    let cell = |name: &str| {
        table
            .row(name)
            .map(|row| row.values.get(best).cloned().unwrap_or_default())
    };
    let details: Vec<String> = [
        cell(VOLATILITY_ROW).map(|v| format!("vol {}", v)),
        cell(DRAWDOWN_ROW).map(|v| format!("drawdown {}", v)),
        cell(STD_DEV_ROW).map(|v| format!("std {}", v)),
    ]
    .into_iter()
    .flatten()
    .collect();

    format!(
        "Lending recommendation: {} ({})",
        table.legs[best],
        details.join(", ")
    )
}

pub fn highlights(table: &LegSummaryTable) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(winners) = table.row(VOLATILITY_ROW).and_then(pick_lowest) {
        lines.push(format!("Lowest volatility: {}", format_winners(table, &winners)));
    }
    if let Some(winners) = table.row(DRAWDOWN_ROW).and_then(pick_lowest) {
        lines.push(format!("Smallest drawdown: {}", format_winners(table, &winners)));
    }
    if let Some(best) = recommend(table) {
        lines.push(recommendation_line(table, best));
    }
    lines
}

/// `### pool` section with the summary table and its highlights
pub fn render_pool_section(pool: &str, table: &LegSummaryTable) -> String {
    let mut md = format!("### {}\n\n", pool);

    let mut header = vec!["Metric".to_string()];
    header.extend(table.legs.iter().cloned());
    let separator = vec!["---"; table.legs.len() + 1];
    md.push_str(&format!("| {} |\n", header.join(" | ")));
    md.push_str(&format!("| {} |\n", separator.join(" | ")));

    for row in &table.rows {
        md.push_str(&format!("| {} | {} |\n", row.metric, row.values.join(" | ")));
    }

    let lines = highlights(table);
    if !lines.is_empty() {
        md.push_str("\nHighlights:\n");
        for line in lines {
            md.push_str(&format!("- {}\n", line));
        }
    }
    md.push('\n');
    md
}

/// `leg-comparison-{type}.md` from the pools that have a summary
pub fn render_leg_comparison(pool_type: &str, sections: &[(String, LegSummaryTable)]) -> String {
    let mut md = format!("# Leg Sensitivity Comparison - {}\n\n", pool_type);
    for (pool, table) in sections {
        md.push_str(&render_pool_section(pool, table));
    }
    format!("{}\n", md.trim_end())
}
