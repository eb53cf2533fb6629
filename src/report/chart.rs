//! Interactive HTML line charts (Chart.js with time axis and zoom plugin)

use anyhow::{Context, Result};
use serde::Serialize;

use crate::types::{iso_timestamp, Series};

/// Line colours, cycled per dataset
pub const PALETTE: [(u8, u8, u8); 7] = [
    (54, 162, 235),
    (255, 99, 132),
    (75, 192, 192),
    (255, 205, 86),
    (153, 102, 255),
    (255, 159, 64),
    (201, 203, 207),
];

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    /// ISO-8601 instant, parsed by the date adapter
    pub x: String,
    pub y: f64,
}

/// One line of the chart, serialized as a Chart.js dataset
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<ChartPoint>,
    pub border_color: String,
    pub background_color: String,
    pub tension: f64,
}

impl Dataset {
    pub fn from_series(label: impl Into<String>, series: &Series, color: (u8, u8, u8)) -> Self {
        let (r, g, b) = color;
        Self {
            label: label.into(),
            data: series
                .samples
                .iter()
                .map(|s| ChartPoint {
                    x: iso_timestamp(&s.timestamp),
                    y: s.price,
                })
                .collect(),
            border_color: format!("rgb({}, {}, {})", r, g, b),
            background_color: format!("rgba({}, {}, {}, 0.1)", r, g, b),
            tension: 0.1,
        }
    }
}

/// Palette colour of the `index`-th dataset
pub fn palette_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Page text shared by both chart kinds
#[derive(Debug, Clone)]
pub struct ChartPage {
    pub page_title: String,
    pub chart_title: String,
    pub y_axis: String,
}

/// Render a self-contained HTML page for `datasets`
pub fn render_chart_html(page: &ChartPage, datasets: &[Dataset]) -> Result<String> {
    let datasets_json =
        serde_json::to_string(datasets).context("Failed to serialize chart datasets")?;
    let page_title = escape_html(&page.page_title);
    let chart_title = escape_js(&page.chart_title);
    let y_axis = escape_js(&page.y_axis);

    Ok(format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <title>{page_title}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/chartjs-adapter-date-fns@3.0.0/dist/chartjs-adapter-date-fns.bundle.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/chartjs-plugin-zoom@2.0.1/dist/chartjs-plugin-zoom.min.js"></script>
</head>
<body>
    <canvas id="oracleChart" width="1200" height="600"></canvas>
    <script>
        const ctx = document.getElementById('oracleChart').getContext('2d');
        new Chart(ctx, {{
            type: 'line',
            data: {{
                datasets: {datasets_json}
            }},
            options: {{
                responsive: true,
                scales: {{
                    x: {{
                        type: 'time',
                        time: {{
                            unit: 'day'
                        }},
                        title: {{
                            display: true,
                            text: 'Time'
                        }}
                    }},
                    y: {{
                        title: {{
                            display: true,
                            text: '{y_axis}'
                        }}
                    }}
                }},
                plugins: {{
                    title: {{
                        display: true,
                        text: '{chart_title}'
                    }},
                    zoom: {{
                        pan: {{
                            enabled: true,
                            mode: 'x',
                            modifierKey: 'shift'
                        }},
                        zoom: {{
                            wheel: {{
                                enabled: true,
                            }},
                            pinch: {{
                                enabled: true
                            }},
                            mode: 'x',
                            drag: {{
                                enabled: true,
                                backgroundColor: 'rgba(225,225,225,0.3)',
                                borderColor: 'rgba(225,225,225)',
                                borderWidth: 1
                            }}
                        }}
                    }}
                }}
            }}
        }});
    </script>
</body>
</html>"#
    ))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape for a single-quoted JS string literal
fn escape_js(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('<', "\\x3c")
}
