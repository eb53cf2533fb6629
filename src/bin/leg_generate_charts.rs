//! Leg-sensitivity charts, one line per leg
//!
//! Usage: cargo run --bin leg-generate-charts

use oracle_bench::pipeline::{self, Generator, LegChartGenerator};

fn main() -> anyhow::Result<()> {
    let generators: [Box<dyn Generator>; 1] = [Box::new(LegChartGenerator)];
    pipeline::execute(&generators)
}
