//! Leg-sensitivity comparison tables with highlights
//!
//! Usage: cargo run --bin leg-comparison-table

use oracle_bench::pipeline::{self, Generator, LegComparisonTableGenerator};

fn main() -> anyhow::Result<()> {
    let generators: [Box<dyn Generator>; 1] = [Box::new(LegComparisonTableGenerator)];
    pipeline::execute(&generators)
}
