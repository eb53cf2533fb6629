//! Markdown and CSV comparison tables built from the summary CSVs
//!
//! Usage: cargo run --bin generate-comparison-table

use oracle_bench::pipeline::{self, Generator, ComparisonTableGenerator};

fn main() -> anyhow::Result<()> {
    let generators: [Box<dyn Generator>; 1] = [Box::new(ComparisonTableGenerator)];
    pipeline::execute(&generators)
}
