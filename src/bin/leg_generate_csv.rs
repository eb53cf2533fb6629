//! Leg-sensitivity detail and summary CSVs
//!
//! Usage: cargo run --bin leg-generate-csv

use oracle_bench::pipeline::{self, Generator, LegCsvGenerator};

fn main() -> anyhow::Result<()> {
    let generators: [Box<dyn Generator>; 1] = [Box::new(LegCsvGenerator)];
    pipeline::execute(&generators)
}
