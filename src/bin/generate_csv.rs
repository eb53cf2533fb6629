//! Per-pool detail and summary CSVs of the implementations benchmark
//!
//! Usage: cargo run --bin generate-csv

use oracle_bench::pipeline::{self, Generator, OracleCsvGenerator};

fn main() -> anyhow::Result<()> {
    let generators: [Box<dyn Generator>; 1] = [Box::new(OracleCsvGenerator)];
    pipeline::execute(&generators)
}
