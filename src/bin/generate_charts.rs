//! Interactive price charts per pool
//!
//! Usage: cargo run --bin generate-charts

use oracle_bench::pipeline::{self, Generator, OracleChartGenerator};

fn main() -> anyhow::Result<()> {
    let generators: [Box<dyn Generator>; 1] = [Box::new(OracleChartGenerator)];
    pipeline::execute(&generators)
}
