//! oracle-bench - runs every generator in order
//!
//! CSV files first, then the tables and charts built from them; the
//! implementations benchmark before the leg-sensitivity benchmark.

use oracle_bench::pipeline;

fn main() -> anyhow::Result<()> {
    pipeline::execute(&pipeline::all_generators())
}
