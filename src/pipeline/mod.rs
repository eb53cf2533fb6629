//! Generators - batch drivers behind every binary
//!
//! Each generator walks the data layout, processes one pool at a time and
//! contains failures at the pool boundary: the pool is logged and skipped, the
//! batch keeps going.

mod implementations;
mod legs;

pub use implementations::{ComparisonTableGenerator, OracleChartGenerator, OracleCsvGenerator};
pub use legs::{LegChartGenerator, LegComparisonTableGenerator, LegCsvGenerator};

use anyhow::Result;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::error::BenchError;

/// Outcome counters of one generator run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn merge(&mut self, other: RunSummary) {
        self.processed += other.processed;
        self.skipped += other.skipped;
    }
}

pub trait Generator {
    /// Binary-style name used in logs
    fn name(&self) -> &'static str;

    fn run(&self, config: &AppConfig) -> Result<RunSummary>;
}

/// Every generator in execution order: CSV, tables, charts; implementations then legs
pub fn all_generators() -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(OracleCsvGenerator),
        Box::new(ComparisonTableGenerator),
        Box::new(OracleChartGenerator),
        Box::new(LegCsvGenerator),
        Box::new(LegComparisonTableGenerator),
        Box::new(LegChartGenerator),
    ]
}

/// Run one generator, logging instead of propagating its failure
pub fn run_generator(generator: &dyn Generator, config: &AppConfig) -> Option<RunSummary> {
    let started = Instant::now();
    info!(generator = generator.name(), "Starting generator");

    match generator.run(config) {
        Ok(summary) => {
            info!(
                generator = generator.name(),
                processed = summary.processed,
                skipped = summary.skipped,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Generator completed"
            );
            Some(summary)
        }
        Err(e) => {
            error!(generator = generator.name(), error = %format!("{:#}", e), "Generator failed");
            None
        }
    }
}

/// Run `generators` in order and return the merged counters
pub fn run_all(generators: &[Box<dyn Generator>], config: &AppConfig) -> RunSummary {
    let mut total = RunSummary::default();
    for generator in generators {
        if let Some(summary) = run_generator(generator.as_ref(), config) {
            total.merge(summary);
        }
    }
    total
}

/// Entry point shared by the binaries: load config, init logging, run.
///
/// Only configuration and logging setup make this fail.
pub fn execute(generators: &[Box<dyn Generator>]) -> Result<()> {
    let config = AppConfig::load()?;
    crate::logging::init(&config.logging)?;
    info!(config = %config, "Configuration loaded");

    let total = run_all(generators, &config);
    info!(
        processed = total.processed,
        skipped = total.skipped,
        "All generators finished"
    );
    Ok(())
}

/// Log a contained per-pool failure; missing inputs only warrant a warning
pub(crate) fn report_pool_failure(pool_type: &str, pool: &str, err: &anyhow::Error) {
    let missing = err.chain().any(|cause| {
        cause
            .downcast_ref::<BenchError>()
            .is_some_and(BenchError::is_missing_input)
    });

    if missing {
        warn!(pool, pool_type, error = %format!("{:#}", err), "Input missing, skipping pool");
    } else {
        error!(pool, pool_type, error = %format!("{:#}", err), "Failed to process pool, skipping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    struct Counting;

    impl Generator for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn run(&self, _config: &AppConfig) -> Result<RunSummary> {
            Ok(RunSummary {
                processed: 2,
                skipped: 1,
            })
        }
    }

    struct Failing;

    impl Generator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn run(&self, _config: &AppConfig) -> Result<RunSummary> {
            anyhow::bail!("boom")
        }
    }

    #[test]
    fn failing_generator_does_not_stop_the_batch() {
        let generators: Vec<Box<dyn Generator>> =
            vec![Box::new(Failing), Box::new(Counting), Box::new(Counting)];
        let total = run_all(&generators, &AppConfig::default());
        assert_eq!(
            total,
            RunSummary {
                processed: 4,
                skipped: 2
            }
        );
    }

    #[test]
    fn generator_order() {
        let names: Vec<&str> = all_generators().iter().map(|g| g.name()).collect();
        assert_eq!(
            names,
            vec![
                "generate-csv",
                "generate-comparison-table",
                "generate-charts",
                "leg-generate-csv",
                "leg-comparison-table",
                "leg-generate-charts",
            ]
        );
    }

    #[test]
    fn missing_input_is_found_through_context() {
        let err: anyhow::Error = Err::<(), _>(BenchError::MissingInputFile(PathBuf::from("x.json")))
            .context("Failed to load pool")
            .unwrap_err();
        assert!(err
            .chain()
            .any(|c| c.downcast_ref::<BenchError>().is_some_and(BenchError::is_missing_input)));
        // logging path only; must not panic
        report_pool_failure("stableswap", "USDCUSDT", &err);
    }
}
