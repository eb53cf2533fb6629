//! End-to-end generator runs over a temporary data layout

use std::fs;
use std::path::Path;

use oracle_bench::pipeline::{
    run_all, ComparisonTableGenerator, Generator, LegChartGenerator, LegComparisonTableGenerator,
    LegCsvGenerator, OracleChartGenerator, OracleCsvGenerator,
};
use oracle_bench::AppConfig;
use tempfile::TempDir;

const E18: u128 = 1_000_000_000_000_000_000;

fn feed(points: &[(i64, f64)]) -> String {
    let entries: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, &(t, p))| {
            format!(
                r#"{{"price": "{}", "timestamp": {}, "block_number": {}}}"#,
                (p * 1e6).round() as u128 * (E18 / 1_000_000),
                t,
                1000 + i
            )
        })
        .collect();
    format!("[{}]", entries.join(","))
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Layout with one good stableswap pool (with v2), one missing its primary feed,
/// one malformed, and one leg pool with three legs
fn fixture() -> (TempDir, AppConfig) {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let config = AppConfig::with_roots(&data, dir.path().join("assets"));

    let good = data.join("stableswap/USDCUSDT");
    write(
        &good.join("curve-stableswap.json"),
        &feed(&[(3600, 1.05), (7200, 1.0), (10800, 0.95)]),
    );
    write(
        &good.join("sd-stableswap.json"),
        &feed(&[(3600, 1.0), (7200, 1.1), (10800, 0.9)]),
    );
    write(
        &good.join("sd-stableswap-v2.json"),
        &feed(&[(3600, 1.04), (7200, 1.0), (14400, 1.0)]),
    );

    let missing = data.join("stableswap/ETHstETH");
    write(&missing.join("curve-stableswap.json"), &feed(&[(3600, 1.0)]));

    let malformed = data.join("stableswap/BROKEN");
    write(&malformed.join("curve-stableswap.json"), "{not json");
    write(&malformed.join("sd-stableswap.json"), &feed(&[(3600, 1.0)]));

    let legs = data.join("leg-sensitivity-benchmark/stableswap/USDCUSDT");
    write(&legs.join("sd-coins2.json"), &feed(&[(3600, 1.0), (7200, 1.0)]));
    write(&legs.join("sd-coins10.json"), &feed(&[(3600, 1.02), (7200, 0.98)]));
    write(&legs.join("sd-coins3.json"), &feed(&[(3600, 1.0), (10800, 1.01)]));
    write(&legs.join("notes.txt"), "ignored");

    (dir, config)
}

#[test]
fn csv_generator_skips_bad_pools_and_writes_good_ones() {
    let (_dir, config) = fixture();
    let summary = OracleCsvGenerator.run(&config).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 2);

    let csv_dir = config.csv_dir();
    let detail = fs::read_to_string(csv_dir.join("oracle-comparison-stableswap-USDCUSDT.csv")).unwrap();
    let lines: Vec<&str> = detail.lines().collect();
    assert!(lines[0].ends_with("stakeDao_v2_price,price_difference_v2,price_difference_percent_v2"));
    // union of v1 and v2 timestamps
    assert_eq!(lines.len(), 1 + 4);
    assert!(lines[1].starts_with("1970-01-01T01:00:00.000Z,1000,1.000000,1.050000,0.050000,5.0000,"));

    let summary_csv =
        fs::read_to_string(csv_dir.join("oracle-summary-stableswap-USDCUSDT.csv")).unwrap();
    let rows: Vec<&str> = summary_csv.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with("USDCUSDT,stableswap,3,"));

    assert!(!csv_dir.join("oracle-summary-stableswap-ETHstETH.csv").exists());
    assert!(!csv_dir.join("oracle-summary-stableswap-BROKEN.csv").exists());
}

#[test]
fn tables_read_back_summaries() {
    let (_dir, config) = fixture();
    OracleCsvGenerator.run(&config).unwrap();
    let summary = ComparisonTableGenerator.run(&config).unwrap();
    assert_eq!(summary.processed, 1);

    let assets = &config.paths.assets_dir;
    let md = fs::read_to_string(assets.join("comparison-table-stableswap.md")).unwrap();
    assert!(md.starts_with("# Oracle Comparison Summary - Stableswap Pools"));
    // discovery order is sorted
    assert!(md.contains("| Metric | BROKEN | ETHstETH | USDCUSDT |"));
    assert!(md.contains("| Total Data Points (v1) | N/A | N/A | 3 |"));
    assert!(md.contains("| Total Data Points (v2) | N/A | N/A | 2 |"));
    assert!(md.contains("- **Best Correlation (v1)**: USDCUSDT"));

    let mirror =
        fs::read_to_string(config.csv_dir().join("oracle-comparison-table-stableswap.csv")).unwrap();
    assert!(mirror.starts_with("metric,BROKEN,ETHstETH,USDCUSDT\n"));

    let combined = fs::read_to_string(assets.join("comparison-table-all-pools.md")).unwrap();
    assert!(combined.contains("| Metric | stableswap-USDCUSDT |"));
}

#[test]
fn charts_include_v2_line() {
    let (_dir, config) = fixture();
    let summary = OracleChartGenerator.run(&config).unwrap();
    assert_eq!(summary.processed, 1);

    let html = fs::read_to_string(
        config
            .charts_dir()
            .join("oracle-comparison-stableswap-USDCUSDT.html"),
    )
    .unwrap();
    assert!(html.contains("\"label\":\"Curve Oracle\""));
    assert!(html.contains("\"label\":\"StakeDAO Oracle\""));
    assert!(html.contains("\"label\":\"StakeDAO v2 Oracle\""));
}

#[test]
fn leg_pipeline_orders_legs_naturally() {
    let (_dir, config) = fixture();
    assert_eq!(LegCsvGenerator.run(&config).unwrap().processed, 1);

    let csv_dir = config.leg_csv_dir();
    let detail = fs::read_to_string(csv_dir.join("leg-data-stableswap-USDCUSDT.csv")).unwrap();
    let lines: Vec<&str> = detail.lines().collect();
    assert_eq!(
        lines[0],
        "timestamp,block_number,coins2_price,coins3_price,coins10_price"
    );
    assert_eq!(lines.len(), 1 + 3);
    // coins2 (baseline) has no sample at 10800, so the block number is empty
    assert_eq!(lines[3], "1970-01-01T03:00:00.000Z,,,1.010000,");

    let summary = fs::read_to_string(csv_dir.join("leg-summary-stableswap-USDCUSDT.csv")).unwrap();
    assert!(summary.starts_with("metric,coins2,coins3,coins10\n"));
    assert!(summary.contains("\nTotal Data Points,2,2,2\n"));
    assert!(summary.contains("\nMax Drawdown (%),0.0000%,0.0000%,3.9216%\n"));
    // deviation is baseline minus leg: coins10 sits 0.02 above, then below, the baseline
    assert!(summary.contains("\nMax Diff vs Baseline,0.000000,0.000000,0.020000\n"));
    assert!(summary.contains("\nMin Diff vs Baseline,0.000000,0.000000,-0.020000\n"));
    assert!(summary.contains("\nJoined Points vs Baseline,2,1,2\n"));

    assert_eq!(LegComparisonTableGenerator.run(&config).unwrap().processed, 1);
    let md = fs::read_to_string(
        config
            .paths
            .leg_assets_dir
            .join("leg-comparison-stableswap.md"),
    )
    .unwrap();
    assert!(md.starts_with("# Leg Sensitivity Comparison - stableswap\n\n### USDCUSDT\n"));
    assert!(md.contains("- Smallest drawdown: coins2, coins3 (0.0000%)"));
    assert!(md.contains("- Lending recommendation: coins2 ("));

    assert_eq!(LegChartGenerator.run(&config).unwrap().processed, 1);
    assert!(config
        .leg_charts_dir()
        .join("leg-sensitivity-stableswap-USDCUSDT.html")
        .exists());
}

#[test]
fn full_batch_survives_empty_layout() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::with_roots(dir.path().join("nothing"), dir.path().join("assets"));
    let generators: Vec<Box<dyn Generator>> = oracle_bench::pipeline::all_generators();
    let total = run_all(&generators, &config);
    assert_eq!(total.processed, 0);
}
