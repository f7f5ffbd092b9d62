//! Headless comparison: prints every table re-render to stdout and writes
//! `<strategy>.csv` exports when `export_dir` is configured.

use anyhow::{Context, Result};
use frame_bench::bench::report::{export_csv, latest};
use frame_bench::bench::{self, TerminalSink};
use frame_bench::BenchConfig;

fn main() -> Result<()> {
    env_logger::init();

    let config = BenchConfig::load().context("loading config")?;
    log::info!(
        "Comparing over {} ({}), checkpoints {:?} GB",
        config.data_dir.display(),
        config.pattern,
        config.budgets_gb
    );

    let mut sink = TerminalSink::default();
    let comparison = bench::run_comparison(&config, &mut sink).context("running comparison")?;

    for table in [&comparison.lazy, &comparison.eager] {
        match latest(table) {
            Some(record) => println!(
                "{}: largest dataset {} read in {:.2}s",
                table.strategy,
                record.budget,
                record.load.as_secs_f64()
            ),
            None => println!("{}: no dataset fit any checkpoint", table.strategy),
        }
    }

    if let Some(dir) = &config.export_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        for table in [&comparison.lazy, &comparison.eager] {
            let path = dir.join(format!("{}.csv", table.strategy.to_lowercase()));
            export_csv(table, &path).with_context(|| format!("exporting {}", table.strategy))?;
        }
    }
    Ok(())
}
