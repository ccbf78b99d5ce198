//! Cold-cache access-pattern benchmark runner.
//!
//! Usage:
//!   cachebench                              # run all three patterns
//!   cachebench --direct --shuffled          # run selected patterns
//!   cachebench --cache-size 16777216        # assume a 16 MiB cache
//!   cachebench --seed 42 --export results   # reproducible run, export CSV + JSON

use cachebench::report::{self, BenchReport, SystemInfo};
use cachebench::{AccessPattern, BenchConfig, BenchResult, BenchmarkDriver, DataGen};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "cachebench",
    about = "Cold-cache micro-benchmark: pointer indirection vs direct sequential access"
)]
struct Cli {
    /// Run the direct sequential kernel.
    #[arg(long)]
    direct: bool,

    /// Run the identity-order indirect kernel.
    #[arg(long)]
    indirect: bool,

    /// Run the shuffled-order indirect kernel.
    #[arg(long)]
    shuffled: bool,

    /// Assumed CPU cache size in bytes. Set this for the target machine;
    /// it is never auto-detected.
    #[arg(long, default_value_t = cachebench::config::DEFAULT_CACHE_SIZE_BYTES)]
    cache_size: usize,

    /// Number of timed trials per pattern.
    #[arg(long, default_value_t = cachebench::config::DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Dataset length as a multiple of the cache-fitting integer count.
    #[arg(long, default_value_t = cachebench::config::DEFAULT_DATASET_MULTIPLIER)]
    multiplier: usize,

    /// Lower bound for generated dataset values (defaults per pattern).
    #[arg(long, requires = "value_max")]
    value_min: Option<i32>,

    /// Upper bound for generated dataset values (defaults per pattern).
    #[arg(long, requires = "value_min")]
    value_max: Option<i32>,

    /// Seed the random source for a reproducible run; defaults to OS entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Print each run's result as it completes.
    #[arg(long)]
    verbose: bool,

    /// Export directory for CSV + JSON results.
    #[arg(long)]
    export: Option<String>,
}

fn main() -> BenchResult<()> {
    let cli = Cli::parse();
    let program_start = Instant::now();

    // If no pattern flags, default to all three.
    let run_all = !cli.direct && !cli.indirect && !cli.shuffled;
    let mut patterns = Vec::new();
    if run_all || cli.direct {
        patterns.push(AccessPattern::Direct);
    }
    if run_all || cli.indirect {
        patterns.push(AccessPattern::IndirectIdentity);
    }
    if run_all || cli.shuffled {
        patterns.push(AccessPattern::IndirectShuffled);
    }

    let cfg = BenchConfig {
        cache_size_bytes: cli.cache_size,
        iterations: cli.iterations,
        dataset_multiplier: cli.multiplier,
        value_range: cli.value_min.zip(cli.value_max),
    };

    let mut gen = match cli.seed {
        Some(seed) => DataGen::with_seed(seed),
        None => DataGen::from_entropy(),
    };

    println!("\n{}", "▶ cachebench: cold-cache access patterns".bold().blue());
    println!(
        "  Iterations: {}  Patterns: {}",
        cfg.iterations,
        patterns
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut report = BenchReport {
        system: SystemInfo::collect(),
        config: cfg.clone(),
        runs: Vec::new(),
    };

    for &pattern in &patterns {
        use std::io::Write;
        print!("  {} ... ", pattern);
        let _ = std::io::stdout().flush();

        let driver = BenchmarkDriver::new(cfg.clone(), pattern)?;
        let summary = if cli.verbose {
            println!();
            driver.run_with(&mut gen, |run, result| match result {
                Some(r) => println!("    run {}: {}", run, r),
                None => println!("    run {}", run),
            })?
        } else {
            driver.run(&mut gen)?
        };

        println!(
            "{:.3} ms/run over {} runs",
            summary.avg_run_ms, summary.iterations
        );
        report.runs.push(summary);
    }

    println!();
    report::print_report(&report);

    if let Some(ref dir) = cli.export {
        let export_dir = Path::new(dir);
        std::fs::create_dir_all(export_dir)?;
        report::export_csv(&report, &export_dir.join("cachebench_results.csv"))?;
        report::export_json(&report, &export_dir.join("cachebench_results.json"))?;
    }

    println!(
        "  Total program time: {:.2}s (including population, shuffling and cache flushing)",
        program_start.elapsed().as_secs_f64()
    );

    Ok(())
}
