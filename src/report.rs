//! Terminal report and CSV/JSON export.

use crate::config::BenchConfig;
use crate::recorder::RunSummary;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;
use std::path::Path;

/// Everything one invocation produced: environment, configuration, and the
/// summaries of each selected pattern.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub system: SystemInfo,
    pub config: BenchConfig,
    pub runs: Vec<RunSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpus: usize,
}

impl SystemInfo {
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpus: std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// Terminal output
// ────────────────────────────────────────────────────────────────────────────────

/// Print the comparison table across patterns, highlighting the fastest
/// average run time.
pub fn print_report(report: &BenchReport) {
    println!(
        "  OS: {}  Arch: {}  CPUs: {}  Cache: {}  Dataset: {} ints",
        report.system.os,
        report.system.arch,
        report.system.cpus,
        format_bytes(report.config.cache_size_bytes as u64),
        format_count(report.config.dataset_len() as u64),
    );

    if report.runs.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS);

    table.set_header(vec![
        "Pattern",
        "Runs",
        "Total timed (s)",
        "Avg/run (ms)",
        "p50 (μs)",
        "p99 (μs)",
        "p99.9 (μs)",
        "Wall (s)",
    ]);

    let best_avg = report
        .runs
        .iter()
        .map(|r| r.avg_run_ms)
        .fold(f64::INFINITY, f64::min);

    for r in &report.runs {
        let is_best = report.runs.len() > 1 && (r.avg_run_ms - best_avg).abs() < f64::EPSILON;
        let name = if is_best {
            format!("★ {}", r.pattern)
        } else {
            r.pattern.to_string()
        };
        let name_cell = if is_best {
            Cell::new(name).fg(Color::Green)
        } else {
            Cell::new(name)
        };
        let avg_cell = if is_best {
            Cell::new(format!("{:.3}", r.avg_run_ms)).fg(Color::Green)
        } else {
            Cell::new(format!("{:.3}", r.avg_run_ms))
        };

        table.add_row(vec![
            name_cell,
            Cell::new(format_count(r.iterations)),
            Cell::new(format!("{:.3}", r.total_timed_secs)),
            avg_cell,
            Cell::new(format!("{:.1}", r.p50_us)),
            Cell::new(format!("{:.1}", r.p99_us)),
            Cell::new(format!("{:.1}", r.p999_us)),
            Cell::new(format!("{:.2}", r.wall_secs)),
        ]);
    }

    println!("{table}");

    for r in &report.runs {
        if let Some(result) = r.last_result {
            println!(
                "  {} {}",
                format!("{}:", r.pattern).dimmed(),
                format!("last result {}", result).dimmed()
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────────
// CSV export
// ────────────────────────────────────────────────────────────────────────────────

pub fn export_csv(report: &BenchReport, path: &Path) -> std::io::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "pattern",
        "iterations",
        "dataset_len",
        "total_timed_secs",
        "avg_run_ms",
        "p50_us",
        "p99_us",
        "p999_us",
        "mean_us",
        "wall_secs",
    ])?;

    for r in &report.runs {
        wtr.write_record([
            &r.pattern.to_string(),
            &r.iterations.to_string(),
            &r.dataset_len.to_string(),
            &format!("{:.6}", r.total_timed_secs),
            &format!("{:.4}", r.avg_run_ms),
            &format!("{:.2}", r.p50_us),
            &format!("{:.2}", r.p99_us),
            &format!("{:.2}", r.p999_us),
            &format!("{:.2}", r.mean_us),
            &format!("{:.4}", r.wall_secs),
        ])?;
    }

    wtr.flush()?;
    println!("  CSV exported to {}", path.display());
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────────
// JSON export
// ────────────────────────────────────────────────────────────────────────────────

pub fn export_json(report: &BenchReport, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(path, json)?;
    println!("  JSON exported to {}", path.display());
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────────
// Formatting helpers
// ────────────────────────────────────────────────────────────────────────────────

fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

fn format_bytes(b: u64) -> String {
    if b >= 1_073_741_824 {
        format!("{:.1} GB", b as f64 / 1_073_741_824.0)
    } else if b >= 1_048_576 {
        format!("{:.1} MB", b as f64 / 1_048_576.0)
    } else if b >= 1_024 {
        format!("{:.1} KB", b as f64 / 1_024.0)
    } else {
        format!("{} B", b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessPattern;

    fn sample_report() -> BenchReport {
        BenchReport {
            system: SystemInfo::collect(),
            config: BenchConfig::default(),
            runs: vec![RunSummary {
                pattern: AccessPattern::Direct,
                iterations: 1000,
                dataset_len: 20_971_520,
                total_timed_secs: 1.234,
                avg_run_ms: 1.234,
                p50_us: 1200.0,
                p99_us: 1500.0,
                p999_us: 1800.0,
                mean_us: 1234.0,
                wall_secs: 9.87,
                last_result: Some(38),
            }],
        }
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        export_csv(&sample_report(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("pattern,iterations"));
        assert!(lines.next().unwrap().starts_with("direct,1000"));
    }

    #[test]
    fn json_export_round_trips_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        export_json(&sample_report(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["runs"][0]["pattern"], "direct");
        assert_eq!(value["runs"][0]["iterations"], 1000);
        assert_eq!(value["config"]["iterations"], 1000);
    }

    #[test]
    fn byte_and_count_formatting() {
        assert_eq!(format_bytes(8 * 1024 * 1024), "8.0 MB");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_count(1000), "1.0K");
        assert_eq!(format_count(42), "42");
    }
}
