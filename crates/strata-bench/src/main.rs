use std::path::PathBuf;
use std::process;

use strata_bench::report;
use strata_bench::runner::BenchmarkRunner;
use strata_bench::scenes;
use strata_world::WorldConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut frame_count = 120u32;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "--help" | "-h") {
            print_usage();
            process::exit(0);
        }
        let Some(value) = args.get(i + 1) else {
            eprintln!("Missing value for {flag}");
            process::exit(1);
        };
        match flag {
            "--config" => config_path = Some(PathBuf::from(value)),
            "--baseline" => baseline_path = Some(PathBuf::from(value)),
            "--output" => output_path = Some(PathBuf::from(value)),
            "--regression-threshold" => regression_threshold = parse_or_exit(flag, value),
            "--frames" => frame_count = parse_or_exit(flag, value),
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 2;
    }

    let base = match &config_path {
        Some(path) => match WorldConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => WorldConfig::default(),
    };

    let runner = BenchmarkRunner::new(base, frame_count);
    let mut results = Vec::new();
    for scene in &scenes::standard_scenes() {
        match runner.run_scene(scene) {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("Scene '{}' failed: {e}", scene.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: run_label(),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            eprintln!("Failed to save baseline to {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

fn print_usage() {
    eprintln!("Usage: bench-runner [OPTIONS]");
    eprintln!("  --config <path>                World config RON (default: built-in)");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
    eprintln!("  --frames <n>                   Frames per scene (default: 120)");
}

fn parse_or_exit<T: std::str::FromStr>(flag: &str, value: &str) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid {flag} value: {value}");
            process::exit(1);
        }
    }
}

/// Seconds since the Unix epoch, without a date crate.
fn run_label() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("bench-{secs}")
}
