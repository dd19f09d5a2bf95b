use std::io;
use std::path::Path;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use skyloop_bench::args::{BenchArgs, Command, USAGE};
use skyloop_bench::report;
use skyloop_bench::runner::BenchmarkRunner;
use skyloop_bench::scenes;
use skyloop_core::{load_config_from_str, FlightConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match BenchArgs::parse(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            eprintln!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            process::exit(2);
        }
    };

    let config = match args.config.as_deref() {
        Some(path) => load_config(path),
        None => FlightConfig::default(),
    };

    let selected: Vec<_> = scenes::standard_scenes()
        .into_iter()
        .filter(|scene| args.selects(&scene.name))
        .collect();
    if selected.is_empty() {
        eprintln!("ERROR: no scene matches the --scene filter");
        process::exit(2);
    }

    let mut runner = BenchmarkRunner::with_config(config, args.steps);
    let results: Vec<_> = selected.iter().map(|scene| runner.run_scene(scene)).collect();

    println!("\n## Flight Benchmark ({} steps per scene)\n", args.steps);
    println!("{}", report::format_markdown(&results));

    if let Some(path) = args.output.as_deref() {
        let baseline = report::Baseline {
            timestamp: timestamp(),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            eprintln!("ERROR: failed to save baseline to {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(path) = args.baseline.as_deref() {
        match report::load_baseline(path) {
            Ok(baseline) => {
                let regressions = report::compare(&results, &baseline, args.regression_threshold);
                println!(
                    "{}",
                    report::format_comparison(&regressions, args.regression_threshold)
                );
                if !regressions.is_empty() {
                    process::exit(1);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("No baseline at {}, skipping comparison", path.display());
            }
            Err(e) => {
                eprintln!("ERROR: cannot load baseline {}: {e}", path.display());
                process::exit(1);
            }
        }
    }
}

fn load_config(path: &Path) -> FlightConfig {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| load_config_from_str(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}: {e}", path.display());
            process::exit(1);
        }
    }
}

/// Seconds since the Unix epoch, without a date-time dependency.
fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("bench-{secs}")
}
