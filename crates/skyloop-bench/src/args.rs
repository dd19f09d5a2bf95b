use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: bench-runner [OPTIONS]
  --baseline <path>              Compare against a baseline JSON
  --output <path>                Save this run as a baseline JSON
  --config <path>                Flight configuration (RON)
  --regression-threshold <pct>   Timing regression threshold (default: 10)
  --steps <n>                    Steps per scene (default: 2000)
  --scene <filter>               Only run scenes whose name contains <filter>";

/// Command line of the bench runner. Flags take `--flag value` or `--flag=value`.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchArgs {
    pub baseline: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub regression_threshold: f64,
    pub steps: u32,
    pub scene_filter: Option<String>,
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            baseline: None,
            output: None,
            config: None,
            regression_threshold: 10.0,
            steps: 2_000,
            scene_filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(BenchArgs),
    Help,
}

impl BenchArgs {
    /// Parse everything after the program name.
    pub fn parse<I>(args: I) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Ok(Command::Help);
            }
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg, None),
            };
            let mut value = || {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| format!("missing value for {flag}"))
            };

            match flag.as_str() {
                "--baseline" => parsed.baseline = Some(PathBuf::from(value()?)),
                "--output" => parsed.output = Some(PathBuf::from(value()?)),
                "--config" => parsed.config = Some(PathBuf::from(value()?)),
                "--scene" => parsed.scene_filter = Some(value()?),
                "--regression-threshold" => {
                    let raw = value()?;
                    parsed.regression_threshold = match raw.parse::<f64>() {
                        Ok(pct) if pct.is_finite() && pct >= 0.0 => pct,
                        _ => return Err(format!("invalid --regression-threshold value: {raw}")),
                    };
                }
                "--steps" => {
                    let raw = value()?;
                    parsed.steps = match raw.parse::<u32>() {
                        Ok(n) if n > 0 => n,
                        _ => return Err(format!("invalid --steps value: {raw}")),
                    };
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }

        Ok(Command::Run(parsed))
    }

    /// Whether the scene called `name` is selected by `--scene`.
    pub fn selects(&self, name: &str) -> bool {
        self.scene_filter
            .as_deref()
            .map_or(true, |filter| name.contains(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        BenchArgs::parse(args.iter().map(|a| a.to_string()))
    }

    fn run(args: &[&str]) -> BenchArgs {
        match parse(args) {
            Ok(Command::Run(parsed)) => parsed,
            other => panic!("expected a run command, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(run(&[]), BenchArgs::default());
    }

    #[test]
    fn test_separate_and_inline_values() {
        let parsed = run(&[
            "--baseline",
            "base.json",
            "--steps=500",
            "--regression-threshold",
            "2.5",
            "--scene=toroidal",
        ]);
        assert_eq!(parsed.baseline, Some(PathBuf::from("base.json")));
        assert_eq!(parsed.steps, 500);
        assert_eq!(parsed.regression_threshold, 2.5);
        assert!(parsed.selects("circle/toroidal"));
        assert!(!parsed.selects("circle/fixed"));
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["--steps", "10", "-h"]), Ok(Command::Help));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["--steps", "0"]).is_err());
        assert!(parse(&["--steps", "many"]).is_err());
        assert!(parse(&["--regression-threshold=-1"]).is_err());
        assert_eq!(parse(&["--output"]), Err("missing value for --output".to_string()));
        assert_eq!(parse(&["--fast"]), Err("unknown argument: --fast".to_string()));
    }
}
