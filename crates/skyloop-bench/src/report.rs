use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::runner::BenchmarkResult;

/// Results of one bench run, stored as JSON for later comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Read a baseline. A missing file surfaces as `ErrorKind::NotFound`;
/// malformed JSON as `ErrorKind::InvalidData`.
pub fn load_baseline(path: &Path) -> io::Result<Baseline> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write a baseline through a sibling temp file so an interrupted run never
/// leaves a truncated baseline behind.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(baseline).map_err(io::Error::other)?;
    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, json)?;
    std::fs::rename(&staging, path)
}

/// A scene that got worse relative to its baseline entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Regression {
    /// Mean step time grew by `pct` percent.
    SlowerMean { scene: String, pct: f64 },
    /// p99 step time grew by `pct` percent.
    SlowerTail { scene: String, pct: f64 },
    /// Scripted paths are deterministic, so more rebuilt tiles over the same
    /// number of steps means the streaming behavior itself changed.
    TileChurn {
        scene: String,
        baseline: u64,
        current: u64,
    },
}

impl Regression {
    pub fn scene(&self) -> &str {
        match self {
            Self::SlowerMean { scene, .. }
            | Self::SlowerTail { scene, .. }
            | Self::TileChurn { scene, .. } => scene,
        }
    }
}

impl fmt::Display for Regression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlowerMean { scene, pct } => write!(f, "{scene}: mean step time +{pct:.1}%"),
            Self::SlowerTail { scene, pct } => write!(f, "{scene}: p99 step time +{pct:.1}%"),
            Self::TileChurn {
                scene,
                baseline,
                current,
            } => write!(f, "{scene}: {current} tile rebuilds, baseline had {baseline}"),
        }
    }
}

/// Percent growth from `base` to `current`; `None` when there is no usable base.
fn growth_pct(base: f64, current: f64) -> Option<f64> {
    (base > 0.0).then(|| (current - base) / base * 100.0)
}

/// Check every current scene that also appears in `baseline`. Timings
/// regress past `threshold_pct`; tile churn regresses on any increase when
/// both runs flew the same number of steps.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            log::info!("scene '{}' has no baseline entry", result.scene_name);
            continue;
        };
        let scene = || result.scene_name.clone();

        if let Some(pct) = growth_pct(base.timings.mean_ms, result.timings.mean_ms) {
            if pct > threshold_pct {
                regressions.push(Regression::SlowerMean { scene: scene(), pct });
            }
        }
        if let Some(pct) = growth_pct(base.timings.p99_ms, result.timings.p99_ms) {
            if pct > threshold_pct {
                regressions.push(Regression::SlowerTail { scene: scene(), pct });
            }
        }
        if base.step_count == result.step_count
            && result.tile_regenerations > base.tile_regenerations
        {
            regressions.push(Regression::TileChurn {
                scene: scene(),
                baseline: base.tile_regenerations,
                current: result.tile_regenerations,
            });
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Steps | Rebuilt tiles | Shifts | Max render dist | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Min (ms) | Max (ms) |\n");
    out.push_str("|-------|-------|---------------|--------|-----------------|-----------|-------------|----------|----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.1} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |\n",
            r.scene_name,
            r.step_count,
            r.tile_regenerations,
            r.origin_shifts,
            r.max_render_distance,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.min_ms,
            r.timings.max_ms,
        ));
    }

    out
}

/// Human-readable comparison summary, one line per regression.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!("No regressions against baseline ({threshold_pct:.0}% timing threshold).\n");
    }

    let mut out = format!("### Regressions ({})\n\n", regressions.len());
    for regression in regressions {
        out.push_str(&format!("- {regression}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::compute_timings;

    fn result(name: &str, step_ms: &[f64], regenerations: u64) -> BenchmarkResult {
        BenchmarkResult {
            scene_name: name.to_string(),
            step_count: 10,
            tile_regenerations: regenerations,
            origin_shifts: 2,
            max_render_distance: 120.0,
            timings: compute_timings(step_ms),
        }
    }

    fn baseline(results: Vec<BenchmarkResult>) -> Baseline {
        Baseline {
            timestamp: "bench-0".to_string(),
            results,
        }
    }

    #[test]
    fn test_compare_flags_slower_mean_only_past_threshold() {
        let base = baseline(vec![result("a", &[1.0], 5), result("b", &[1.0], 5)]);
        let current = vec![result("a", &[1.05], 5), result("b", &[1.5], 5), result("new", &[9.0], 5)];
        let regressions = compare(&current, &base, 10.0);
        // A single sample is its own mean and p99
        assert_eq!(
            regressions,
            vec![
                Regression::SlowerMean { scene: "b".to_string(), pct: 50.0 },
                Regression::SlowerTail { scene: "b".to_string(), pct: 50.0 },
            ]
        );
    }

    #[test]
    fn test_compare_flags_tail_latency_spike() {
        let steady: Vec<f64> = vec![1.0; 100];
        let mut spiky = steady.clone();
        spiky[99] = 40.0;
        let base = baseline(vec![result("circle/toroidal", &steady, 5)]);
        // Mean grows 39%, p99 forty-fold
        let regressions = compare(&[result("circle/toroidal", &spiky, 5)], &base, 50.0);
        assert_eq!(regressions.len(), 1);
        assert!(matches!(regressions[0], Regression::SlowerTail { .. }));
        assert_eq!(regressions[0].scene(), "circle/toroidal");
    }

    #[test]
    fn test_compare_flags_tile_churn_for_equal_step_counts() {
        let base = baseline(vec![result("straight/fixed", &[1.0], 50)]);
        let churned = compare(&[result("straight/fixed", &[1.0], 75)], &base, 10.0);
        assert_eq!(
            churned,
            vec![Regression::TileChurn {
                scene: "straight/fixed".to_string(),
                baseline: 50,
                current: 75,
            }]
        );

        let longer = BenchmarkResult {
            step_count: 20,
            ..result("straight/fixed", &[1.0], 75)
        };
        assert!(compare(&[longer], &base, 10.0).is_empty());
    }

    #[test]
    fn test_zero_baseline_timing_is_skipped() {
        let base = baseline(vec![result("a", &[0.0], 5)]);
        assert!(compare(&[result("a", &[9.0], 5)], &base, 10.0).is_empty());
    }

    #[test]
    fn test_save_then_load_baseline() {
        let dir = std::env::temp_dir().join(format!("skyloop-bench-{}", std::process::id()));
        let path = dir.join("baseline.json");
        save_baseline(&path, &baseline(vec![result("straight/fixed", &[0.25], 5)]))
            .expect("write baseline");
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_baseline(&path).expect("read baseline");
        assert_eq!(loaded.results[0].scene_name, "straight/fixed");
        assert_eq!(loaded.results[0].timings.mean_ms, 0.25);

        std::fs::write(&path, "not json").expect("overwrite");
        let err = load_baseline(&path).expect_err("malformed baseline");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        let err = load_baseline(&dir.join("missing.json")).expect_err("missing baseline");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_markdown_has_row_per_scene() {
        let table = format_markdown(&[result("a", &[1.0], 5), result("b", &[2.0], 5)]);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("| b | 10 | 5 | 2 | 120.0 |"));
    }

    #[test]
    fn test_format_comparison() {
        assert!(format_comparison(&[], 10.0).contains("No regressions"));
        let text = format_comparison(
            &[Regression::TileChurn {
                scene: "zigzag/fixed".to_string(),
                baseline: 10,
                current: 12,
            }],
            10.0,
        );
        assert!(text.contains("Regressions (1)"));
        assert!(text.contains("zigzag/fixed: 12 tile rebuilds, baseline had 10"));
    }
}
