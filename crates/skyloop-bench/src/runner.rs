use std::time::Instant;

use skyloop_core::FlightConfig;
use skyloop_terrain::TerrainApi;
use skyloop_world::backend::CpuGeometryBackend;
use skyloop_world::FlightWorld;

use crate::scenes::SceneConfig;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub step_count: u32,
    pub tile_regenerations: u64,
    pub origin_shifts: u64,
    /// Largest horizontal distance of the camera from the render origin.
    pub max_render_distance: f64,
    pub timings: TimingSeries,
}

/// Runs scripted flights headless against the CPU geometry backend.
pub struct BenchmarkRunner {
    config: FlightConfig,
    api: TerrainApi,
    step_count: u32,
}

impl BenchmarkRunner {
    pub fn with_config(config: FlightConfig, step_count: u32) -> Self {
        Self {
            config: config.validated(),
            api: TerrainApi::new(),
            step_count,
        }
    }

    /// Run a single benchmark scene and return timing results.
    /// The heightfield is generated once and shared by every scene.
    pub fn run_scene(&mut self, scene: &SceneConfig) -> BenchmarkResult {
        log::info!(
            "Running scene '{}' ({} steps at {} units/step)...",
            scene.name,
            self.step_count,
            scene.speed
        );

        let config = FlightConfig {
            slot_layout: scene.layout,
            ..self.config.clone()
        };
        let mut world = FlightWorld::from_api(&config, &mut self.api, CpuGeometryBackend::new());

        // Populate the grid outside the timed loop
        world.step(scene.path.position_at(0.0));
        let initial_regenerations = world.tiles().total_regenerations();

        let mut step_times = Vec::with_capacity(self.step_count as usize);
        let mut max_render_distance = 0.0f64;

        for step in 1..=self.step_count {
            let position = scene.path.position_at(step as f64 * scene.speed);

            let step_start = Instant::now();
            let report = world.step(position);
            let elapsed = step_start.elapsed().as_secs_f64() * 1000.0;
            step_times.push(elapsed);

            let render = position - world.origin().offset();
            max_render_distance = max_render_distance.max(render.x.hypot(render.z));
            debug_assert_eq!(report.camera_render, world.origin().to_render(position));
        }

        let timings = compute_timings(&step_times);
        log::info!(
            "  Done: mean={:.3}ms, p95={:.3}ms, p99={:.3}ms",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms
        );

        BenchmarkResult {
            scene_name: scene.name.clone(),
            step_count: self.step_count,
            tile_regenerations: world.tiles().total_regenerations() - initial_regenerations,
            origin_shifts: world.origin().shift_count(),
            max_render_distance,
            timings,
        }
    }
}

/// Compute timing statistics from a list of step times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
