use skyloop_world::StepReport;

const FRAME_WINDOW: usize = 60;

/// Rolling frame timing and streaming counters for the page's HUD.
pub struct FrameStats {
    frame_times: [f64; FRAME_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    avg_frame_time_ms: f64,
    steps: u64,
    shifts: u64,
    regenerations: u64,
    max_render_distance: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; FRAME_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            avg_frame_time_ms: 0.0,
            steps: 0,
            shifts: 0,
            regenerations: 0,
            max_render_distance: 0.0,
        }
    }

    /// Record a frame's delta time and update the rolling average.
    pub fn record_frame(&mut self, delta_ms: f64) {
        self.frame_times[self.frame_index] = delta_ms;
        self.frame_index = (self.frame_index + 1) % FRAME_WINDOW;
        self.frames_seen = (self.frames_seen + 1).min(FRAME_WINDOW);
        let sum: f64 = self.frame_times.iter().sum();
        self.avg_frame_time_ms = sum / self.frames_seen as f64;
    }

    pub fn record_step(&mut self, report: &StepReport) {
        self.steps += 1;
        if report.shifted() {
            self.shifts += 1;
        }
        self.regenerations += report.tiles.regenerated as u64;
        let horizontal = report.camera_render.x.hypot(report.camera_render.z);
        self.max_render_distance = self.max_render_distance.max(horizontal);
    }

    pub fn average_frame_ms(&self) -> f64 {
        self.avg_frame_time_ms
    }

    pub fn fps(&self) -> f64 {
        if self.avg_frame_time_ms > 0.0 {
            1000.0 / self.avg_frame_time_ms
        } else {
            0.0
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn shifts(&self) -> u64 {
        self.shifts
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Largest horizontal distance of the camera from the render origin.
    pub fn max_render_distance(&self) -> f32 {
        self.max_render_distance
    }

    pub fn summary(&self) -> String {
        format!(
            "{:.2} ms | {:.0} FPS | shifts {} | tiles rebuilt {} | max render dist {:.1}",
            self.avg_frame_time_ms,
            self.fps(),
            self.shifts,
            self.regenerations,
            self.max_render_distance
        )
    }
}
