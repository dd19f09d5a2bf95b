use crate::camera::FlightCamera;
use crate::input::InputState;
use crate::stats::FrameStats;
use skyloop_core::FlightConfig;
use skyloop_terrain::TerrainApi;
use skyloop_world::backend::CpuGeometryBackend;
use skyloop_world::{FlightWorld, StepReport};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Frames further apart than this are treated as a backgrounded tab.
const MAX_FRAME_GAP_MS: f64 = 100.0;
const MAX_STEP_SECONDS: f64 = 0.1;

/// Main application struct. Owns the terrain, the streaming world and the
/// flight camera, and runs them once per frame.
pub struct Application {
    config: FlightConfig,
    api: TerrainApi,
    world: FlightWorld,
    camera: FlightCamera,
    input: Rc<RefCell<InputState>>,
    stats: FrameStats,
    last_frame_time: f64,
    last_report: Option<StepReport>,
    running: bool,
    /// Bumped on every start so a loop left over from before a stop exits.
    loop_generation: u32,
}

impl Application {
    pub fn new(config: FlightConfig) -> Self {
        let config = config.validated();
        let mut api = TerrainApi::new();
        let world = FlightWorld::from_api(&config, &mut api, CpuGeometryBackend::new());
        let ground = world.ground_height(0.0, 0.0) as f64;
        let camera = FlightCamera::new(ground + config.flight.start_altitude);

        let mut app = Self {
            config,
            api,
            world,
            camera,
            input: Rc::new(RefCell::new(InputState::new())),
            stats: FrameStats::new(),
            last_frame_time: 0.0,
            last_report: None,
            running: false,
            loop_generation: 0,
        };
        app.settle();
        app
    }

    /// Apply a new configuration. Rebuilds the world when the terrain or
    /// the grid layout changed; returns whether it did.
    pub fn reconfigure(&mut self, config: FlightConfig) -> bool {
        let config = config.validated();
        let terrain_changed = self
            .api
            .initialize(&config.heightfield, config.normal_epsilon);
        let grid_changed = config.tile_size != self.config.tile_size
            || config.grid_dimension != self.config.grid_dimension
            || config.shift_threshold != self.config.shift_threshold
            || config.tile_segments != self.config.tile_segments
            || config.slot_layout != self.config.slot_layout;

        self.config = config;
        if !terrain_changed && !grid_changed {
            return false;
        }

        log::info!("configuration changed, rebuilding world");
        // Dropping the old world releases all of its tile geometry.
        self.world = FlightWorld::new(
            &self.config,
            self.api.sampler().clone(),
            CpuGeometryBackend::new(),
        );
        self.settle();
        true
    }

    /// Step in place until the origin has caught up with the camera.
    fn settle(&mut self) {
        let ground = self
            .world
            .ground_height(self.camera.position.x, self.camera.position.z);
        self.camera.keep_above(ground);
        let mut report = self.world.step(self.camera.position);
        while report.shifted() {
            report = self.world.step(self.camera.position);
        }
        self.last_report = Some(report);
    }

    /// Advance the flight by `dt_ms` milliseconds of input.
    pub fn step(&mut self, dt_ms: f64) -> StepReport {
        let dt = (dt_ms / 1000.0).clamp(0.0, MAX_STEP_SECONDS);
        {
            let mut input = self.input.borrow_mut();
            self.camera.fly(&input, dt, &self.config.flight);
            input.clear_deltas();
        }
        let ground = self
            .world
            .ground_height(self.camera.position.x, self.camera.position.z);
        self.camera.keep_above(ground);

        let report = self.world.step(self.camera.position);
        self.stats.record_step(&report);
        self.last_report = Some(report);
        report
    }

    /// One animation frame at `timestamp` (ms). Returns false when the frame
    /// was skipped.
    fn frame(&mut self, timestamp: f64) -> bool {
        let delta = if self.last_frame_time > 0.0 {
            timestamp - self.last_frame_time
        } else {
            0.0
        };
        self.last_frame_time = timestamp;

        // Skip frame if tab was backgrounded
        if delta > MAX_FRAME_GAP_MS {
            return false;
        }

        self.stats.record_frame(delta);
        self.step(delta);
        true
    }

    pub fn api(&self) -> &TerrainApi {
        &self.api
    }

    pub fn world(&self) -> &FlightWorld {
        &self.world
    }

    pub fn camera(&self) -> &FlightCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FlightCamera {
        &mut self.camera
    }

    pub fn input(&self) -> Rc<RefCell<InputState>> {
        self.input.clone()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn last_report(&self) -> Option<&StepReport> {
        self.last_report.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The loop stops rescheduling itself on its next frame.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_frame_time = 0.0;
    }

    /// Start the requestAnimationFrame loop. `on_frame` is called with the
    /// frame timestamp after each step, outside any borrow of the app, so it
    /// may read tiles and camera state back.
    ///
    /// Creates the rAF closure once per start, not per frame.
    pub fn start_loop(
        app: Rc<RefCell<Self>>,
        on_frame: Option<js_sys::Function>,
    ) -> Result<(), JsValue> {
        let generation = {
            let mut app_ref = app.borrow_mut();
            if app_ref.running {
                return Ok(());
            }
            app_ref.running = true;
            app_ref.loop_generation = app_ref.loop_generation.wrapping_add(1);
            app_ref.loop_generation
        };

        let closure: RafClosure = Rc::new(RefCell::new(None));
        let closure_clone = closure.clone();

        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            let stepped = {
                let mut app_ref = app.borrow_mut();
                if !app_ref.running || app_ref.loop_generation != generation {
                    return;
                }
                app_ref.frame(timestamp)
            };

            if stepped {
                if let Some(callback) = &on_frame {
                    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(timestamp)) {
                        log::error!("frame callback failed: {e:?}");
                    }
                }
            }

            if let Err(e) = request_frame(&closure_clone) {
                log::error!("rAF registration failed: {e:?}");
            }
        }) as Box<dyn FnMut(f64)>));

        request_frame(&closure)
    }
}

fn request_frame(closure: &RafClosure) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let slot = closure.borrow();
    let callback = slot
        .as_ref()
        .ok_or_else(|| JsValue::from_str("rAF closure missing"))?;
    window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    Ok(())
}
