mod app;
mod camera;
mod input;
mod stats;

use app::Application;
use glam::DVec3;
use js_sys::{Float32Array, Uint32Array};
use skyloop_core::{load_config_from_str, FlightConfig};
use skyloop_world::TerrainVertex;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// WASM entry point. Sets the panic hook and initializes logging.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("skyloop: logger already initialized"));
    }
    log::info!("Skyloop starting...");
}

fn parse_config(config_ron: Option<String>) -> Result<FlightConfig, JsValue> {
    match config_ron {
        Some(text) => load_config_from_str(&text).map_err(|e| {
            log::error!("{e}");
            JsValue::from_str(&e.to_string())
        }),
        None => Ok(FlightConfig::default()),
    }
}

/// Browser handle on the flight core. The JS renderer owns drawing; this
/// owns terrain, origin shifting, tile streaming and the camera.
#[wasm_bindgen]
pub struct FlightDemo {
    app: Rc<RefCell<Application>>,
}

#[wasm_bindgen]
impl FlightDemo {
    /// Build from optional RON configuration text; defaults otherwise.
    #[wasm_bindgen(constructor)]
    pub fn new(config_ron: Option<String>) -> Result<FlightDemo, JsValue> {
        let config = parse_config(config_ron)?;
        Ok(Self {
            app: Rc::new(RefCell::new(Application::new(config))),
        })
    }

    /// Rebind the terrain (and grid) to new configuration. Idempotent:
    /// returns false when nothing changed.
    pub fn initialize_terrain_api(&self, config_ron: Option<String>) -> Result<bool, JsValue> {
        let config = parse_config(config_ron)?;
        Ok(self.app.borrow_mut().reconfigure(config))
    }

    pub fn get_height(&self, x: f64, z: f64) -> f32 {
        self.app.borrow().api().height(x, z)
    }

    /// Writes the unit normal into `out[0..3]`.
    pub fn get_surface_normal(&self, x: f64, z: f64, out: &mut [f32]) {
        if out.len() < 3 {
            log::warn!("get_surface_normal needs 3 output slots, got {}", out.len());
            return;
        }
        let n = self.app.borrow().api().surface_normal(x, z);
        out[..3].copy_from_slice(&n.to_array());
    }

    /// Listen for keyboard and mouse input on `canvas`.
    pub fn attach_input(&self, canvas: web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
        let state = self.app.borrow().input();
        input::register_input_listeners(&canvas, state)
    }

    /// Advance one step of `dt_ms` milliseconds, for callers driving their own loop.
    pub fn step(&self, dt_ms: f64) {
        self.app.borrow_mut().step(dt_ms);
    }

    /// Run on requestAnimationFrame; `on_frame(timestamp)` after each step.
    pub fn start(&self, on_frame: Option<js_sys::Function>) -> Result<(), JsValue> {
        Application::start_loop(self.app.clone(), on_frame)
    }

    pub fn stop(&self) {
        self.app.borrow_mut().stop();
    }

    pub fn tile_count(&self) -> usize {
        self.app.borrow().world().tiles().slots().len()
    }

    /// Changes whenever the tile's geometry was rebuilt.
    pub fn tile_revision(&self, index: usize) -> u32 {
        self.app
            .borrow()
            .world()
            .tiles()
            .slot(index)
            .map_or(0, |s| s.revision)
    }

    /// Writes the tile's render-space center into `out[0..3]`. Returns false
    /// for an unassigned or out-of-range slot.
    pub fn tile_render_position(&self, index: usize, out: &mut [f32]) -> bool {
        let app = self.app.borrow();
        match app.world().tiles().slot(index) {
            Some(slot) if slot.coord.is_some() && out.len() >= 3 => {
                out[..3].copy_from_slice(&slot.render_position.to_array());
                true
            }
            _ => false,
        }
    }

    /// Interleaved `[px, py, pz, nx, ny, nz]` per vertex, tile-local.
    pub fn tile_vertices(&self, index: usize) -> Option<Float32Array> {
        let app = self.app.borrow();
        let tiles = app.world().tiles();
        let id = tiles.slot(index)?.handle?;
        let mesh = tiles.backend().get(id)?;
        let floats: &[f32] = bytemuck::cast_slice::<TerrainVertex, f32>(&mesh.vertices);
        Some(Float32Array::from(floats))
    }

    pub fn tile_indices(&self, index: usize) -> Option<Uint32Array> {
        let app = self.app.borrow();
        let tiles = app.world().tiles();
        let id = tiles.slot(index)?.handle?;
        let mesh = tiles.backend().get(id)?;
        Some(Uint32Array::from(mesh.indices.as_slice()))
    }

    /// Camera eye in render space, written into `out[0..3]`.
    pub fn camera_render_position(&self, out: &mut [f32]) {
        let app = self.app.borrow();
        let eye = app.world().origin().to_render(app.camera().position);
        if out.len() >= 3 {
            out[..3].copy_from_slice(&eye.to_array());
        }
    }

    /// Camera position in conceptual (unshifted) world space.
    pub fn camera_conceptual_position(&self, out: &mut [f64]) {
        let app = self.app.borrow();
        if out.len() >= 3 {
            out[..3].copy_from_slice(&app.camera().position.to_array());
        }
    }

    /// Column-major view-projection matrix into `out[0..16]`.
    pub fn camera_view_proj(&self, aspect: f32, out: &mut [f32]) {
        let app = self.app.borrow();
        let eye = app.world().origin().to_render(app.camera().position);
        if out.len() >= 16 {
            out[..16].copy_from_slice(&app.camera().view_proj(eye, aspect).to_cols_array());
        }
    }

    pub fn origin_offset(&self, out: &mut [f64]) {
        let app = self.app.borrow();
        if out.len() >= 3 {
            out[..3].copy_from_slice(&app.world().origin().offset().to_array());
        }
    }

    pub fn shift_count(&self) -> u64 {
        self.app.borrow().world().origin().shift_count()
    }

    pub fn average_frame_ms(&self) -> f64 {
        self.app.borrow().stats().average_frame_ms()
    }

    pub fn stats_summary(&self) -> String {
        self.app.borrow().stats().summary()
    }
}

/// Fetch RON configuration from `config_url` and build a demo from it.
#[wasm_bindgen]
pub async fn load_flight_demo(config_url: String) -> Result<FlightDemo, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(&config_url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        let msg = format!("fetching {config_url} failed with status {}", response.status());
        log::error!("{msg}");
        return Err(JsValue::from_str(&msg));
    }
    let text = JsFuture::from(response.text()?).await?;
    FlightDemo::new(text.as_string())
}

/// Shift the caller's origin offset needs this step, written to `out[0..3]`.
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn compute_shift_delta(
    px: f64,
    py: f64,
    pz: f64,
    ox: f64,
    oy: f64,
    oz: f64,
    threshold: f64,
    tile_size: f64,
    out: &mut [f64],
) {
    let delta = skyloop_world::compute_shift_delta(
        DVec3::new(px, py, pz),
        DVec3::new(ox, oy, oz),
        threshold,
        tile_size,
    );
    if out.len() >= 3 {
        out[..3].copy_from_slice(&delta.to_array());
    }
}
