pub mod backend;
pub mod geometry;
pub mod origin;
pub mod tile;
pub mod tile_grid;

#[cfg(test)]
mod test_harness;

use backend::{CpuGeometryBackend, GeometryBackend};
use glam::{DVec3, Vec3};
use origin::FloatingOrigin;
use skyloop_core::types::ConceptualPos;
use skyloop_core::FlightConfig;
use skyloop_terrain::{TerrainApi, TerrainSampler};
use tile_grid::{TileGridConfig, TileGridManager, UpdateStats};

pub use backend::MeshId;
pub use geometry::{build_tile_mesh, TerrainVertex, TileMesh};
pub use origin::compute_shift_delta;
pub use tile::{SlotState, TileSlot};

/// Result of one [`FlightWorld::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Delta added to the origin offset this step (zero when none).
    pub shift: DVec3,
    pub tiles: UpdateStats,
    /// Where the camera must be drawn this step.
    pub camera_render: Vec3,
}

impl StepReport {
    pub fn shifted(&self) -> bool {
        self.shift != DVec3::ZERO
    }
}

/// Primary public struct for the skyloop-world crate.
/// Ties the floating origin to the tile pool and runs them in step order.
pub struct FlightWorld<B: GeometryBackend = CpuGeometryBackend> {
    origin: FloatingOrigin,
    tiles: TileGridManager<B>,
    sampler: TerrainSampler,
}

impl<B: GeometryBackend> FlightWorld<B> {
    /// Build a world over `sampler`. `config` is validated first.
    pub fn new(config: &FlightConfig, sampler: TerrainSampler, backend: B) -> Self {
        let config = config.validated();
        let origin = FloatingOrigin::new(config.tile_size, config.shift_threshold);
        let tiles = TileGridManager::new(
            sampler.clone(),
            backend,
            TileGridConfig::from(&config),
        );
        log::info!(
            "flight world: {}x{} tiles of {} units, {} segments, {:?} layout",
            config.grid_dimension,
            config.grid_dimension,
            config.tile_size,
            config.tile_segments,
            config.slot_layout
        );
        Self {
            origin,
            tiles,
            sampler,
        }
    }

    /// Bind `api` to the configured heightfield and build a world over it.
    pub fn from_api(config: &FlightConfig, api: &mut TerrainApi, backend: B) -> Self {
        let validated = config.validated();
        api.initialize(&validated.heightfield, validated.normal_epsilon);
        Self::new(&validated, api.sampler().clone(), backend)
    }

    /// Advance one step to `conceptual`.
    ///
    /// Order is fixed: rebase the origin, then update tiles against the new
    /// offset, then derive the camera's render position. Nothing drawn this
    /// step may use an offset from before the rebase.
    pub fn step(&mut self, conceptual: ConceptualPos) -> StepReport {
        let shift = self.origin.rebase(conceptual);
        let tiles = self.tiles.update(conceptual, self.origin.offset());
        let camera_render = self.origin.to_render(conceptual);
        StepReport {
            shift,
            tiles,
            camera_render,
        }
    }

    pub fn origin(&self) -> &FloatingOrigin {
        &self.origin
    }

    pub fn tiles(&self) -> &TileGridManager<B> {
        &self.tiles
    }

    pub fn sampler(&self) -> &TerrainSampler {
        &self.sampler
    }

    /// Terrain height under conceptual `(x, z)`.
    pub fn ground_height(&self, x: f64, z: f64) -> f32 {
        self.sampler.height(x, z)
    }
}
