use crate::backend::GeometryBackend;
use crate::geometry::build_tile_mesh;
use crate::tile::TileSlot;
use glam::{DVec3, I64Vec2, Vec3};
use skyloop_core::math::{grid_to_world, neighborhood, world_to_grid};
use skyloop_core::types::{ConceptualPos, GridCoord, SlotLayout};
use skyloop_core::{corrected_grid_dimension, corrected_tile_size, FlightConfig};
use skyloop_terrain::TerrainSampler;

/// Streaming parameters of a [`TileGridManager`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGridConfig {
    pub tile_size: f64,
    /// Tiles per side; odd so the viewpoint cell is the center.
    pub dimension: u32,
    pub segments: u32,
    pub layout: SlotLayout,
}

impl From<&FlightConfig> for TileGridConfig {
    fn from(cfg: &FlightConfig) -> Self {
        Self {
            tile_size: cfg.tile_size,
            dimension: cfg.grid_dimension,
            segments: cfg.tile_segments,
            layout: cfg.slot_layout,
        }
    }
}

/// What one [`TileGridManager::update`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// The viewpoint entered a different cell (always true on the first call).
    pub cell_changed: bool,
    /// Slots whose geometry was rebuilt.
    pub regenerated: usize,
}

/// Fixed pool of `dimension^2` tile slots kept centered on the viewpoint.
///
/// Slots are recycled, never created or destroyed after construction. Every
/// handle uploaded to the backend is released exactly once: when its slot
/// is reassigned, on [`clear`](Self::clear), or on drop.
pub struct TileGridManager<B: GeometryBackend> {
    config: TileGridConfig,
    sampler: TerrainSampler,
    backend: B,
    slots: Vec<TileSlot<B::Handle>>,
    viewpoint: Option<GridCoord>,
    regenerations: u64,
}

impl<B: GeometryBackend> TileGridManager<B> {
    pub fn new(sampler: TerrainSampler, backend: B, config: TileGridConfig) -> Self {
        let mut config = config;
        config.tile_size = corrected_tile_size(config.tile_size);
        config.dimension = corrected_grid_dimension(config.dimension);

        let count = config.dimension as usize * config.dimension as usize;
        let slots = (0..count).map(TileSlot::placeholder).collect();
        Self {
            config,
            sampler,
            backend,
            slots,
            viewpoint: None,
            regenerations: 0,
        }
    }

    pub fn config(&self) -> &TileGridConfig {
        &self.config
    }

    /// Per-step driver. Call after the origin has been rebased for this step.
    ///
    /// Recycles slots only when the viewpoint cell changed since the last
    /// call; repositions every slot against `offset` on every call.
    pub fn update(&mut self, conceptual: ConceptualPos, offset: DVec3) -> UpdateStats {
        let cell = world_to_grid(conceptual, self.config.tile_size);
        let mut stats = UpdateStats::default();

        if self.viewpoint != Some(cell) {
            stats.cell_changed = true;
            self.viewpoint = Some(cell);
            let targets = self.target_coords(cell);
            for (index, target) in targets.into_iter().enumerate() {
                if self.slots[index].coord != Some(target) {
                    self.regenerate(index, target);
                    stats.regenerated += 1;
                }
            }
            log::debug!(
                "viewpoint entered cell ({}, {}), {} tiles regenerated",
                cell.x,
                cell.y,
                stats.regenerated
            );
        }

        self.reposition(offset);
        stats
    }

    /// Coordinate each slot must hold while the viewpoint is in `center`,
    /// in slot order.
    fn target_coords(&self, center: GridCoord) -> Vec<GridCoord> {
        match self.config.layout {
            // Row-major neighborhood order is exactly the fixed slot order.
            SlotLayout::Fixed => neighborhood(center, self.config.dimension),
            SlotLayout::Toroidal => {
                let dim = self.config.dimension as i64;
                let lo = center - I64Vec2::splat(dim / 2);
                (0..self.slots.len() as i64)
                    .map(|index| {
                        let (sx, sz) = (index % dim, index / dim);
                        I64Vec2::new(
                            lo.x + (sx - lo.x).rem_euclid(dim),
                            lo.y + (sz - lo.y).rem_euclid(dim),
                        )
                    })
                    .collect()
            }
        }
    }

    fn regenerate(&mut self, index: usize, coord: GridCoord) {
        if let Some(old) = self.slots[index].reassign(coord) {
            self.backend.release(old);
        }
        let mesh = build_tile_mesh(
            &self.sampler,
            coord,
            self.config.tile_size,
            self.config.segments,
        );
        let handle = self.backend.upload(mesh);
        self.slots[index].attach(handle);
        self.regenerations += 1;
        log::trace!("slot {index} regenerated for ({}, {})", coord.x, coord.y);
    }

    fn reposition(&mut self, offset: DVec3) {
        let tile = self.config.tile_size;
        for slot in &mut self.slots {
            if let Some(coord) = slot.coord {
                let center = grid_to_world(coord, tile);
                slot.render_position = (DVec3::new(center.x, 0.0, center.y) - offset).as_vec3();
            }
        }
    }

    /// Release all geometry and return every slot to a placeholder. The next
    /// update repopulates the whole grid.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if let Some(handle) = slot.reset() {
                self.backend.release(handle);
            }
            slot.render_position = Vec3::ZERO;
        }
        self.viewpoint = None;
    }

    pub fn slots(&self) -> &[TileSlot<B::Handle>] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&TileSlot<B::Handle>> {
        self.slots.get(index)
    }

    pub fn slot_for_coord(&self, coord: GridCoord) -> Option<&TileSlot<B::Handle>> {
        self.slots.iter().find(|s| s.coord == Some(coord))
    }

    /// Conceptual coordinates currently held, in slot order.
    pub fn occupied_coords(&self) -> Vec<GridCoord> {
        self.slots.iter().filter_map(|s| s.coord).collect()
    }

    pub fn viewpoint_cell(&self) -> Option<GridCoord> {
        self.viewpoint
    }

    /// Slot regenerations since construction.
    pub fn total_regenerations(&self) -> u64 {
        self.regenerations
    }

    pub fn sampler(&self) -> &TerrainSampler {
        &self.sampler
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: GeometryBackend> Drop for TileGridManager<B> {
    fn drop(&mut self) {
        self.clear();
    }
}
