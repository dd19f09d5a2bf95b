use glam::Vec3;
use skyloop_core::types::GridCoord;

/// Tile slot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Never assigned a coordinate; no geometry.
    Placeholder,
    /// Coordinate reassigned, geometry not yet rebuilt.
    Stale,
    /// Geometry matches the assigned coordinate.
    Current,
}

/// One entry of the fixed tile pool. Slots are reused, never destroyed.
#[derive(Debug, Clone)]
pub struct TileSlot<H> {
    pub index: usize,
    /// Conceptual grid coordinate. None while a placeholder.
    pub coord: Option<GridCoord>,
    pub handle: Option<H>,
    pub state: SlotState,
    /// `coord * tile_size - offset`, refreshed every update.
    pub render_position: Vec3,
    /// Bumped on every regeneration so renderers can tell geometry changed.
    pub revision: u32,
}

impl<H> TileSlot<H> {
    pub fn placeholder(index: usize) -> Self {
        Self {
            index,
            coord: None,
            handle: None,
            state: SlotState::Placeholder,
            render_position: Vec3::ZERO,
            revision: 0,
        }
    }

    /// Point the slot at a new coordinate. Returns the old handle, which the
    /// caller must release before uploading the replacement.
    pub fn reassign(&mut self, coord: GridCoord) -> Option<H> {
        self.coord = Some(coord);
        self.state = SlotState::Stale;
        self.handle.take()
    }

    /// Attach freshly uploaded geometry for the current coordinate.
    pub fn attach(&mut self, handle: H) {
        self.handle = Some(handle);
        self.state = SlotState::Current;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Drop back to a placeholder, returning any handle to release.
    pub fn reset(&mut self) -> Option<H> {
        self.coord = None;
        self.state = SlotState::Placeholder;
        self.handle.take()
    }

    pub fn is_current(&self) -> bool {
        self.state == SlotState::Current
    }
}
