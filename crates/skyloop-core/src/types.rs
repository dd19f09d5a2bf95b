use glam::{DVec3, I64Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Tile coordinate in grid-space (each unit = one tile edge).
/// `x` is the grid x axis, `y` is the grid z axis. 64-bit so cells stay
/// distinct however far the viewpoint travels.
pub type GridCoord = I64Vec2;

/// Unbounded position in the infinite world. Kept in f64 so it can grow
/// without the precision collapse the render path would suffer.
pub type ConceptualPos = DVec3;

/// Position relative to the current floating origin. Always small.
pub type RenderPos = Vec3;

/// Heightfield synthesis method. Both produce exactly periodic arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeightfieldAlgorithm {
    /// Toroidal midpoint displacement (diamond-square).
    #[default]
    DiamondSquare,
    /// Fractal sum of lattice-periodic gradient noise.
    PeriodicFbm,
}

/// How pool slots map onto the neighborhood around the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlotLayout {
    /// Slot `k` keeps a constant offset from the viewpoint cell.
    #[default]
    Fixed,
    /// Slot `(sx, sz)` holds the coordinate congruent to it modulo the grid
    /// dimension, so a one-cell crossing only recycles one row or column.
    Toroidal,
}
