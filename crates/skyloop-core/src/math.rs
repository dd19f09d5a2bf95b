use crate::types::{ConceptualPos, GridCoord};
use glam::{DVec2, I64Vec2};

/// Convert a conceptual position to the grid cell whose tile contains it.
///
/// Tiles are centered on `coord * tile_size`, so the containing cell is the
/// rounded quotient rather than the floored one.
pub fn world_to_grid(pos: ConceptualPos, tile_size: f64) -> GridCoord {
    I64Vec2::new(
        (pos.x / tile_size).round() as i64,
        (pos.z / tile_size).round() as i64,
    )
}

/// Conceptual x/z of a tile's center.
pub fn grid_to_world(coord: GridCoord, tile_size: f64) -> DVec2 {
    DVec2::new(coord.x as f64 * tile_size, coord.y as f64 * tile_size)
}

/// Non-negative remainder of a fractional array coordinate.
/// Negative inputs wrap into `[0, period)` instead of going negative.
pub fn wrap_coord(value: f64, period: f64) -> f64 {
    let wrapped = value.rem_euclid(period);
    // rem_euclid can round up to exactly `period` for tiny negative inputs.
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an integer sample index into `[0, size)`.
pub fn wrap_index(index: i64, size: u32) -> usize {
    index.rem_euclid(size as i64) as usize
}

/// Square neighborhood of side `dimension` centered on `center`, in row-major
/// order (z outer, x inner).
pub fn neighborhood(center: GridCoord, dimension: u32) -> Vec<GridCoord> {
    let half = (dimension / 2) as i64;
    let mut coords = Vec::with_capacity(dimension as usize * dimension as usize);
    for dz in -half..=half {
        for dx in -half..=half {
            coords.push(center + I64Vec2::new(dx, dz));
        }
    }
    coords
}

/// Whether `dimension` is a power of two.
pub fn is_power_of_two(dimension: u32) -> bool {
    dimension != 0 && dimension & (dimension - 1) == 0
}
