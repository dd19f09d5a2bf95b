use glam::DVec3;
use skyloop_core::constants::SHIFT_THRESHOLD_TILE_RATIO;
use skyloop_core::types::{ConceptualPos, RenderPos};

/// Offset the caller must add to its world-origin offset this step.
///
/// Pure. For x and z independently: when the render-space coordinate
/// (`conceptual - offset`) is farther than `threshold` from zero, the delta on
/// that axis is one tile toward it; otherwise zero. y is never shifted.
pub fn compute_shift_delta(
    conceptual: DVec3,
    offset: DVec3,
    threshold: f64,
    tile_size: f64,
) -> DVec3 {
    let render = conceptual - offset;
    DVec3::new(
        axis_shift(render.x, threshold, tile_size),
        0.0,
        axis_shift(render.z, threshold, tile_size),
    )
}

fn axis_shift(render: f64, threshold: f64, tile_size: f64) -> f64 {
    if render.abs() > threshold {
        render.signum() * tile_size
    } else {
        0.0
    }
}

/// Owner of the world-origin offset.
///
/// The offset only ever changes through [`rebase`](Self::rebase), by at most
/// one tile per axis per call, and always stays a whole number of tiles on
/// x/z.
#[derive(Debug, Clone)]
pub struct FloatingOrigin {
    offset: DVec3,
    threshold: f64,
    tile_size: f64,
    shifts: u64,
}

impl FloatingOrigin {
    /// `threshold` must exceed half a tile, or a shift could immediately
    /// trigger the opposite shift; smaller values are replaced by 1.5 tiles.
    pub fn new(tile_size: f64, threshold: f64) -> Self {
        let threshold = if threshold.is_finite() && threshold > tile_size / 2.0 {
            threshold
        } else {
            let corrected = tile_size * SHIFT_THRESHOLD_TILE_RATIO;
            log::warn!(
                "shift threshold {threshold} gives no hysteresis for tile size {tile_size}, using {corrected}"
            );
            corrected
        };
        Self {
            offset: DVec3::ZERO,
            threshold,
            tile_size,
            shifts: 0,
        }
    }

    pub fn offset(&self) -> DVec3 {
        self.offset
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Number of steps on which the offset moved.
    pub fn shift_count(&self) -> u64 {
        self.shifts
    }

    /// Apply this step's shift (if any) and return the delta that was added.
    /// Everything drawn this step must be re-derived from the new offset.
    pub fn rebase(&mut self, conceptual: DVec3) -> DVec3 {
        let delta = compute_shift_delta(conceptual, self.offset, self.threshold, self.tile_size);
        if delta != DVec3::ZERO {
            self.offset += delta;
            self.shifts += 1;
            log::debug!(
                "origin shifted by ({}, {}), offset now ({}, {})",
                delta.x,
                delta.z,
                self.offset.x,
                self.offset.z
            );
        }
        delta
    }

    /// Render-space position of a conceptual point under the current offset.
    pub fn to_render(&self, conceptual: ConceptualPos) -> RenderPos {
        (conceptual - self.offset).as_vec3()
    }

    /// Conceptual position recovered from a render-space point.
    pub fn to_conceptual(&self, render: RenderPos) -> ConceptualPos {
        render.as_dvec3() + self.offset
    }
}
