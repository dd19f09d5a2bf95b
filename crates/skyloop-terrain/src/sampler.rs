use crate::heightfield::Heightfield;
use glam::{DVec3, Vec3};
use skyloop_core::constants::DEFAULT_NORMAL_EPSILON;
use skyloop_core::math::wrap_coord;
use std::sync::Arc;

/// Height and upward normal at one point. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub height: f32,
    pub normal: Vec3,
}

/// Read-only handle to a heightfield. The only sanctioned way to turn a
/// conceptual world (x, z) into a terrain height or normal.
///
/// Cloning is cheap (one `Arc` increment); every clone answers identically.
#[derive(Debug, Clone)]
pub struct TerrainSampler {
    field: Arc<Heightfield>,
    normal_epsilon: f64,
}

impl TerrainSampler {
    pub fn new(field: Arc<Heightfield>, normal_epsilon: f64) -> Self {
        let normal_epsilon = if normal_epsilon.is_finite() && normal_epsilon > 0.0 {
            normal_epsilon
        } else {
            log::warn!(
                "normal epsilon {normal_epsilon} is not a positive number, using {DEFAULT_NORMAL_EPSILON}"
            );
            DEFAULT_NORMAL_EPSILON
        };
        Self {
            field,
            normal_epsilon,
        }
    }

    pub fn heightfield(&self) -> &Arc<Heightfield> {
        &self.field
    }

    pub fn normal_epsilon(&self) -> f64 {
        self.normal_epsilon
    }

    /// World units after which the terrain repeats.
    pub fn period(&self) -> f64 {
        self.field.scale()
    }

    /// Terrain height at conceptual world `(x, z)`.
    ///
    /// Bilinear over the wrapped array: interpolate along x on the two
    /// bracketing rows, then along z between them.
    pub fn height(&self, x: f64, z: f64) -> f32 {
        let h = self.height_f64(x, z);
        if h.is_finite() {
            h as f32
        } else {
            0.0
        }
    }

    fn height_f64(&self, x: f64, z: f64) -> f64 {
        let size = self.field.size();
        let period = size as f64;
        let to_array = period / self.field.scale();

        let ax = wrap_coord(x * to_array, period);
        let az = wrap_coord(z * to_array, period);
        let fx = ax.floor();
        let fz = az.floor();
        let tx = ax - fx;
        let tz = az - fz;

        let n = size as usize;
        let x0 = (fx as usize).min(n - 1);
        let z0 = (fz as usize).min(n - 1);
        let x1 = (x0 + 1) % n;
        let z1 = (z0 + 1) % n;

        let h00 = self.field.get(x0, z0) as f64;
        let h10 = self.field.get(x1, z0) as f64;
        let h01 = self.field.get(x0, z1) as f64;
        let h11 = self.field.get(x1, z1) as f64;

        let row0 = h00 + (h10 - h00) * tx;
        let row1 = h01 + (h11 - h01) * tx;
        row0 + (row1 - row0) * tz
    }

    /// Upward surface normal at `(x, z)` from central differences of
    /// [`height`](Self::height) at `x +- e` and `z +- e`.
    pub fn surface_normal(&self, x: f64, z: f64) -> Vec3 {
        let e = self.normal_epsilon;
        let dx = self.height(x - e, z) as f64 - self.height(x + e, z) as f64;
        let dz = self.height(x, z - e) as f64 - self.height(x, z + e) as f64;
        DVec3::new(dx, 2.0 * e, dz)
            .try_normalize()
            .map(|n| n.as_vec3())
            .unwrap_or(Vec3::Y)
    }

    /// Same as [`surface_normal`](Self::surface_normal), written into `out`.
    pub fn surface_normal_into(&self, x: f64, z: f64, out: &mut Vec3) {
        *out = self.surface_normal(x, z);
    }

    pub fn surface(&self, x: f64, z: f64) -> SurfaceSample {
        SurfaceSample {
            height: self.height(x, z),
            normal: self.surface_normal(x, z),
        }
    }
}
