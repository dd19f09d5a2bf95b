//! Toroidal diamond-square (midpoint displacement).
//!
//! The array is treated as a torus: every neighbor read wraps modulo
//! `size`, so the result tiles with itself exactly. `size` must be a power
//! of two; the four logical corners of the first square are all the single
//! sample at (0, 0) under wraparound and start at `initial_corner`.

use crate::hash::{hash_to_signed, lattice_hash};

/// Fill a `size * size` row-major array. `size` must be a power of two >= 2.
///
/// `amplitude` is the displacement range of the first level; each later
/// level is scaled by `2^-roughness`.
pub(crate) fn diamond_square(
    size: u32,
    seed: u64,
    amplitude: f64,
    roughness: f64,
    initial_corner: f64,
) -> Vec<f64> {
    let n = size as usize;
    let mut data = vec![0.0f64; n * n];
    let idx = |x: usize, z: usize| (z % n) * n + (x % n);

    data[0] = initial_corner;

    let decay = 2f64.powf(-roughness);
    let mut amp = amplitude;
    let mut step = n;
    while step > 1 {
        let half = step / 2;

        // Diamond: square centers from the four square corners.
        for z in (0..n).step_by(step) {
            for x in (0..n).step_by(step) {
                let avg = (data[idx(x, z)]
                    + data[idx(x + step, z)]
                    + data[idx(x, z + step)]
                    + data[idx(x + step, z + step)])
                    * 0.25;
                let (cx, cz) = (x + half, z + half);
                data[idx(cx, cz)] = avg + displacement(seed, cx, cz, amp);
            }
        }

        // Square: edge midpoints from their four diamond neighbors.
        for z in (0..n).step_by(half) {
            let x_start = if (z / half) % 2 == 0 { half } else { 0 };
            for x in (x_start..n).step_by(step) {
                let avg = (data[idx(x + n - half, z)]
                    + data[idx(x + half, z)]
                    + data[idx(x, z + n - half)]
                    + data[idx(x, z + half)])
                    * 0.25;
                data[idx(x, z)] = avg + displacement(seed, x, z, amp);
            }
        }

        amp *= decay;
        step = half;
    }

    data
}

fn displacement(seed: u64, x: usize, z: usize, amp: f64) -> f64 {
    hash_to_signed(lattice_hash(seed, x as i64, z as i64)) * amp * 0.5
}
