use crate::hash::lattice_hash;

/// Gradient noise whose lattice repeats with an integer period, so sampling
/// across a whole period returns to the starting value exactly.
pub(crate) struct PeriodicNoise {
    /// Permutation table (doubled for wrapping).
    perm: [u8; 512],
}

impl PeriodicNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            perm: Self::build_permutation(seed),
        }
    }

    /// 2D gradient noise at `(x, z)` in lattice units with the lattice
    /// wrapped every `period` cells on both axes. Returns roughly [-1, 1].
    pub fn sample(&self, x: f64, z: f64, period: i64) -> f64 {
        let period = period.max(1);
        let xf = x.floor();
        let zf = z.floor();
        let tx = x - xf;
        let tz = z - zf;

        let x0 = (xf as i64).rem_euclid(period);
        let z0 = (zf as i64).rem_euclid(period);
        let x1 = (x0 + 1) % period;
        let z1 = (z0 + 1) % period;

        let n00 = Self::grad2d(self.hash(x0, z0), tx, tz);
        let n10 = Self::grad2d(self.hash(x1, z0), tx - 1.0, tz);
        let n01 = Self::grad2d(self.hash(x0, z1), tx, tz - 1.0);
        let n11 = Self::grad2d(self.hash(x1, z1), tx - 1.0, tz - 1.0);

        let u = fade(tx);
        let v = fade(tz);
        let nx0 = n00 + (n10 - n00) * u;
        let nx1 = n01 + (n11 - n01) * u;
        // Rescale to roughly [-1, 1]
        (nx0 + (nx1 - nx0) * v) * std::f64::consts::SQRT_2
    }

    fn hash(&self, x: i64, z: i64) -> usize {
        let xi = (x & 255) as usize;
        let zi = (z & 255) as usize;
        self.perm[xi + self.perm[zi] as usize] as usize
    }

    fn grad2d(hash: usize, x: f64, z: f64) -> f64 {
        // 12 gradient directions, as for 2D simplex
        const GRAD: [[f64; 2]; 12] = [
            [1.0, 1.0],
            [-1.0, 1.0],
            [1.0, -1.0],
            [-1.0, -1.0],
            [1.0, 0.0],
            [-1.0, 0.0],
            [0.0, 1.0],
            [0.0, -1.0],
            [1.0, 1.0],
            [-1.0, 1.0],
            [1.0, -1.0],
            [-1.0, -1.0],
        ];
        let g = &GRAD[hash % 12];
        g[0] * x + g[1] * z
    }

    fn build_permutation(seed: u64) -> [u8; 512] {
        let mut p: [u8; 256] = [0; 256];
        for (i, val) in p.iter_mut().enumerate() {
            *val = i as u8;
        }

        // Fisher-Yates shuffle driven by the lattice hash
        for i in (1..256usize).rev() {
            let j = (lattice_hash(seed, i as i64, 0) % (i as u64 + 1)) as usize;
            p.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, val) in perm.iter_mut().enumerate() {
            *val = p[i & 255];
        }
        perm
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Fill a `size * size` array with fractal periodic noise.
///
/// Octave `o` has `base_cells << o` lattice cells across the array and
/// `persistence` times the amplitude of octave `o - 1`. Because each
/// octave's period is a whole number of cells, the array wraps without a
/// seam.
pub(crate) fn periodic_fbm(
    size: u32,
    seed: u64,
    octaves: u32,
    base_cells: u32,
    persistence: f64,
) -> Vec<f64> {
    let noise = PeriodicNoise::new(seed);
    let n = size as usize;
    let mut data = vec![0.0f64; n * n];

    for octave in 0..octaves {
        let cells = (base_cells as i64) << octave;
        let amplitude = persistence.powi(octave as i32);
        let to_lattice = cells as f64 / size as f64;
        for z in 0..n {
            let lz = z as f64 * to_lattice;
            for x in 0..n {
                let lx = x as f64 * to_lattice;
                data[z * n + x] += noise.sample(lx, lz, cells) * amplitude;
            }
        }
    }

    data
}
