use crate::error::TerrainError;
use skyloop_core::math::wrap_index;

/// Immutable square array of heights that conceptually repeats every
/// `scale` world units on both axes.
///
/// Samples are row-major: index = `iz * size + ix`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    size: u32,
    scale: f64,
    samples: Vec<f32>,
}

impl Heightfield {
    /// Build a heightfield from explicit samples (baked data, tests).
    pub fn from_samples(size: u32, scale: f64, samples: Vec<f32>) -> Result<Self, TerrainError> {
        if size == 0 {
            return Err(TerrainError::EmptyField);
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(TerrainError::InvalidScale(scale));
        }
        let expected = (size as usize) * (size as usize);
        if samples.len() != expected {
            return Err(TerrainError::SampleCountMismatch {
                size,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            size,
            scale,
            samples,
        })
    }

    /// A field where every sample is `value`.
    pub fn flat(size: u32, scale: f64, value: f32) -> Self {
        let size = size.max(1);
        Self {
            size,
            scale,
            samples: vec![value; (size as usize) * (size as usize)],
        }
    }

    /// Generators fill the array in place before freezing it.
    pub(crate) fn from_parts(size: u32, scale: f64, samples: Vec<f32>) -> Self {
        debug_assert_eq!(samples.len(), (size as usize) * (size as usize));
        Self {
            size,
            scale,
            samples,
        }
    }

    /// Array dimension (samples per side).
    pub fn size(&self) -> u32 {
        self.size
    }

    /// World units covered before the field repeats.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample at in-range indices.
    #[inline]
    pub fn get(&self, ix: usize, iz: usize) -> f32 {
        self.samples[iz * self.size as usize + ix]
    }

    /// Sample at arbitrary integer indices, wrapping on both axes.
    #[inline]
    pub fn get_wrapped(&self, ix: i64, iz: i64) -> f32 {
        self.get(wrap_index(ix, self.size), wrap_index(iz, self.size))
    }

    /// (min, max) over all samples.
    pub fn height_range(&self) -> (f32, f32) {
        self.samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }
}

/// Rescale samples in place to span `[-amplitude / 2, amplitude / 2]`.
/// A perfectly flat array becomes all zeros.
pub(crate) fn normalize_to_amplitude(samples: &mut [f32], amplitude: f32) {
    let (lo, hi) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        });
    let range = hi - lo;
    if !(range.is_finite() && range > 0.0) {
        samples.iter_mut().for_each(|h| *h = 0.0);
        return;
    }
    for h in samples.iter_mut() {
        *h = ((*h - lo) / range - 0.5) * amplitude;
    }
}
