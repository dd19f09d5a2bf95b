use crate::diamond_square::diamond_square;
use crate::heightfield::{normalize_to_amplitude, Heightfield};
use crate::noise::periodic_fbm;
use skyloop_core::constants::*;
use skyloop_core::math::is_power_of_two;
use skyloop_core::{HeightfieldAlgorithm, HeightfieldConfig};
use std::cell::RefCell;
use std::sync::Arc;

/// Return a copy of `params` that the chosen algorithm can run with.
/// Every correction is logged and none is fatal.
pub fn validate_params(params: &HeightfieldConfig) -> HeightfieldConfig {
    let mut p = params.clone();

    let size_ok = match p.algorithm {
        HeightfieldAlgorithm::DiamondSquare => is_power_of_two(p.size) && p.size >= 4,
        HeightfieldAlgorithm::PeriodicFbm => p.size >= 2,
    };
    if !size_ok || p.size > MAX_HEIGHTFIELD_SIZE {
        log::warn!(
            "heightfield size {} is invalid for {:?}, using {}",
            p.size,
            p.algorithm,
            DEFAULT_HEIGHTFIELD_SIZE
        );
        p.size = DEFAULT_HEIGHTFIELD_SIZE;
    }

    if !(p.scale.is_finite() && p.scale > 0.0) {
        log::warn!(
            "heightfield scale {} is not a positive number, using {}",
            p.scale,
            DEFAULT_HEIGHTFIELD_SCALE
        );
        p.scale = DEFAULT_HEIGHTFIELD_SCALE;
    }

    if !(p.amplitude.is_finite() && p.amplitude >= 0.0) {
        log::warn!(
            "heightfield amplitude {} is invalid, using {}",
            p.amplitude,
            DEFAULT_HEIGHT_AMPLITUDE
        );
        p.amplitude = DEFAULT_HEIGHT_AMPLITUDE;
    }

    if !p.roughness.is_finite() {
        log::warn!("roughness {} is not finite, using {}", p.roughness, DEFAULT_ROUGHNESS);
        p.roughness = DEFAULT_ROUGHNESS;
    }

    if !p.initial_corner.is_finite() {
        log::warn!(
            "initial corner {} is not finite, using {}",
            p.initial_corner,
            DEFAULT_INITIAL_CORNER
        );
        p.initial_corner = DEFAULT_INITIAL_CORNER;
    }

    if p.octaves == 0 || p.octaves > 16 {
        log::warn!("octave count {} out of range, using {}", p.octaves, DEFAULT_OCTAVES);
        p.octaves = DEFAULT_OCTAVES;
    }

    if !(p.persistence.is_finite() && (0.0..=1.0).contains(&p.persistence)) {
        log::warn!(
            "persistence {} outside [0, 1], using {}",
            p.persistence,
            DEFAULT_PERSISTENCE
        );
        p.persistence = DEFAULT_PERSISTENCE;
    }

    if p.base_cells == 0 || p.base_cells > p.size {
        log::warn!(
            "base lattice cells {} out of range, using {}",
            p.base_cells,
            DEFAULT_BASE_CELLS
        );
        p.base_cells = DEFAULT_BASE_CELLS;
    }

    p
}

/// Run the configured algorithm once. Parameters are validated first, so
/// the result is always a complete, periodic array.
pub fn generate_heightfield(params: &HeightfieldConfig) -> Heightfield {
    let p = validate_params(params);

    let raw = match p.algorithm {
        HeightfieldAlgorithm::DiamondSquare => diamond_square(
            p.size,
            p.seed,
            p.amplitude as f64,
            p.roughness as f64,
            p.initial_corner as f64,
        ),
        HeightfieldAlgorithm::PeriodicFbm => periodic_fbm(
            p.size,
            p.seed,
            p.octaves,
            p.base_cells,
            p.persistence as f64,
        ),
    };

    let mut samples: Vec<f32> = raw.into_iter().map(|h| h as f32).collect();
    normalize_to_amplitude(&mut samples, p.amplitude);

    log::info!(
        "Generated {}x{} heightfield ({:?}, seed {}) spanning {} world units",
        p.size,
        p.size,
        p.algorithm,
        p.seed,
        p.scale
    );

    Heightfield::from_parts(p.size, p.scale, samples)
}

/// Memoizes generated heightfields by their (validated) parameters.
///
/// Owned by whoever composes the terrain API; there is no process-wide
/// instance. Entries live as long as the cache.
#[derive(Default)]
pub struct HeightfieldCache {
    entries: RefCell<Vec<(HeightfieldConfig, Arc<Heightfield>)>>,
}

impl HeightfieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached field for `params`, generating it on first use.
    /// Parameters that validate to the same values share one entry.
    pub fn get_or_generate(&self, params: &HeightfieldConfig) -> Arc<Heightfield> {
        let key = validate_params(params);
        if let Some((_, field)) = self.entries.borrow().iter().find(|(k, _)| *k == key) {
            return Arc::clone(field);
        }

        let field = Arc::new(generate_heightfield(&key));
        self.entries
            .borrow_mut()
            .push((key, Arc::clone(&field)));
        field
    }

    /// Number of distinct fields held.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(algorithm: HeightfieldAlgorithm) -> HeightfieldConfig {
        HeightfieldConfig {
            size: 32,
            scale: 320.0,
            algorithm,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_diamond_square_size_corrected() {
        let p = validate_params(&HeightfieldConfig {
            size: 257,
            ..Default::default()
        });
        assert_eq!(p.size, DEFAULT_HEIGHTFIELD_SIZE);

        let p = validate_params(&HeightfieldConfig {
            size: 2,
            ..Default::default()
        });
        assert_eq!(p.size, DEFAULT_HEIGHTFIELD_SIZE);
    }

    #[test]
    fn test_fbm_accepts_any_size() {
        let p = validate_params(&HeightfieldConfig {
            size: 100,
            base_cells: 4,
            algorithm: HeightfieldAlgorithm::PeriodicFbm,
            ..Default::default()
        });
        assert_eq!(p.size, 100);
    }

    #[test]
    fn test_invalid_scale_corrected() {
        let p = validate_params(&HeightfieldConfig {
            scale: -1.0,
            ..Default::default()
        });
        assert_eq!(p.scale, DEFAULT_HEIGHTFIELD_SCALE);
    }

    #[test]
    fn test_persistence_corrected_and_keyed() {
        let p = validate_params(&HeightfieldConfig {
            persistence: 1.5,
            ..Default::default()
        });
        assert_eq!(p.persistence, DEFAULT_PERSISTENCE);

        let cache = HeightfieldCache::new();
        let smooth = cache.get_or_generate(&small(HeightfieldAlgorithm::PeriodicFbm));
        let rough = cache.get_or_generate(&HeightfieldConfig {
            persistence: 0.8,
            ..small(HeightfieldAlgorithm::PeriodicFbm)
        });
        assert!(!Arc::ptr_eq(&smooth, &rough));
        assert_ne!(smooth.samples(), rough.samples());
    }

    #[test]
    fn test_generated_field_spans_amplitude() {
        for algorithm in [
            HeightfieldAlgorithm::DiamondSquare,
            HeightfieldAlgorithm::PeriodicFbm,
        ] {
            let params = small(algorithm);
            let field = generate_heightfield(&params);
            assert_eq!(field.size(), 32);
            assert_eq!(field.samples().len(), 32 * 32);
            let (lo, hi) = field.height_range();
            let half = params.amplitude / 2.0;
            assert!((lo + half).abs() < 1e-3, "{algorithm:?} min {lo}");
            assert!((hi - half).abs() < 1e-3, "{algorithm:?} max {hi}");
        }
    }

    #[test]
    fn test_invalid_size_still_generates_full_field() {
        let field = generate_heightfield(&HeightfieldConfig {
            size: 100,
            ..Default::default()
        });
        assert_eq!(field.size(), DEFAULT_HEIGHTFIELD_SIZE);
        assert!(field.samples().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_cache_memoizes_identical_params() {
        let cache = HeightfieldCache::new();
        let a = cache.get_or_generate(&small(HeightfieldAlgorithm::DiamondSquare));
        let b = cache.get_or_generate(&small(HeightfieldAlgorithm::DiamondSquare));
        assert!(Arc::ptr_eq(&a, &b), "identical params must reuse the field");
        assert_eq!(cache.len(), 1);

        let c = cache.get_or_generate(&HeightfieldConfig {
            seed: 7,
            ..small(HeightfieldAlgorithm::DiamondSquare)
        });
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_keys_on_corrected_params() {
        let cache = HeightfieldCache::new();
        let bad = cache.get_or_generate(&HeightfieldConfig {
            size: 300,
            ..Default::default()
        });
        let good = cache.get_or_generate(&HeightfieldConfig::default());
        assert!(Arc::ptr_eq(&bad, &good));
    }
}
