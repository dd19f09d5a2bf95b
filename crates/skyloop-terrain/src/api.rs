use crate::generator::{validate_params, HeightfieldCache};
use crate::sampler::TerrainSampler;
use glam::Vec3;
use skyloop_core::constants::DEFAULT_NORMAL_EPSILON;
use skyloop_core::HeightfieldConfig;
use std::cell::OnceCell;

/// Owned composition point of the terrain query interface.
///
/// Holds the heightfield cache and the currently bound sampler. Queries made
/// before [`initialize`](Self::initialize) bind the default heightfield on
/// first use and log a warning instead of failing.
pub struct TerrainApi {
    params: HeightfieldConfig,
    normal_epsilon: f64,
    cache: HeightfieldCache,
    sampler: OnceCell<TerrainSampler>,
}

impl Default for TerrainApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainApi {
    /// An unbound API. Nothing is generated until first use.
    pub fn new() -> Self {
        Self {
            params: HeightfieldConfig::default(),
            normal_epsilon: DEFAULT_NORMAL_EPSILON,
            cache: HeightfieldCache::new(),
            sampler: OnceCell::new(),
        }
    }

    /// Bind the heightfield described by `params`.
    ///
    /// Idempotent: when already bound to the same (validated) parameters and
    /// epsilon this is a no-op and returns `false`. Otherwise the field comes
    /// from the cache, generating only if these parameters were never seen.
    pub fn initialize(&mut self, params: &HeightfieldConfig, normal_epsilon: f64) -> bool {
        let params = validate_params(params);
        if self.sampler.get().is_some()
            && self.params == params
            && self.normal_epsilon == normal_epsilon
        {
            return false;
        }

        let field = self.cache.get_or_generate(&params);
        self.params = params;
        self.normal_epsilon = normal_epsilon;
        self.sampler = OnceCell::from(TerrainSampler::new(field, normal_epsilon));
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.sampler.get().is_some()
    }

    /// Parameters of the bound (or next lazily bound) heightfield.
    pub fn params(&self) -> &HeightfieldConfig {
        &self.params
    }

    /// Handle to the bound heightfield, binding defaults if needed.
    pub fn sampler(&self) -> &TerrainSampler {
        self.sampler.get_or_init(|| {
            log::warn!("terrain queried before initialization, generating default heightfield");
            let field = self.cache.get_or_generate(&self.params);
            TerrainSampler::new(field, self.normal_epsilon)
        })
    }

    pub fn height(&self, x: f64, z: f64) -> f32 {
        self.sampler().height(x, z)
    }

    pub fn surface_normal(&self, x: f64, z: f64) -> Vec3 {
        self.sampler().surface_normal(x, z)
    }

    /// Writes into caller-owned storage so per-frame callers don't allocate.
    pub fn surface_normal_into(&self, x: f64, z: f64, out: &mut Vec3) {
        self.sampler().surface_normal_into(x, z, out);
    }

    /// Number of distinct heightfields generated by this API so far.
    pub fn cached_fields(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn small() -> HeightfieldConfig {
        HeightfieldConfig {
            size: 32,
            scale: 320.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut api = TerrainApi::new();
        assert!(api.initialize(&small(), 0.5));
        let first = Arc::clone(api.sampler().heightfield());

        assert!(!api.initialize(&small(), 0.5));
        assert!(Arc::ptr_eq(&first, api.sampler().heightfield()));
        assert_eq!(api.cached_fields(), 1);
    }

    #[test]
    fn test_reinitialize_with_new_params_regenerates() {
        let mut api = TerrainApi::new();
        api.initialize(&small(), 0.5);
        let first = Arc::clone(api.sampler().heightfield());

        let other = HeightfieldConfig {
            seed: 1234,
            ..small()
        };
        assert!(api.initialize(&other, 0.5));
        assert!(!Arc::ptr_eq(&first, api.sampler().heightfield()));

        // Switching back is served from the cache
        assert!(api.initialize(&small(), 0.5));
        assert!(Arc::ptr_eq(&first, api.sampler().heightfield()));
        assert_eq!(api.cached_fields(), 2);
    }

    #[test]
    fn test_uninitialized_query_lazily_binds_defaults() {
        let api = TerrainApi::new();
        assert!(!api.is_initialized());
        let h = api.height(10.0, 20.0);
        assert!(h.is_finite());
        assert!(api.is_initialized());
        assert_eq!(api.sampler().heightfield().size(), HeightfieldConfig::default().size);

        let mut n = Vec3::ZERO;
        api.surface_normal_into(10.0, 20.0, &mut n);
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!(n.y > 0.0);
    }

    #[test]
    fn test_api_and_sampler_agree() {
        let mut api = TerrainApi::new();
        api.initialize(&small(), 0.5);
        let sampler = api.sampler().clone();
        for i in 0..50 {
            let x = i as f64 * 17.3 - 200.0;
            let z = i as f64 * 3.1;
            assert_eq!(api.height(x, z), sampler.height(x, z));
            assert_eq!(api.surface_normal(x, z), sampler.surface_normal(x, z));
        }
    }
}
