//! Ground placement for decorative consumers (fences, particle spawners).
//!
//! These helpers only ever read the terrain through [`TerrainSampler`], so
//! anything placed here sits exactly on the same surface the tile meshes
//! draw. Results are conceptual positions; convert them to render space
//! with the floating origin in the same step they are drawn.

use crate::hash::{hash_to_unit, lattice_hash};
use crate::sampler::TerrainSampler;
use glam::{DVec2, DVec3, Vec3};

/// A point resting on (or `lift` units above) the terrain surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePlacement {
    pub position: DVec3,
    pub normal: Vec3,
}

/// Place a single object on the surface at conceptual `(x, z)`.
pub fn place_on_surface(sampler: &TerrainSampler, x: f64, z: f64, lift: f64) -> SurfacePlacement {
    let surface = sampler.surface(x, z);
    SurfacePlacement {
        position: DVec3::new(x, surface.height as f64 + lift, z),
        normal: surface.normal,
    }
}

/// Evenly spaced posts from `start` to `end` (both included).
///
/// The last gap may be shorter than `spacing`. A non-positive spacing yields
/// just the two endpoints.
pub fn fence_posts(
    sampler: &TerrainSampler,
    start: DVec2,
    end: DVec2,
    spacing: f64,
    lift: f64,
) -> Vec<SurfacePlacement> {
    let length = start.distance(end);
    if !(spacing.is_finite() && spacing > 0.0) {
        log::warn!("fence spacing {spacing} is not positive, placing endpoints only");
        return vec![
            place_on_surface(sampler, start.x, start.y, lift),
            place_on_surface(sampler, end.x, end.y, lift),
        ];
    }
    if length == 0.0 {
        return vec![place_on_surface(sampler, start.x, start.y, lift)];
    }

    let gaps = (length / spacing).floor() as usize;
    let dir = (end - start) / length;
    let mut posts = Vec::with_capacity(gaps + 2);
    for i in 0..=gaps {
        let p = start + dir * (i as f64 * spacing);
        posts.push(place_on_surface(sampler, p.x, p.y, lift));
    }
    if (gaps as f64) * spacing < length {
        posts.push(place_on_surface(sampler, end.x, end.y, lift));
    }
    posts
}

/// `count` deterministic points scattered uniformly over a disc, e.g. for
/// particle spawn positions. The same seed gives the same points.
pub fn scatter_points(
    sampler: &TerrainSampler,
    center: DVec2,
    radius: f64,
    count: usize,
    seed: u64,
    lift: f64,
) -> Vec<SurfacePlacement> {
    (0..count)
        .map(|i| {
            let r = radius * hash_to_unit(lattice_hash(seed, i as i64, 1)).sqrt();
            let theta = std::f64::consts::TAU * hash_to_unit(lattice_hash(seed, i as i64, 2));
            let p = center + DVec2::new(theta.cos(), theta.sin()) * r;
            place_on_surface(sampler, p.x, p.y, lift)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_heightfield;
    use skyloop_core::HeightfieldConfig;
    use std::sync::Arc;

    fn sampler() -> TerrainSampler {
        let field = generate_heightfield(&HeightfieldConfig {
            size: 64,
            scale: 640.0,
            ..Default::default()
        });
        TerrainSampler::new(Arc::new(field), 0.5)
    }

    #[test]
    fn test_placement_matches_sampler() {
        let s = sampler();
        let p = place_on_surface(&s, 123.4, -56.7, 2.0);
        assert_eq!(p.position.y, s.height(123.4, -56.7) as f64 + 2.0);
        assert_eq!(p.normal, s.surface_normal(123.4, -56.7));
    }

    #[test]
    fn test_fence_posts_cover_segment() {
        let s = sampler();
        let posts = fence_posts(&s, DVec2::new(0.0, 0.0), DVec2::new(25.0, 0.0), 10.0, 0.0);
        let xs: Vec<f64> = posts.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 25.0]);
        for p in &posts {
            assert_eq!(p.position.y, s.height(p.position.x, p.position.z) as f64);
        }
    }

    #[test]
    fn test_fence_exact_multiple_has_no_duplicate_end() {
        let s = sampler();
        let posts = fence_posts(&s, DVec2::ZERO, DVec2::new(0.0, 30.0), 10.0, 0.0);
        assert_eq!(posts.len(), 4);
    }

    #[test]
    fn test_fence_bad_spacing_places_endpoints() {
        let s = sampler();
        let posts = fence_posts(&s, DVec2::ZERO, DVec2::new(5.0, 5.0), 0.0, 0.0);
        assert_eq!(posts.len(), 2);
    }

    #[test]
    fn test_scatter_deterministic_and_within_radius() {
        let s = sampler();
        let center = DVec2::new(-300.0, 800.0);
        let a = scatter_points(&s, center, 40.0, 32, 9, 1.0);
        let b = scatter_points(&s, center, 40.0, 32, 9, 1.0);
        assert_eq!(a, b);
        for p in &a {
            let d = DVec2::new(p.position.x, p.position.z).distance(center);
            assert!(d <= 40.0 + 1e-9, "point outside disc: {d}");
        }
    }

    #[test]
    fn test_placement_agrees_across_periods() {
        let s = sampler();
        let a = place_on_surface(&s, 10.0, 10.0, 0.0);
        let b = place_on_surface(&s, 10.0 + s.period(), 10.0 - 2.0 * s.period(), 0.0);
        assert!((a.position.y - b.position.y).abs() < 1e-4);
    }
}
