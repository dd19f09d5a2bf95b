use bytemuck::{Pod, Zeroable};
use glam::{DVec2, Vec3};
use skyloop_core::types::GridCoord;
use skyloop_terrain::TerrainSampler;

/// One terrain vertex as handed to a renderer. Tile-local position, so the
/// renderer places the tile at its slot's render position.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangulated square patch of terrain for one grid coordinate.
#[derive(Debug, Clone)]
pub struct TileMesh {
    pub coord: GridCoord,
    pub segments: u32,
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

impl TileMesh {
    /// Vertex at lattice position `(i, j)`, `i` along x and `j` along z.
    pub fn vertex(&self, i: u32, j: u32) -> &TerrainVertex {
        &self.vertices[(j * (self.segments + 1) + i) as usize]
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Conceptual x/z of vertex `(i, j)` of the tile at `coord`.
///
/// Derived from the global lattice index `coord * segments + i`, so the
/// shared edge of two neighbouring tiles is computed from the same integer
/// and yields bit-identical sample coordinates.
pub fn vertex_sample_coord(
    coord: GridCoord,
    i: u32,
    j: u32,
    tile_size: f64,
    segments: u32,
) -> DVec2 {
    let step = tile_size / segments as f64;
    let half = tile_size / 2.0;
    let gx = coord.x * segments as i64 + i as i64;
    let gz = coord.y * segments as i64 + j as i64;
    DVec2::new(gx as f64 * step - half, gz as f64 * step - half)
}

/// Build the mesh for the tile at `coord`. Heights and normals come only
/// from `sampler`.
pub fn build_tile_mesh(
    sampler: &TerrainSampler,
    coord: GridCoord,
    tile_size: f64,
    segments: u32,
) -> TileMesh {
    let segments = segments.max(1);
    let row = segments + 1;
    let half = tile_size / 2.0;

    let mut vertices = Vec::with_capacity((row * row) as usize);
    let mut normal = Vec3::ZERO;
    for j in 0..row {
        let local_z = tile_size * (j as f64 / segments as f64) - half;
        for i in 0..row {
            let local_x = tile_size * (i as f64 / segments as f64) - half;
            let sample = vertex_sample_coord(coord, i, j, tile_size, segments);
            let height = sampler.height(sample.x, sample.y);
            sampler.surface_normal_into(sample.x, sample.y, &mut normal);
            vertices.push(TerrainVertex {
                position: [local_x as f32, height, local_z as f32],
                normal: normal.to_array(),
            });
        }
    }

    // a--b
    // |  |  +x right, +z down; (a, c, b) and (b, c, d) face +y
    // c--d
    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for j in 0..segments {
        for i in 0..segments {
            let a = j * row + i;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    TileMesh {
        coord,
        segments,
        vertices,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::I64Vec2;
    use skyloop_core::HeightfieldConfig;
    use skyloop_terrain::generate_heightfield;
    use std::sync::Arc;

    const TILE: f64 = 100.0;
    const SEGMENTS: u32 = 16;

    fn sampler() -> TerrainSampler {
        let field = generate_heightfield(&HeightfieldConfig {
            size: 64,
            scale: 640.0,
            ..Default::default()
        });
        TerrainSampler::new(Arc::new(field), 0.5)
    }

    fn face_normal(mesh: &TileMesh, tri: usize) -> Vec3 {
        let p = |k: usize| Vec3::from_array(mesh.vertices[mesh.indices[tri * 3 + k] as usize].position);
        (p(1) - p(0)).cross(p(2) - p(0))
    }

    #[test]
    fn test_mesh_dimensions() {
        let mesh = build_tile_mesh(&sampler(), I64Vec2::new(2, -3), TILE, SEGMENTS);
        assert_eq!(mesh.vertices.len(), 17 * 17);
        assert_eq!(mesh.triangle_count(), 16 * 16 * 2);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertices.len() * 24);
        assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);
    }

    #[test]
    fn test_local_positions_span_tile() {
        let mesh = build_tile_mesh(&sampler(), I64Vec2::new(7, 7), TILE, SEGMENTS);
        assert_eq!(mesh.vertex(0, 0).position[0], -50.0);
        assert_eq!(mesh.vertex(0, 0).position[2], -50.0);
        assert_eq!(mesh.vertex(SEGMENTS, SEGMENTS).position[0], 50.0);
        assert_eq!(mesh.vertex(SEGMENTS, SEGMENTS).position[2], 50.0);
    }

    #[test]
    fn test_triangles_face_up() {
        let field = skyloop_terrain::Heightfield::flat(8, 80.0, 3.0);
        let flat = TerrainSampler::new(Arc::new(field), 0.5);
        let mesh = build_tile_mesh(&flat, I64Vec2::ZERO, TILE, 4);
        for tri in 0..mesh.triangle_count() {
            assert!(face_normal(&mesh, tri).y > 0.0, "triangle {tri} faces down");
        }
    }

    #[test]
    fn test_vertices_come_from_sampler() {
        let s = sampler();
        let coord = I64Vec2::new(-4, 11);
        let mesh = build_tile_mesh(&s, coord, TILE, SEGMENTS);
        for (i, j) in [(0, 0), (3, 9), (SEGMENTS, 5), (SEGMENTS, SEGMENTS)] {
            let p = vertex_sample_coord(coord, i, j, TILE, SEGMENTS);
            let v = mesh.vertex(i, j);
            assert_eq!(v.position[1], s.height(p.x, p.y));
            assert_eq!(Vec3::from_array(v.normal), s.surface_normal(p.x, p.y));
        }
    }

    #[test]
    fn test_sample_coord_matches_tile_center() {
        let coord = I64Vec2::new(3, -2);
        let mid = vertex_sample_coord(coord, SEGMENTS / 2, SEGMENTS / 2, TILE, SEGMENTS);
        assert_eq!(mid, DVec2::new(300.0, -200.0));
    }

    #[test]
    fn test_shared_edges_are_seamless() {
        let s = sampler();
        for (gx, gz) in [(0, 0), (-1, 4), (123_456, -98_765)] {
            let left = build_tile_mesh(&s, I64Vec2::new(gx, gz), TILE, SEGMENTS);
            let right = build_tile_mesh(&s, I64Vec2::new(gx + 1, gz), TILE, SEGMENTS);
            let below = build_tile_mesh(&s, I64Vec2::new(gx, gz + 1), TILE, SEGMENTS);
            for k in 0..=SEGMENTS {
                let a = left.vertex(SEGMENTS, k);
                let b = right.vertex(0, k);
                assert!((a.position[1] - b.position[1]).abs() < 1e-6);
                assert!((Vec3::from_array(a.normal) - Vec3::from_array(b.normal)).length() < 1e-6);

                let c = left.vertex(k, SEGMENTS);
                let d = below.vertex(k, 0);
                assert!((c.position[1] - d.position[1]).abs() < 1e-6);
                assert!((Vec3::from_array(c.normal) - Vec3::from_array(d.normal)).length() < 1e-6);
            }
        }
    }

    #[test]
    fn test_normals_one_step_inside_seam_match_neighbour_lattice() {
        let s = sampler();
        let step_x = I64Vec2::new(1, 0);
        for (gx, gz) in [(0, 0), (-7, 2), (40_000_000_000, -3)] {
            let left_coord = I64Vec2::new(gx, gz);
            let left = build_tile_mesh(&s, left_coord, TILE, SEGMENTS);
            let right = build_tile_mesh(&s, left_coord + step_x, TILE, SEGMENTS);
            for k in 0..=SEGMENTS {
                // Left tile's last interior column, addressed through the
                // lattice of the tile further left.
                let inner_left = vertex_sample_coord(left_coord, SEGMENTS - 1, k, TILE, SEGMENTS);
                let via_far_left =
                    vertex_sample_coord(left_coord - step_x, 2 * SEGMENTS - 1, k, TILE, SEGMENTS);
                assert_eq!(inner_left, via_far_left);
                assert_eq!(
                    Vec3::from_array(left.vertex(SEGMENTS - 1, k).normal),
                    s.surface_normal(via_far_left.x, via_far_left.y)
                );

                // Right tile's first interior column, addressed through the
                // left tile's lattice.
                let inner_right = vertex_sample_coord(left_coord + step_x, 1, k, TILE, SEGMENTS);
                let via_left = vertex_sample_coord(left_coord, SEGMENTS + 1, k, TILE, SEGMENTS);
                assert_eq!(inner_right, via_left);
                assert_eq!(
                    Vec3::from_array(right.vertex(1, k).normal),
                    s.surface_normal(via_left.x, via_left.y)
                );
            }
        }
    }
}
