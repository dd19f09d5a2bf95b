//! Long scripted flights through [`FlightWorld`].
//!
//! Each flight checks, every step, that the camera stays near the render
//! origin, that the tile pool covers exactly the neighborhood of the
//! viewpoint, and that no geometry leaks.

use crate::backend::CpuGeometryBackend;
use crate::FlightWorld;
use glam::{DVec3, I64Vec2};
use skyloop_core::math::{neighborhood, world_to_grid};
use skyloop_core::{FlightConfig, HeightfieldAlgorithm, HeightfieldConfig, SlotLayout};
use skyloop_terrain::TerrainApi;
use std::collections::HashSet;

fn flight_config(layout: SlotLayout, algorithm: HeightfieldAlgorithm) -> FlightConfig {
    FlightConfig {
        tile_segments: 2,
        slot_layout: layout,
        heightfield: HeightfieldConfig {
            size: 64,
            scale: 1000.0,
            algorithm,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn world(layout: SlotLayout, algorithm: HeightfieldAlgorithm) -> FlightWorld {
    let mut api = TerrainApi::new();
    FlightWorld::from_api(
        &flight_config(layout, algorithm),
        &mut api,
        CpuGeometryBackend::new(),
    )
}

/// Per-step assertions shared by every flight.
fn check_step(world: &FlightWorld, conceptual: DVec3) {
    let origin = world.origin();
    let render = conceptual - origin.offset();
    let bound = origin.threshold() + origin.tile_size();
    assert!(
        render.x.abs() <= bound && render.z.abs() <= bound,
        "camera drifted to render ({}, {}) at conceptual ({}, {})",
        render.x,
        render.z,
        conceptual.x,
        conceptual.z
    );

    let tiles = world.tiles();
    let center = world_to_grid(conceptual, origin.tile_size());
    assert_eq!(tiles.viewpoint_cell(), Some(center));
    let held: HashSet<I64Vec2> = tiles.occupied_coords().into_iter().collect();
    let expected: HashSet<I64Vec2> = neighborhood(center, tiles.config().dimension)
        .into_iter()
        .collect();
    assert_eq!(held, expected);
    assert_eq!(tiles.backend().live_count(), tiles.slots().len());
}

#[test]
fn test_straight_flight_far_from_origin() {
    let mut world = world(SlotLayout::Fixed, HeightfieldAlgorithm::DiamondSquare);
    let velocity = DVec3::new(9.5, 0.0, 0.0);
    let mut pos = DVec3::new(0.0, 80.0, 0.0);
    for _ in 0..12_000 {
        pos += velocity;
        world.step(pos);
        check_step(&world, pos);
    }
    assert!(pos.x > 100_000.0);
    assert!(world.origin().shift_count() > 1_000);
}

#[test]
fn test_spiral_flight() {
    let mut world = world(SlotLayout::Toroidal, HeightfieldAlgorithm::PeriodicFbm);
    let mut pos = DVec3::new(0.0, 80.0, 0.0);
    for step in 0..6_000 {
        let t = step as f64 * 0.01;
        let speed = 4.0 + step as f64 * 0.002;
        pos += DVec3::new(t.cos() * speed, 0.0, t.sin() * speed);
        world.step(pos);
        check_step(&world, pos);
    }
}

#[test]
fn test_zigzag_flight_back_and_forth() {
    let mut world = world(SlotLayout::Toroidal, HeightfieldAlgorithm::DiamondSquare);
    let mut pos = DVec3::new(-5_000.0, 80.0, 7_500.0);
    for step in 0..4_000 {
        let dir = if (step / 250) % 2 == 0 { 1.0 } else { -1.0 };
        pos += DVec3::new(dir * 7.0, 0.0, -3.0);
        world.step(pos);
        check_step(&world, pos);
    }
}

#[test]
fn test_teleport_recenters_whole_grid() {
    let mut world = world(SlotLayout::Toroidal, HeightfieldAlgorithm::DiamondSquare);
    world.step(DVec3::ZERO);

    // A jump far past the threshold shifts one tile per step until caught up
    let far = DVec3::new(2_000.0, 0.0, -1_000.0);
    let mut steps = 0;
    loop {
        let report = world.step(far);
        steps += 1;
        if !report.shifted() {
            break;
        }
        assert!(steps < 100, "origin never converged");
    }
    check_step(&world, far);
    assert_eq!(world.tiles().slots().len(), 25);
}

#[test]
fn test_terrain_under_camera_is_seamless_across_shifts() {
    let mut world = world(SlotLayout::Fixed, HeightfieldAlgorithm::DiamondSquare);
    let mut pos = DVec3::new(0.0, 80.0, 0.0);
    let mut last = world.ground_height(pos.x, pos.z);
    for _ in 0..3_000 {
        pos += DVec3::new(0.5, 0.0, 0.25);
        world.step(pos);
        let h = world.ground_height(pos.x, pos.z);
        // Small steps over a bounded field never jump by more than the slope allows
        assert!((h - last).abs() < 5.0, "height jumped from {last} to {h}");
        last = h;
    }
}
