//! Integration tests for the cloth simulation.
//!
//! These drive whole grids through many steps and check the physical
//! properties the engine promises: topology counts, pinned anchors, bounded
//! energy, non-amplifying bounces and exact free fall.

use drape::prelude::*;
use drape::SpringKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const G: f32 = 9.8;

fn free_fall_params() -> ClothParams {
    ClothParams {
        gravity: Vec3::new(0.0, -G, 0.0),
        spring_constant: 0.0,
        damping_constant: 0.0,
        air_density: 0.0,
        ..Default::default()
    }
}

// ============================================================================
// Topology
// ============================================================================

#[test]
fn test_constraint_and_triangle_counts() {
    for n in 2..=12usize {
        let cloth = ClothBuilder::new(n).build().unwrap();

        let structural = cloth
            .springs()
            .iter()
            .filter(|s| s.kind() == SpringKind::Structural)
            .count();
        let shear = cloth.springs().len() - structural;

        assert_eq!(structural, 2 * n * (n - 1), "structural springs for n={}", n);
        assert_eq!(shear, 2 * (n - 1) * (n - 1), "shear springs for n={}", n);
        assert_eq!(cloth.triangles().len(), 2 * (n - 1) * (n - 1));
        assert_eq!(cloth.particles().len(), n * n);
    }
}

#[test]
fn test_no_duplicate_springs() {
    let cloth = ClothBuilder::new(7).build().unwrap();
    let mut pairs: Vec<(u32, u32)> = cloth
        .springs()
        .iter()
        .map(|s| {
            let (a, b) = s.endpoints();
            (a.min(b), a.max(b))
        })
        .collect();
    let total = pairs.len();
    pairs.sort_unstable();
    pairs.dedup();
    assert_eq!(pairs.len(), total);
}

#[test]
fn test_size_one_is_invalid() {
    let result = ClothGrid::new(1, 1.0, 1.0, 5.0, |_, _| false);
    assert!(matches!(
        result,
        Err(ClothError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_non_positive_mass_or_spacing_is_invalid() {
    assert!(ClothGrid::new(4, 0.0, 1.0, 5.0, |_, _| false).is_err());
    assert!(ClothGrid::new(4, 1.0, -0.1, 5.0, |_, _| false).is_err());
}

// ============================================================================
// Anchors
// ============================================================================

#[test]
fn test_fixed_particles_never_move() {
    let mut cloth = ClothBuilder::new(8)
        .with_params(ClothParams {
            spring_constant: 50.0,
            ..Default::default()
        })
        .with_pins(PinPolicy::TopEdge)
        .build()
        .unwrap();

    let anchors: Vec<Vec3> = cloth
        .particles()
        .iter()
        .filter(|p| p.fixed)
        .map(|p| p.position)
        .collect();

    for _ in 0..500 {
        cloth.step(0.005, Vec3::new(3.0, 0.0, 1.0));
    }

    let after: Vec<Vec3> = cloth
        .particles()
        .iter()
        .filter(|p| p.fixed)
        .map(|p| p.position)
        .collect();
    assert_eq!(anchors, after);
    assert!(cloth.particles().iter().filter(|p| p.fixed).all(|p| p.velocity == Vec3::ZERO));
}

#[test]
fn test_free_particles_follow_translated_anchors() {
    let mut cloth = ClothBuilder::new(6)
        .with_params(ClothParams {
            spring_constant: 100.0,
            damping_constant: 2.0,
            ..Default::default()
        })
        .with_pins(PinPolicy::TopEdge)
        .build()
        .unwrap();

    let shift = Vec3::new(0.5, 0.0, 0.0);
    let anchor_before = cloth.particle(0, 2).unwrap().position;
    cloth.translate_fixed_particles(shift);
    assert_eq!(cloth.particle(0, 2).unwrap().position, anchor_before + shift);

    // Free particles are not moved directly
    assert_eq!(cloth.particle(1, 0).unwrap().position.x, 0.0);

    for _ in 0..2000 {
        cloth.step(0.005, Vec3::ZERO);
    }
    assert!(cloth.particle(1, 0).unwrap().position.x > 0.25);
    assert_eq!(cloth.particle(0, 2).unwrap().position, anchor_before + shift);
}

// ============================================================================
// Integration accuracy and stability
// ============================================================================

#[test]
fn test_free_fall_matches_projectile_motion() {
    let dt = 0.01;
    let steps = 60;
    let height = 5.0;

    let mut cloth = ClothBuilder::new(2)
        .with_mass(1.0)
        .with_spacing(1.0)
        .with_initial_height(height)
        .with_params(free_fall_params())
        .with_pin_predicate(|row, col| row == 0 && col == 0)
        .build()
        .unwrap();

    for _ in 0..steps {
        cloth.step(dt, Vec3::ZERO);
    }

    let n = steps as f32;
    let t = n * dt;
    // Verlet from rest: y_n = y_0 - g dt^2 n(n+1)/2
    let discrete = height - G * dt * dt * n * (n + 1.0) / 2.0;
    let closed_form = height - 0.5 * G * t * t;

    for (row, col) in [(0, 1), (1, 0), (1, 1)] {
        let p = cloth.particle(row, col).unwrap();
        assert!((p.position.y - discrete).abs() < 1e-3, "y = {}", p.position.y);
        assert!((p.position.y - closed_form).abs() <= G * dt * t);
        assert!((p.velocity.y + G * t).abs() < 1e-3, "v = {}", p.velocity.y);
        assert_eq!(p.position.x, col as f32);
        assert_eq!(p.position.z, row as f32);
    }

    let anchor = cloth.particle(0, 0).unwrap();
    assert_eq!(anchor.position, Vec3::new(0.0, height, 0.0));
}

#[test]
fn test_energy_stays_bounded_without_dissipation() {
    let mut cloth = ClothBuilder::new(5)
        .with_params(ClothParams::conservative(20.0))
        .with_pins(PinPolicy::None)
        .build()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    for row in 0..5 {
        for col in 0..5 {
            let delta = Vec3::new(
                rng.gen_range(-0.02..0.02),
                rng.gen_range(-0.02..0.02),
                rng.gen_range(-0.02..0.02),
            );
            cloth.displace_particle(row, col, delta).unwrap();
        }
    }

    let initial = cloth.total_energy();
    assert!(initial > 0.0);

    let mut peak = initial;
    for _ in 0..4000 {
        cloth.step(0.002, Vec3::ZERO);
        let e = cloth.total_energy();
        assert!(e.is_finite());
        peak = peak.max(e);
    }
    assert!(peak <= 1.5 * initial, "energy grew from {} to {}", initial, peak);
}

#[test]
fn test_drop_rebounds_without_gaining_speed() {
    let dt = 0.005;
    let mut cloth = ClothBuilder::new(2)
        .with_initial_height(1.0)
        .with_params(ClothParams {
            restitution: 0.6,
            ..free_fall_params()
        })
        .with_pins(PinPolicy::None)
        .build()
        .unwrap();

    let mut last_falling = 0.0f32;
    let mut impact_speed = None;
    let mut peak_rebound = 0.0f32;

    for _ in 0..600 {
        cloth.step(dt, Vec3::ZERO);
        let p = cloth.particle(1, 1).unwrap();
        assert!(p.position.y >= 0.0, "particle sank to {}", p.position.y);

        match impact_speed {
            None if p.velocity.y > 0.0 => {
                // Impulse is applied to the velocity at the moment of impact
                impact_speed = Some(last_falling + G * dt);
                peak_rebound = p.velocity.y;
            }
            None => last_falling = -p.velocity.y,
            Some(_) => peak_rebound = peak_rebound.max(p.velocity.y),
        }
    }

    let impact_speed = impact_speed.expect("particle never reached the ground");
    assert!(impact_speed > 4.0);
    assert!(
        peak_rebound <= impact_speed + 1e-4,
        "rebound {} exceeds impact {}",
        peak_rebound,
        impact_speed
    );
}

#[test]
fn test_cloth_lands_on_ground() {
    let mut cloth = ClothBuilder::new(6)
        .with_initial_height(0.5)
        .with_params(ClothParams {
            spring_constant: 50.0,
            ..Default::default()
        })
        .with_pins(PinPolicy::None)
        .build()
        .unwrap();

    for _ in 0..1500 {
        cloth.step(0.004, Vec3::new(0.5, 0.0, 0.0));
        assert!(cloth.particles().iter().all(|p| p.position.y >= 0.0));
    }
    let (_, hi) = cloth.bounding_box();
    assert!(hi.y < 0.5);
}

#[test]
fn test_ground_collision_can_be_disabled() {
    let make = |ground_collision| {
        ClothBuilder::new(2)
            .with_initial_height(0.1)
            .with_params(ClothParams {
                ground_collision,
                ..free_fall_params()
            })
            .with_pins(PinPolicy::None)
            .build()
            .unwrap()
    };
    let mut ghost = make(false);
    let mut solid = make(true);

    for _ in 0..100 {
        ghost.step(0.01, Vec3::ZERO);
        solid.step(0.01, Vec3::ZERO);
    }

    // One second of free fall from 0.1 ends well below the plane
    for p in ghost.particles() {
        assert!(p.position.y < -4.0, "y = {}", p.position.y);
        assert!(p.velocity.y < 0.0);
    }
    assert!(solid.particles().iter().all(|p| p.position.y >= 0.0));
}

// ============================================================================
// Aerodynamics
// ============================================================================

fn hanging_cloth() -> ClothGrid {
    ClothBuilder::new(8)
        .with_mass(0.01)
        .with_params(ClothParams {
            spring_constant: 20.0,
            damping_constant: 0.05,
            ..Default::default()
        })
        .with_pins(PinPolicy::TopEdge)
        .build()
        .unwrap()
}

fn mean_z(cloth: &ClothGrid) -> f32 {
    let free: Vec<f32> = cloth
        .particles()
        .iter()
        .filter(|p| !p.fixed)
        .map(|p| p.position.z)
        .collect();
    free.iter().sum::<f32>() / free.len() as f32
}

#[test]
fn test_wind_pushes_cloth_downwind() {
    let mut calm = hanging_cloth();
    let mut windy = hanging_cloth();

    // Average over the second half so the calm cloth's swing cancels out
    let (mut calm_z, mut windy_z) = (0.0, 0.0);
    for step in 0..2000 {
        calm.step(0.002, Vec3::ZERO);
        windy.step(0.002, Vec3::new(0.0, 0.0, 5.0));
        if step >= 1000 {
            calm_z += mean_z(&calm);
            windy_z += mean_z(&windy);
        }
    }

    assert!(windy.particles().iter().all(|p| p.position.is_finite()));
    assert!(windy_z > calm_z, "windy {} vs calm {}", windy_z, calm_z);
}

// ============================================================================
// Render export
// ============================================================================

#[test]
fn test_export_is_stable_between_steps() {
    let mut cloth = ClothBuilder::new(5).build().unwrap();
    for _ in 0..10 {
        cloth.step(0.01, Vec3::new(1.0, 0.0, 0.0));
    }

    let first = cloth.export_geometry();
    let second = cloth.export_geometry();
    assert_eq!(first, second);
    assert_eq!(first.vertex_bytes(), second.vertex_bytes());

    assert_eq!(first.vertices.len(), 25);
    assert_eq!(first.indices.len(), 3 * 2 * 4 * 4);
    assert_eq!(first.indices.as_slice(), cloth.indices());
}

#[test]
fn test_export_follows_row_major_particles() {
    let mut cloth = ClothBuilder::new(4).build().unwrap();
    cloth.step(0.01, Vec3::ZERO);

    let geometry = cloth.export_geometry();
    for (vertex, particle) in geometry.vertices.iter().zip(cloth.particles()) {
        assert_eq!(vertex.position(), particle.position);
        assert_eq!(vertex.normal(), particle.normal);
    }

    // Triangulation never changes
    let indices = geometry.indices.clone();
    cloth.step(0.01, Vec3::ZERO);
    assert_eq!(cloth.export_geometry().indices, indices);
}

#[test]
fn test_flat_cloth_normals_point_up() {
    let mut cloth = ClothBuilder::new(5)
        .with_params(ClothParams::conservative(10.0))
        .build()
        .unwrap();
    cloth.step(0.01, Vec3::ZERO);

    for v in cloth.export_geometry().vertices {
        assert!((v.normal() - Vec3::Y).length() < 1e-5);
    }
}

#[test]
fn test_identical_runs_are_deterministic() {
    let run = || {
        let mut cloth = ClothBuilder::new(6)
            .with_pins(PinPolicy::TwoCorners)
            .build()
            .unwrap();
        for _ in 0..200 {
            cloth.step(0.005, Vec3::new(2.0, 0.0, 1.0));
        }
        cloth.export_geometry()
    };
    assert_eq!(run(), run());
}
